//! Serial link lifecycle: connect with retry, device setup and the read loop.

use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::decoder::Decoder;
use crate::error::{Result, TetraError};
use crate::message::{ConnectionStatus, Sink, connection_status_message};
use crate::transport::Transport;
use crate::transport::serial::{self, SerialTransport};

/// Reconnect attempts before giving up; 0 retries forever.
pub const MAX_RETRY_ATTEMPTS: u32 = 5;
/// Delay between reconnect attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);
/// Pause between device setup commands.
const SETUP_COMMAND_DELAY: Duration = Duration::from_millis(100);
/// Read timeout for the receive loop.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Identification commands every TETRA terminal should answer.
const DEVICE_COMMANDS: &[&str] = &["ATZ\r\n", "AT+GMI?\r\n", "AT+GMM?\r\n", "AT+GMR?\r\n"];

/// CTSP service profile registrations for the SDS types we decode.
const SERVICE_COMMANDS: &[&str] = &[
    "AT+CTSP=2,2,20\r\n",  // status, MT and TE
    "AT+CTSP=1,3,130\r\n", // long location report
    "AT+CTSP=1,3,131\r\n", // position request reply
    "AT+CTSP=1,3,10\r\n",  // short location report
    "AT+CTSP=1,3,137\r\n", // text messages
    "AT+CTSP=1,3,138\r\n", // segmented messages
];

/// Configuration for the serial link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0`.
    pub port: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Reconnect attempts before giving up; 0 retries forever.
    pub max_retry_attempts: u32,
    /// Delay between reconnect attempts.
    pub retry_delay: Duration,
}

impl LinkConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: serial::DEFAULT_BAUD,
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }
}

/// One serial connection to a TETRA modem plus its stream decoder.
pub struct Link<T: Transport> {
    transport: T,
    decoder: Decoder,
}

impl Link<SerialTransport> {
    /// Open the configured port, retrying per the config.
    ///
    /// Link-state transitions are reported through the sink so the operator
    /// can see reconnecting and disconnected states.
    pub fn connect(config: &LinkConfig, sink: &mut dyn Sink) -> Result<Self> {
        sink.update(connection_status_message(ConnectionStatus::Reconnecting));
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match serial::open_port(&config.port, config.baud_rate) {
                Ok(transport) => {
                    sink.update(connection_status_message(ConnectionStatus::Connected));
                    return Ok(Self::new(transport));
                }
                Err(e) => warn!("connection attempt {attempt} failed: {e}"),
            }
            if config.max_retry_attempts != 0 && attempt >= config.max_retry_attempts {
                sink.update(connection_status_message(ConnectionStatus::Disconnected));
                error!("abort reconnecting after {attempt} attempts, please check the connection");
                return Err(TetraError::RetriesExhausted(attempt));
            }
            thread::sleep(config.retry_delay);
        }
    }
}

impl<T: Transport> Link<T> {
    /// Wrap an already-open transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: Decoder::new(),
        }
    }

    /// Send the device identification and CTSP service registrations.
    pub fn initialize_device(&mut self) -> Result<()> {
        info!("initializing TETRA device");
        for cmd in DEVICE_COMMANDS.iter().chain(SERVICE_COMMANDS) {
            debug!("sending setup command: {}", cmd.trim_end());
            self.transport.write_all(cmd.as_bytes())?;
            self.transport.flush()?;
            thread::sleep(SETUP_COMMAND_DELAY);
        }
        info!("TETRA device initialized");
        Ok(())
    }

    /// Read chunks until the transport fails or reports end of stream,
    /// feeding every chunk to the decoder in arrival order. Returns only on
    /// connection loss.
    pub fn run(&mut self, sink: &mut dyn Sink) -> Result<()> {
        self.transport.set_read_timeout(READ_TIMEOUT)?;
        let mut buf = [0u8; 512];
        loop {
            match self.transport.read(&mut buf) {
                Ok(0) => {
                    warn!("serial stream closed");
                    sink.update(connection_status_message(ConnectionStatus::Disconnected));
                    return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
                }
                Ok(n) => self.decoder.decode_chunk(&buf[..n], sink),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => {
                    warn!("serial connection lost: {e}");
                    sink.update(connection_status_message(ConnectionStatus::Disconnected));
                    return Err(e.into());
                }
            }
        }
    }

    /// The stream decoder owned by this link.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }
}

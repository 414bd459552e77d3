use std::io;
use std::time::Duration;

use log::{debug, info, warn};
use serialport::SerialPortType;

use crate::error::{Result, TetraError};

use super::Transport;

/// Default baud rate for Motorola TETRA terminals.
pub const DEFAULT_BAUD: u32 = 38400;

/// Default serial port settings (8N1).
const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;
const STOP_BITS: serialport::StopBits = serialport::StopBits::One;
const PARITY: serialport::Parity = serialport::Parity::None;

/// A transport backed by a native serial port.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    pub fn new(port: Box<dyn serialport::SerialPort>) -> Self {
        Self { port }
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.port, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut self.port)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.port, buf)
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Open a serial port with 8N1 settings at the given baud rate.
pub fn open_port(port_name: &str, baud_rate: u32) -> Result<SerialTransport> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DATA_BITS)
        .stop_bits(STOP_BITS)
        .parity(PARITY)
        .timeout(Duration::from_millis(500))
        .open()
        .map_err(TetraError::Serial)?;

    info!("opened {} at {} baud", port_name, baud_rate);
    Ok(SerialTransport::new(port))
}

/// Pick a serial port for the modem when none is configured.
///
/// Prefers USB serial ports and takes the first one found; every candidate
/// is logged for troubleshooting.
pub fn find_modem_port() -> Result<String> {
    let ports = serialport::available_ports().map_err(TetraError::Serial)?;

    for port in &ports {
        debug!("found port: {} ({:?})", port.port_name, port.port_type);
        if let SerialPortType::UsbPort(_) = &port.port_type {
            info!("using {} as modem port", port.port_name);
            return Ok(port.port_name.clone());
        }
    }

    if ports.is_empty() {
        warn!("no serial ports found");
    } else {
        warn!("no USB serial port among {} port(s):", ports.len());
        for port in &ports {
            warn!("  {} ({:?})", port.port_name, port.port_type);
        }
    }

    Err(TetraError::PortNotFound)
}

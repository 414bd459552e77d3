use std::io;
use std::time::Duration;

pub mod serial;

/// A byte-oriented transport to the TETRA modem.
///
/// Implementors provide read/write access to a serial-like connection.
/// The transport is synchronous and blocking; the decode pipeline itself
/// never blocks.
pub trait Transport: Send {
    /// Write all bytes to the transport.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;

    /// Read bytes into the buffer. Returns the number of bytes read.
    /// Should return `Ok(0)` or `Err(TimedOut)` on timeout, not block forever.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Set the read timeout for subsequent `read()` calls.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

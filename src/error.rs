use thiserror::Error;

pub type Result<T> = std::result::Result<T, TetraError>;

/// Errors from the serial link and device setup.
///
/// Nothing inside the decode pipeline is fatal: parse problems are contained
/// per chunk, frame or field and surfaced through the log plus best-effort
/// output messages, never as an error from a decode call.
#[derive(Debug, Error)]
pub enum TetraError {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no serial port matched the TETRA modem")]
    PortNotFound,

    #[error("gave up reconnecting after {0} attempts")]
    RetriesExhausted(u32),
}

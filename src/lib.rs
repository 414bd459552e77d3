pub mod command;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod lexer;
pub mod link;
pub mod location;
pub mod mappings;
pub mod message;
pub mod transport;

pub use decoder::Decoder;
pub use error::{Result, TetraError};
pub use link::{Link, LinkConfig};
pub use message::{FieldMap, OutputMessage, Sink, Value};

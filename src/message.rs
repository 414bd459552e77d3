use std::collections::BTreeMap;
use std::fmt;

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Returns `true` for values the emission filter drops: empty strings,
    /// integer zero and float zero.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Int(n) => *n == 0,
            Value::Float(x) => *x == 0.0,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// Field name to value mapping for one decoded frame.
///
/// Built fresh per frame so stale values cannot leak between frames.
pub type FieldMap = BTreeMap<String, Value>;

/// One entity update payload: a message key plus its decoded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputMessage {
    pub key: String,
    pub fields: FieldMap,
}

impl OutputMessage {
    pub fn new(key: String, fields: FieldMap) -> Self {
        Self { key, fields }
    }

    /// Drop default-valued fields before emission. Empty strings, zero
    /// integers and zero floats carry no information for the sink.
    pub fn filtered(mut self) -> Self {
        self.fields.retain(|_, value| !value.is_default());
        self
    }
}

/// Receives one update per decoded frame. Updates are delivered in frame
/// order, never batched across a chunk.
pub trait Sink {
    fn update(&mut self, message: OutputMessage);
}

/// Serial link state reported alongside protocol traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Reconnecting,
    Disconnected,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Build the link-state update message.
pub fn connection_status_message(status: ConnectionStatus) -> OutputMessage {
    let mut fields = FieldMap::new();
    fields.insert("connection_status".into(), Value::from(status.as_str()));
    fields.insert("validity".into(), Value::from("valid"));
    OutputMessage::new("connection_status".into(), fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert!(Value::Text(String::new()).is_default());
        assert!(Value::Int(0).is_default());
        assert!(Value::Float(0.0).is_default());
        assert!(!Value::Text("x".into()).is_default());
        assert!(!Value::Int(-1).is_default());
        assert!(!Value::Float(0.5).is_default());
    }

    #[test]
    fn test_filtered_drops_defaults() {
        let mut fields = FieldMap::new();
        fields.insert("keep".into(), Value::from("value"));
        fields.insert("empty".into(), Value::from(""));
        fields.insert("zero".into(), Value::Int(0));
        let message = OutputMessage::new("key".into(), fields).filtered();
        assert_eq!(message.fields.len(), 1);
        assert!(message.fields.contains_key("keep"));
    }

    #[test]
    fn test_connection_status_message() {
        let message = connection_status_message(ConnectionStatus::Reconnecting);
        assert_eq!(message.key, "connection_status");
        assert_eq!(
            message.fields.get("connection_status"),
            Some(&Value::from("reconnecting"))
        );
        assert_eq!(message.fields.get("validity"), Some(&Value::from("valid")));
    }
}

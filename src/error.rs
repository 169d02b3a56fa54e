//! Error types for the partitioned generator source
//!
//! This layer performs no local recovery: every failure is either structural
//! (bad descriptor bytes, missing store entry) or a caller error (bad
//! function), and surfaces unchanged to the invoking worker/task framework,
//! which owns retry and failure-reporting policy.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GenSourceError {
    /// Split descriptor bytes are malformed or truncated
    CorruptDescriptor(String),
    /// The distribution store has no entry for the requested key
    KeyNotFound(String),
    /// The generator function failed while evaluating an index
    FunctionEvaluation { index: u64, message: String },
    /// `current()` was called before the first successful `advance()` or
    /// after the range was exhausted
    NoCurrentValue,
    /// Configuration error (missing or unparseable property)
    Configuration(String),
    /// Serialization error on the encode path
    Serialization(String),
    /// No registered factory for a function opcode
    UnknownFunction(String),
}

impl fmt::Display for GenSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenSourceError::CorruptDescriptor(msg) => {
                write!(f, "Corrupt split descriptor: {}", msg)
            }
            GenSourceError::KeyNotFound(key) => {
                write!(f, "Key not found in distribution store: {}", key)
            }
            GenSourceError::FunctionEvaluation { index, message } => {
                write!(f, "Function evaluation failed at index {}: {}", index, message)
            }
            GenSourceError::NoCurrentValue => {
                write!(f, "No current value: reader has not produced one")
            }
            GenSourceError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            GenSourceError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            GenSourceError::UnknownFunction(name) => {
                write!(f, "Unknown generator function: {}", name)
            }
        }
    }
}

impl Error for GenSourceError {}

impl From<serde_json::Error> for GenSourceError {
    fn from(err: serde_json::Error) -> Self {
        GenSourceError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = GenSourceError::KeyNotFound("gensource.f7".to_string());
        assert!(err.to_string().contains("gensource.f7"));

        let err = GenSourceError::FunctionEvaluation {
            index: 42,
            message: "overflow".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("42"));
        assert!(rendered.contains("overflow"));
    }

    #[test]
    fn test_json_errors_map_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GenSourceError = json_err.into();
        assert!(matches!(err, GenSourceError::Serialization(_)));
    }
}

//! Job-scoped configuration surface
//!
//! The source owns two integer properties under a private namespace (the
//! total count and the instance id), written at submission time and read at
//! planning time. The parallelism hint is ambient job configuration, read
//! but never written by this crate.

use crate::error::GenSourceError;
use std::collections::HashMap;

/// Total element count, written by the façade at submission time.
pub const COUNT_KEY: &str = "gensource.count";

/// Source instance id, written by the façade at submission time.
pub const INSTANCE_ID_KEY: &str = "gensource.id";

/// Desired number of splits. Ambient job configuration, a hint rather than
/// a hard bound.
pub const PARALLELISM_KEY: &str = "gensource.parallelism";

/// String property map shared across the job, in the style of the
/// surrounding pipeline's configuration objects.
#[derive(Debug, Clone, Default)]
pub struct JobConfig {
    properties: HashMap<String, String>,
}

impl JobConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    /// Create a configuration from an existing property map.
    pub fn from_properties(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Get a raw property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|v| v.as_str())
    }

    /// Set a raw property value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.properties.insert(key.to_string(), value.into());
    }

    /// Set an integer property.
    pub fn set_u64(&mut self, key: &str, value: u64) {
        self.set(key, value.to_string());
    }

    /// Get an integer property, if present.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, GenSourceError> {
        match self.properties.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<u64>().map(Some).map_err(|_| {
                GenSourceError::Configuration(format!(
                    "property '{}' is not an integer: '{}'",
                    key, raw
                ))
            }),
        }
    }

    /// Get an integer property, failing if absent.
    pub fn require_u64(&self, key: &str) -> Result<u64, GenSourceError> {
        self.get_u64(key)?.ok_or_else(|| {
            GenSourceError::Configuration(format!("missing required property '{}'", key))
        })
    }

    /// The ambient parallelism hint, defaulting to 1. A configured value of
    /// 0 is clamped to 1, since the hint is a lower-bounded divisor.
    pub fn parallelism_hint(&self) -> Result<u64, GenSourceError> {
        Ok(self.get_u64(PARALLELISM_KEY)?.unwrap_or(1).max(1))
    }
}

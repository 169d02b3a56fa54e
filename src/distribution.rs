//! Closure distribution boundary
//!
//! The serialized generator function is published once at submission time
//! and retrieved once per worker, keyed by a namespaced string built from
//! the source instance id. The store itself is an external collaborator
//! (a job-scoped key-value blob store); this module specifies the boundary
//! trait and ships an in-memory implementation for local mode and tests.
//!
//! Consistency contract: a `put` before job start is visible to all `get`s
//! during job execution (single writer, multiple readers, all writes
//! happen-before any read). The store is responsible for its own internal
//! consistency beyond that.

use crate::error::GenSourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Namespace prefix for store keys, to avoid collisions with unrelated
/// job configuration.
const KEY_NAMESPACE: &str = "gensource";

/// Build the store key for a source instance's function payload.
pub fn function_key(instance_id: u64) -> String {
    format!("{}.f{}", KEY_NAMESPACE, instance_id)
}

/// Key-value blob store used to publish a value once and retrieve it on
/// every worker.
#[async_trait]
pub trait DistributionStore: Send + Sync {
    /// Store an opaque blob under a key. Overwrites any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), GenSourceError>;

    /// Retrieve the blob stored under a key, failing with
    /// [`GenSourceError::KeyNotFound`] if absent.
    async fn get(&self, key: &str) -> Result<Vec<u8>, GenSourceError>;
}

/// Process-local store for local execution and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DistributionStore for InMemoryStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), GenSourceError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, GenSourceError> {
        self.entries
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| GenSourceError::KeyNotFound(key.to_string()))
    }
}

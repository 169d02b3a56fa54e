//! Source instance id allocation
//!
//! Multiple generator sources used in the same job must not collide when
//! storing their distributed functions, so each source instance gets a
//! unique integer id. The allocator is an explicit object with a documented
//! lifecycle: created once per planning context and threaded through every
//! façade call in that context, never a process-wide global.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out monotonically increasing ids, unique for the lifetime of the
/// allocator. Thread-safe under concurrent calls; infallible.
#[derive(Debug, Default)]
pub struct InstanceIdAllocator {
    counter: AtomicU64,
}

impl InstanceIdAllocator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Allocate the next instance id. Called exactly once per source
    /// instance creation.
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

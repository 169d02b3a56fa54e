//! Worker-side lazy range iteration
//!
//! A [`RangeReader`] consumes one split descriptor and evaluates the
//! generator function over its range, one value at a time, in strictly
//! ascending index order, synchronously. It holds no external resources:
//! abrupt termination between `advance()` calls is safe and `close()` has
//! nothing to release.

use crate::error::GenSourceError;
use crate::function::{FunctionRegistry, GenFn, Value};
use crate::split::SplitDescriptor;
use log::debug;

/// Pull-based cursor over one partition. Invariant: `start <= index <= end`.
pub struct RangeReader {
    function: Box<dyn GenFn>,
    start: u64,
    end: u64,
    index: u64,
    current: Option<Value>,
}

impl RangeReader {
    /// Open a reader over a split, instantiating the generator function
    /// from its spec. Fails if the registry has no factory for the spec's
    /// opcode or the factory rejects its parameters.
    pub fn open(
        descriptor: &SplitDescriptor,
        registry: &FunctionRegistry,
    ) -> Result<Self, GenSourceError> {
        let function = registry.instantiate(descriptor.function())?;
        let start = descriptor.start();
        let end = start + descriptor.length();
        debug!(
            "opened range reader over [{}, {}) with function '{}'",
            start,
            end,
            descriptor.function().name
        );
        Ok(Self {
            function,
            start,
            end,
            index: start,
            current: None,
        })
    }

    /// Produce the next value. Returns `Ok(false)` once the range is
    /// exhausted. The function is invoked exactly once per index; a failure
    /// propagates immediately, and the reader must not be advanced again
    /// after one.
    pub fn advance(&mut self) -> Result<bool, GenSourceError> {
        if self.index >= self.end {
            self.current = None;
            return Ok(false);
        }
        let value = self.function.eval(self.index)?;
        self.current = Some(value);
        self.index += 1;
        Ok(true)
    }

    /// The most recently produced value. Fails with
    /// [`GenSourceError::NoCurrentValue`] before the first successful
    /// `advance()` and after exhaustion.
    pub fn current(&self) -> Result<&Value, GenSourceError> {
        self.current.as_ref().ok_or(GenSourceError::NoCurrentValue)
    }

    /// Fraction of the range consumed, in `[0, 1]`, monotonically
    /// non-decreasing. A zero-length range reports 1.0.
    pub fn progress(&self) -> f64 {
        let length = self.end - self.start;
        if length == 0 {
            1.0
        } else {
            (self.index - self.start) as f64 / length as f64
        }
    }

    /// No resources are held; present for interface symmetry with other
    /// sources.
    pub fn close(&mut self) {}
}

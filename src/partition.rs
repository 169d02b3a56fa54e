//! Contiguous range partitioning of the index space
//!
//! Splits `[0, n)` into consecutive chunks sized from a parallelism hint.
//! Partitioning is a pure function of `(n, hint)`: no randomness, no
//! ordering ambiguity, partitions in ascending start order.

/// A contiguous half-open index range `[start, start + length)` assigned to
/// one worker. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: u64,
    pub length: u64,
}

impl Partition {
    pub fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }

    /// Exclusive end of the range.
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Partition `[0, n)` into contiguous, non-overlapping ranges.
///
/// The chunk size is `n / hint`, clamped to at least 1 so a hint larger
/// than `n` still terminates with one-element chunks. All chunks have that
/// size except the final one, which absorbs the remainder and may be up to
/// twice as long. The hint is advisory: the actual partition count is
/// `n / chunk_size`, which can exceed the hint when the clamp kicks in.
///
/// `n = 0` yields zero partitions.
pub fn partition_range(n: u64, parallelism_hint: u64) -> Vec<Partition> {
    if n == 0 {
        return Vec::new();
    }
    let hint = parallelism_hint.max(1);
    let split_size = (n / hint).max(1);
    let count = n / split_size;

    let mut partitions = Vec::with_capacity(count as usize);
    let mut start = 0;
    for i in 0..count {
        let length = if i + 1 == count { n - start } else { split_size };
        partitions.push(Partition::new(start, length));
        start += length;
    }
    partitions
}

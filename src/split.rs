//! Split descriptors and their wire format
//!
//! A split descriptor is the unit of work shipped to one worker: one
//! partition of the index space plus the generator function. The function
//! spec is shared across all descriptors of one planning call, but each
//! descriptor writes its own encoded copy when serialized, since workers
//! run in separate processes; decoded descriptors are independent values.
//!
//! Wire layout, big-endian throughout:
//!
//! ```text
//! [start:4][length:4][payload_len:4][payload: payload_len bytes]
//! ```
//!
//! The payload is the JSON-serialized [`FunctionSpec`], length-prefixed so
//! the decoder knows exactly how many bytes to consume.

use crate::error::GenSourceError;
use crate::function::FunctionSpec;
use crate::partition::Partition;
use std::sync::Arc;

/// Three big-endian u32 fields precede the function payload.
const HEADER_LEN: usize = 12;

#[derive(Debug, Clone)]
pub struct SplitDescriptor {
    start: u64,
    length: u64,
    function: Arc<FunctionSpec>,
}

impl SplitDescriptor {
    pub fn new(partition: Partition, function: Arc<FunctionSpec>) -> Self {
        Self {
            start: partition.start,
            length: partition.length,
            function,
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Length of the partition this split covers.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn partition(&self) -> Partition {
        Partition::new(self.start, self.length)
    }

    pub fn function(&self) -> &FunctionSpec {
        &self.function
    }

    /// Data-locality hints. Always empty: values are synthesized, not read
    /// from storage.
    pub fn locations(&self) -> Vec<String> {
        Vec::new()
    }

    /// Serialize for transport to a worker.
    ///
    /// The wire fields are 32-bit; a partition that does not fit fails with
    /// [`GenSourceError::Serialization`].
    pub fn encode(&self) -> Result<Vec<u8>, GenSourceError> {
        let start = wire_u32("start", self.start)?;
        let length = wire_u32("length", self.length)?;
        let payload = serde_json::to_vec(self.function.as_ref())?;
        let payload_len = wire_u32("function payload length", payload.len() as u64)?;

        let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
        buf.extend_from_slice(&start.to_be_bytes());
        buf.extend_from_slice(&length.to_be_bytes());
        buf.extend_from_slice(&payload_len.to_be_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Exact inverse of [`encode`](Self::encode).
    ///
    /// Truncated input, trailing bytes, or an unreadable function payload
    /// fail with [`GenSourceError::CorruptDescriptor`]; a partially-valid
    /// descriptor is never returned.
    pub fn decode(bytes: &[u8]) -> Result<Self, GenSourceError> {
        if bytes.len() < HEADER_LEN {
            return Err(GenSourceError::CorruptDescriptor(format!(
                "header truncated: {} of {} bytes",
                bytes.len(),
                HEADER_LEN
            )));
        }
        let start = read_u32(bytes, 0);
        let length = read_u32(bytes, 4);
        let payload_len = read_u32(bytes, 8) as usize;

        let body = &bytes[HEADER_LEN..];
        if body.len() < payload_len {
            return Err(GenSourceError::CorruptDescriptor(format!(
                "function payload truncated: {} of {} bytes",
                body.len(),
                payload_len
            )));
        }
        if body.len() > payload_len {
            return Err(GenSourceError::CorruptDescriptor(format!(
                "{} trailing bytes after function payload",
                body.len() - payload_len
            )));
        }

        let function: FunctionSpec = serde_json::from_slice(body).map_err(|e| {
            GenSourceError::CorruptDescriptor(format!("unreadable function payload: {}", e))
        })?;

        Ok(Self {
            start: start as u64,
            length: length as u64,
            function: Arc::new(function),
        })
    }
}

impl PartialEq for SplitDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.length == other.length
            && *self.function == *other.function
    }
}

fn wire_u32(field: &str, value: u64) -> Result<u32, GenSourceError> {
    u32::try_from(value).map_err(|_| {
        GenSourceError::Serialization(format!(
            "descriptor {} {} exceeds the 32-bit wire field",
            field, value
        ))
    })
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut field = [0u8; 4];
    field.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(field)
}

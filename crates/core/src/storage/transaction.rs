//! Storage transaction results.
//!
//! Every read or write against a storage backend produces a [`Transaction`]
//! describing what happened: the payload moved, the accumulated latency, and
//! how deep in the hierarchy the data was ultimately found.

use crate::common::Data;

/// Direction of a storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Data flows out of the storage.
    Read,
    /// Data flows into the storage.
    Write,
}

/// Hit level reported when an operation touched no storage below the
/// current level (e.g. a full-line write allocated without a fill).
pub const NO_DEEPER_ACCESS: i32 = -1;

/// Result of one storage backend operation.
///
/// `hit_level` counts storage levels below the requester: 0 means the data
/// was found at the level that was asked, N > 0 means it was found N levels
/// deeper, and [`NO_DEEPER_ACCESS`] means the operation completed without
/// touching any deeper storage. Transient value, never persisted.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Direction of the access.
    pub kind: AccessKind,
    /// Byte address the access started at.
    pub address: u64,
    /// Accumulated latency of the access in cycles.
    pub latency: u64,
    /// Depth at which the access was satisfied.
    pub hit_level: i32,
    /// Payload read or written.
    pub data: Data,
}

impl Transaction {
    /// Creates a read-kind transaction result.
    pub fn read(address: u64, latency: u64, hit_level: i32, data: Data) -> Self {
        Self {
            kind: AccessKind::Read,
            address,
            latency,
            hit_level,
            data,
        }
    }

    /// Creates a write-kind transaction result.
    pub fn write(address: u64, latency: u64, hit_level: i32, data: Data) -> Self {
        Self {
            kind: AccessKind::Write,
            address,
            latency,
            hit_level,
            data,
        }
    }
}

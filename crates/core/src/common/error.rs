//! Error types for the cache hierarchy simulator.
//!
//! Every failure is unrecoverable at the point of detection and aborts the
//! triggering operation; a silently-wrong cache state would invalidate every
//! subsequent simulated transaction, so nothing is swallowed or logged and
//! continued.

use thiserror::Error;

/// Errors surfaced by storage operations and hierarchy construction.
#[derive(Debug, Error)]
pub enum SimError {
    /// A cache line update received a payload whose length disagrees with
    /// the configured line size.
    #[error("payload of {actual} bytes does not match cache line size {expected}")]
    SizeMismatch {
        /// Configured cache line size in bytes.
        expected: usize,
        /// Length of the offending payload.
        actual: usize,
    },

    /// An access on the leaf memory falls outside its capacity.
    #[error("address {address:#x} + {len} is out of range for size {size:#x}")]
    OutOfRange {
        /// Start address of the access.
        address: u64,
        /// Length of the access in bytes.
        len: usize,
        /// Capacity of the storage in bytes.
        size: usize,
    },

    /// A hierarchy or cache parameter is malformed: an unknown replacement
    /// policy, a missing required field, a dependency name that does not
    /// resolve, or a geometry that is not a power of two.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A memory image file could not be read or written.
    #[error("memory file i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

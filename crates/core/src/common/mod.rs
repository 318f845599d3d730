//! Common value types shared across the cache hierarchy simulator.
//!
//! This module provides fundamental building blocks used by every storage
//! component. It includes:
//! 1. **Byte Buffers:** The [`Data`] payload type carried by all transactions.
//! 2. **Error Handling:** The [`SimError`] type surfaced by fallible operations.
//! 3. **Latency Arithmetic:** The batched multi-block access latency rule.

/// Fixed-length byte buffer with typed little-endian accessors.
pub mod data;

/// Error types for storage, cache, and configuration failures.
pub mod error;

/// Latency aggregation for multi-block accesses.
pub mod latency;

pub use data::Data;
pub use error::SimError;
pub use latency::multi_block_access_latency;

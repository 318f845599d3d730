//! Cache hierarchy simulator library.
//!
//! This crate implements a cycle-accurate, byte-exact simulator for
//! configurable cache hierarchies with the following:
//! 1. **Storage:** A uniform read/write/reset interface over every level,
//!    from set-associative caches down to the backing leaf memory.
//! 2. **Caches:** Set-associative lookup with configurable geometry,
//!    write-allocate/write-through policies, and pluggable replacement.
//! 3. **Hierarchy:** Declarative composition of cache chains from a JSON
//!    configuration, driven as a single storage endpoint.
//! 4. **Timing:** Per-access latency accounting, including multi-block
//!    parallelism across cache-line chunks.
//! 5. **Tracing:** Per-access event hooks for instrumentation, backed by
//!    the `tracing` ecosystem.

/// Set-associative cache (lines, sets, replacement policies, the cache itself).
pub mod cache;
/// Common types (data buffers, errors, latency accounting).
pub mod common;
/// Hierarchy configuration (defaults, enums, per-storage config structures).
pub mod config;
/// Hierarchy composition (build order, entry point, flush/reset).
pub mod hierarchy;
/// Storage interface, transactions, and the leaf memory model.
pub mod storage;
/// Access event tracing hooks.
pub mod trace;

/// Byte buffer with typed accessors; the unit of all simulated transfers.
pub use crate::common::Data;
/// Error type for every fallible operation in the crate.
pub use crate::common::SimError;
/// Top-level configuration; deserialize from JSON with `HierarchyConfig::from_json`.
pub use crate::config::HierarchyConfig;
/// A linear cache chain over a leaf memory; construct with `MemoryHierarchy::new`.
pub use crate::hierarchy::MemoryHierarchy;
/// A single set-associative cache level.
pub use crate::cache::SetAssociativeCache;
/// Uniform storage interface implemented by every hierarchy level.
pub use crate::storage::DataStorage;
/// Flat backing memory with fixed latencies.
pub use crate::storage::FakeMemory;
/// Shared handle to a storage level.
pub use crate::storage::SharedStorage;
/// Result of one storage access (latency, hit level, data).
pub use crate::storage::Transaction;
/// Read/write discriminant carried by a [`Transaction`].
pub use crate::storage::AccessKind;

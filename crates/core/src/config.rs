//! Configuration for cache hierarchies.
//!
//! This module defines the declarative description a [`crate::hierarchy::MemoryHierarchy`]
//! is built from. It provides:
//! 1. **Structures:** One entry per storage node (leaf memory or cache level).
//! 2. **Enums:** Node type tags and replacement policy selection.
//! 3. **Parsing:** JSON deserialization via serde with per-field defaults.
//!
//! A document is a `data_storages` list; each entry carries a `name`, a
//! `type` tag (`"FakeMemory"` or `"SetAssociativeCache"`), and type-specific
//! fields. Cache entries name their next level via `next_level_data_storage`.
//!
//! # Example
//!
//! ```
//! use cachesim_core::config::HierarchyConfig;
//!
//! let json = r#"{
//!     "data_storages": [
//!         {
//!             "type": "SetAssociativeCache",
//!             "name": "l1",
//!             "next_level_data_storage": "mem0",
//!             "write_allocate": true,
//!             "write_through": false,
//!             "miss_latency": 10,
//!             "hit_latency": 1,
//!             "cache_block_size": 64,
//!             "sets": 64,
//!             "ways": 8,
//!             "replacement_policy": "LRU",
//!             "multi_block_access": 4
//!         },
//!         {
//!             "type": "FakeMemory",
//!             "name": "mem0",
//!             "size": 1048576,
//!             "read_latency": 100,
//!             "write_latency": 120
//!         }
//!     ]
//! }"#;
//!
//! let config = HierarchyConfig::from_json(json).unwrap();
//! assert_eq!(config.data_storages.len(), 2);
//! ```

use serde::Deserialize;

use crate::common::SimError;

/// Default configuration constants applied when a field is omitted.
mod defaults {
    /// Default multi-block access parallelism (fully sequential).
    pub const MULTI_BLOCK_ACCESS: usize = 1;
}

/// Replacement policy algorithms selectable per cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicyKind {
    /// Least Recently Used: evicts the way untouched for the longest time.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
}

/// Declarative description of one whole hierarchy.
#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyConfig {
    /// Storage nodes, outermost level declared first.
    pub data_storages: Vec<StorageConfig>,
}

impl HierarchyConfig {
    /// Parses a hierarchy description from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the document is
    /// malformed, a required field is missing, or an enum value (such as a
    /// replacement policy name) is unknown.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|e| SimError::InvalidConfiguration(e.to_string()))
    }
}

/// One storage node: a leaf memory or a set-associative cache level.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StorageConfig {
    /// Terminal flat memory; instantiated first, depends on nothing.
    FakeMemory(MemoryConfig),
    /// Cache level; depends on the node named by `next_level_data_storage`.
    SetAssociativeCache(CacheConfig),
}

impl StorageConfig {
    /// Returns the configured node name.
    pub fn name(&self) -> &str {
        match self {
            Self::FakeMemory(m) => &m.name,
            Self::SetAssociativeCache(c) => &c.name,
        }
    }
}

/// Leaf memory parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Node name, referenced by cache levels.
    pub name: String,

    /// Capacity in bytes.
    pub size: usize,

    /// Cycles charged per read transaction.
    pub read_latency: u64,

    /// Cycles charged per write transaction.
    pub write_latency: u64,
}

/// Cache level parameters, immutable after construction.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Node name, referenced by outer cache levels.
    pub name: String,

    /// Name of the storage this level forwards misses and write-backs to.
    pub next_level_data_storage: String,

    /// On a write miss, load the target line before applying the write.
    pub write_allocate: bool,

    /// Propagate every write to the next level immediately.
    pub write_through: bool,

    /// Cycles charged when a lookup misses at this level.
    pub miss_latency: u64,

    /// Cycles charged when a lookup hits at this level.
    pub hit_latency: u64,

    /// Cache line size in bytes; must be a power of two.
    pub cache_block_size: usize,

    /// Number of sets; must be a power of two.
    pub sets: usize,

    /// Number of ways (lines per set).
    pub ways: usize,

    /// Victim selection algorithm.
    #[serde(default)]
    pub replacement_policy: ReplacementPolicyKind,

    /// Number of line-sized blocks accessed in parallel by one transaction.
    #[serde(default = "CacheConfig::default_multi_block_access")]
    pub multi_block_access: usize,
}

impl CacheConfig {
    /// Returns the default multi-block access parallelism.
    fn default_multi_block_access() -> usize {
        defaults::MULTI_BLOCK_ACCESS
    }
}

//! Memory hierarchy composition.
//!
//! A [`MemoryHierarchy`] builds a linear chain of cache levels terminating
//! in a leaf memory from a declarative [`HierarchyConfig`] and exposes the
//! whole chain as a single storage endpoint:
//! 1. **Validation:** Every `next_level_data_storage` must name a declared node.
//! 2. **Ordering:** Nodes are instantiated leaf-first so each cache is wired
//!    to an already-built next level.
//! 3. **Entry Point:** The outermost (first-declared) level serves `read`
//!    and `write`; the leaf memory stays reachable for seeding/inspection.
//!
//! The ordering pass only terminates for strictly linear chains: one cache
//! feeding exactly one next level, ending in one leaf. Branching or
//! diamond-shaped hierarchies are rejected as unresolvable; their semantics
//! are deliberately not defined here.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::cache::SetAssociativeCache;
use crate::common::{Data, SimError};
use crate::config::{HierarchyConfig, StorageConfig};
use crate::storage::{FakeMemory, SharedStorage, Transaction};

/// A built hierarchy node; the closed set of storage types lets callers
/// match on concrete behavior (only cache levels flush) without any
/// runtime type inspection.
#[derive(Clone)]
pub enum StorageNode {
    /// A set-associative cache level.
    Cache(Rc<RefCell<SetAssociativeCache>>),
    /// The terminal leaf memory.
    Memory(Rc<RefCell<FakeMemory>>),
}

impl StorageNode {
    /// Returns this node as an untyped storage handle.
    fn as_storage(&self) -> SharedStorage {
        match self {
            Self::Cache(cache) => cache.clone(),
            Self::Memory(memory) => memory.clone(),
        }
    }
}

/// A linear chain of cache levels over one leaf memory, driven as a single
/// storage endpoint.
pub struct MemoryHierarchy {
    /// Nodes with their names, outermost level first.
    nodes: Vec<(String, StorageNode)>,
    /// Entry point for all reads and writes (the outermost level).
    top: SharedStorage,
    /// The terminal memory, kept typed for direct seeding/inspection.
    leaf: Rc<RefCell<FakeMemory>>,
}

impl std::fmt::Debug for MemoryHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHierarchy")
            .field(
                "nodes",
                &self.nodes.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl MemoryHierarchy {
    /// Builds a hierarchy from its declarative configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the node list is
    /// empty, a name is duplicated, a referenced dependency is undeclared,
    /// no leaf memory exists, or the dependency graph is not a linear
    /// chain; cache construction errors (bad geometry) propagate as-is.
    pub fn new(config: &HierarchyConfig) -> Result<Self, SimError> {
        if config.data_storages.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "hierarchy declares no data storages".into(),
            ));
        }

        let mut by_name: HashMap<&str, &StorageConfig> = HashMap::new();
        for node in &config.data_storages {
            if by_name.insert(node.name(), node).is_some() {
                return Err(SimError::InvalidConfiguration(format!(
                    "duplicate data storage name '{}'",
                    node.name()
                )));
            }
        }

        // Every declared dependency must resolve to a declared node.
        for node in &config.data_storages {
            if let StorageConfig::SetAssociativeCache(cache) = node {
                if !by_name.contains_key(cache.next_level_data_storage.as_str()) {
                    return Err(SimError::InvalidConfiguration(format!(
                        "'{}' references unknown next level '{}'",
                        cache.name, cache.next_level_data_storage
                    )));
                }
            }
        }

        // Leaf-first topological order. Memories have no dependency and go
        // first; each pass then places every cache whose next level is
        // already placed. A pass that places nothing means the chain does
        // not resolve (a cycle or a non-linear shape).
        let mut order: Vec<&str> = config
            .data_storages
            .iter()
            .filter(|node| matches!(node, StorageConfig::FakeMemory(_)))
            .map(StorageConfig::name)
            .collect();

        if order.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "hierarchy declares no leaf memory".into(),
            ));
        }

        while order.len() < config.data_storages.len() {
            let placed_before = order.len();

            for node in &config.data_storages {
                if order.contains(&node.name()) {
                    continue;
                }
                if let StorageConfig::SetAssociativeCache(cache) = node {
                    if order.contains(&cache.next_level_data_storage.as_str()) {
                        order.push(node.name());
                    }
                }
            }

            if order.len() == placed_before {
                return Err(SimError::InvalidConfiguration(
                    "data storage dependencies do not form a linear chain".into(),
                ));
            }
        }

        // Instantiate in that order, wiring each cache to its already-built
        // next level.
        let mut built: HashMap<String, StorageNode> = HashMap::new();
        let mut leaf = None;

        for name in &order {
            let node = by_name[name];
            let storage_node = match node {
                StorageConfig::FakeMemory(memory) => {
                    let memory = Rc::new(RefCell::new(FakeMemory::new(
                        memory.name.clone(),
                        memory.size,
                        memory.read_latency,
                        memory.write_latency,
                    )));
                    if leaf.is_none() {
                        leaf = Some(memory.clone());
                    }
                    StorageNode::Memory(memory)
                }
                StorageConfig::SetAssociativeCache(cache) => {
                    let next_level = built[cache.next_level_data_storage.as_str()].as_storage();
                    StorageNode::Cache(Rc::new(RefCell::new(SetAssociativeCache::new(
                        cache, next_level,
                    )?)))
                }
            };
            // Names were deduplicated above, so this never displaces.
            let _ = built.insert((*name).to_string(), storage_node);
        }

        // The outermost level is built last; store nodes outermost-first.
        let nodes: Vec<(String, StorageNode)> = order
            .iter()
            .rev()
            .map(|name| ((*name).to_string(), built[*name].clone()))
            .collect();

        let top = nodes[0].1.as_storage();
        let leaf = match leaf {
            Some(leaf) => leaf,
            None => {
                return Err(SimError::InvalidConfiguration(
                    "hierarchy declares no leaf memory".into(),
                ));
            }
        };

        Ok(Self { nodes, top, leaf })
    }

    /// Parses a JSON document and builds the hierarchy it describes.
    ///
    /// # Errors
    ///
    /// See [`HierarchyConfig::from_json`] and [`MemoryHierarchy::new`].
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Self::new(&HierarchyConfig::from_json(json)?)
    }

    /// Reads `num_bytes` at `address` through the outermost level.
    ///
    /// # Errors
    ///
    /// Propagates any error from the chain (e.g. an out-of-range access on
    /// the leaf memory).
    pub fn read(&mut self, address: u64, num_bytes: usize) -> Result<Transaction, SimError> {
        self.top.borrow_mut().read(address, num_bytes)
    }

    /// Writes `data` at `address` through the outermost level.
    ///
    /// # Errors
    ///
    /// Propagates any error from the chain.
    pub fn write(&mut self, address: u64, data: &Data) -> Result<Transaction, SimError> {
        self.top.borrow_mut().write(address, data)
    }

    /// Flushes every cache level, outermost to innermost, draining all
    /// dirty lines down to the leaf memory. Returns a synthetic write
    /// result summing the flush latencies.
    ///
    /// # Errors
    ///
    /// Propagates any error from the write-backs.
    pub fn flush_all_caches(&mut self) -> Result<Transaction, SimError> {
        let mut latency = 0;

        for (_, node) in &self.nodes {
            if let StorageNode::Cache(cache) = node {
                let flushed = cache.borrow_mut().flush()?;
                latency += flushed.latency;
            }
        }

        Ok(Transaction::write(0, latency, 0, Data::new(0)))
    }

    /// Resets every level, discarding all cached state and zeroing the
    /// leaf memory.
    pub fn reset(&mut self) {
        for (_, node) in &self.nodes {
            node.as_storage().borrow_mut().reset();
        }
    }

    /// Returns the storage names, outermost level first.
    pub fn storage_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the built node registered under `name`, if any.
    pub fn node(&self, name: &str) -> Option<&StorageNode> {
        self.nodes
            .iter()
            .find(|(node_name, _)| node_name == name)
            .map(|(_, node)| node)
    }

    /// Returns the leaf memory for direct seeding and inspection by test
    /// harnesses; simulation traffic goes through [`MemoryHierarchy::read`]
    /// and [`MemoryHierarchy::write`].
    pub fn leaf_memory(&self) -> Rc<RefCell<FakeMemory>> {
        self.leaf.clone()
    }
}

//! Storage backends and the contract between hierarchy levels.
//!
//! This module defines:
//! 1. **Contract:** The [`DataStorage`] trait every hierarchy level satisfies.
//! 2. **Results:** The [`Transaction`] type produced by every operation.
//! 3. **Leaf Memory:** [`FakeMemory`], the flat terminal storage.

/// Leaf memory implementation backed by a flat byte array.
pub mod memory;

/// Transaction result types for storage operations.
pub mod transaction;

pub use memory::FakeMemory;
pub use transaction::{AccessKind, NO_DEEPER_ACCESS, Transaction};

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::{Data, SimError};

/// Shared handle to a storage level.
///
/// The simulator is single-threaded and synchronous, so
/// plain `Rc<RefCell<..>>` sharing is sufficient: a cache level and the
/// hierarchy composer can both hold the same next-level backend.
pub type SharedStorage = Rc<RefCell<dyn DataStorage>>;

/// Contract satisfied by every storage level in a hierarchy.
///
/// A cache level's "next level" and the leaf memory both implement this
/// trait; communication between levels happens strictly through it. All
/// calls run to completion before returning; the simulator is synchronous
/// and single-threaded by design.
pub trait DataStorage {
    /// Returns the name this storage was configured with.
    fn name(&self) -> &str;

    /// Returns the capacity of this storage in bytes.
    fn size(&self) -> usize;

    /// Reads `num_bytes` starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the span exceeds the leaf
    /// memory's capacity.
    fn read(&mut self, address: u64, num_bytes: usize) -> Result<Transaction, SimError>;

    /// Writes `data` starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the span exceeds the leaf
    /// memory's capacity.
    fn write(&mut self, address: u64, data: &Data) -> Result<Transaction, SimError>;

    /// Discards all contents, returning the storage to its initial state.
    fn reset(&mut self);
}

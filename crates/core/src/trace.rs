//! Per-access decision tracing.
//!
//! Cache levels can report every hit, miss, eviction, and write-back to an
//! injected [`AccessListener`]. The listener is an optional collaborator
//! supplied at construction; when absent, reporting is skipped entirely and
//! the hot path carries no conditional compilation.

use crate::storage::AccessKind;

/// What the cache decided to do with one aligned access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The tag was found in the target set.
    Hit,
    /// The tag was absent; a free way was filled.
    MissFill,
    /// The tag was absent and a victim way was reused.
    MissEvict,
    /// A valid, dirty victim line was committed to the next level.
    WriteBack,
    /// A cached write was additionally propagated to the next level.
    WriteThrough,
    /// A non-allocating write was forwarded without caching.
    Forward,
}

/// One structured access-decision event.
#[derive(Debug, Clone, Copy)]
pub struct AccessEvent<'a> {
    /// Name of the cache level reporting the event.
    pub level: &'a str,
    /// Direction of the triggering transaction.
    pub kind: AccessKind,
    /// Address of the aligned sub-access.
    pub address: u64,
    /// Set index the address decomposed to.
    pub set: u64,
    /// Way the decision applied to; `None` for forwarded accesses that
    /// never selected a way.
    pub way: Option<usize>,
    /// The decision itself.
    pub outcome: AccessOutcome,
}

/// Receiver for cache access decisions.
pub trait AccessListener {
    /// Called once per decision, in the order decisions are made.
    fn on_access(&mut self, event: &AccessEvent<'_>);
}

/// Listener that forwards every event to the `tracing` crate at DEBUG level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl AccessListener for TracingListener {
    fn on_access(&mut self, event: &AccessEvent<'_>) {
        tracing::debug!(
            level = event.level,
            kind = ?event.kind,
            address = format_args!("{:#x}", event.address),
            set = event.set,
            way = ?event.way,
            outcome = ?event.outcome,
            "cache access"
        );
    }
}

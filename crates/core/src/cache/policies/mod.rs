//! Eviction policies for cache sets.
//!
//! A policy tracks access recency over the way indices of one set and
//! chooses a victim when every way is occupied. Free-way selection happens
//! upstream in the set, so a policy is only consulted when no free way
//! exists.

/// Least Recently Used eviction policy.
pub mod lru;

pub use lru::LruPolicy;

use crate::config::ReplacementPolicyKind;

/// Trait for eviction policies scoped to one cache set.
pub trait ReplacementPolicy {
    /// Records an access to `way`, making it the most recently used.
    ///
    /// Called explicitly by the cache level after every hit, fill, and
    /// eviction; updating a line never touches the policy implicitly.
    fn touch(&mut self, way: usize);

    /// Returns the way to evict, without removing it from the policy.
    ///
    /// The next `touch` on that way re-inserts it at the most-recently-used
    /// end, which represents the reuse that follows an eviction and fill.
    fn victim(&self) -> usize;
}

/// Builds the policy instance for one set.
pub fn build_policy(kind: ReplacementPolicyKind, ways: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        ReplacementPolicyKind::Lru => Box::new(LruPolicy::new(ways)),
    }
}

//! Cache sets: the ways selected by one index value.

use crate::cache::line::CacheLine;
use crate::cache::policies::{ReplacementPolicy, build_policy};
use crate::common::{Data, SimError};
use crate::config::ReplacementPolicyKind;

/// A fixed number of cache lines ("ways") plus one eviction policy instance
/// scoped to exactly those way indices.
///
/// The cache level always supplies internally-derived way indices, so the
/// accessors index directly without re-validating. At most one valid line
/// per set carries a given tag; the level guarantees this by looking up
/// before allocating.
pub struct CacheSet {
    lines: Vec<CacheLine>,
    policy: Box<dyn ReplacementPolicy>,
}

impl CacheSet {
    /// Creates a set of `ways` invalid lines of `line_size` bytes each.
    pub fn new(line_size: usize, ways: usize, policy_kind: ReplacementPolicyKind) -> Self {
        Self {
            lines: vec![CacheLine::new(line_size); ways],
            policy: build_policy(policy_kind, ways),
        }
    }

    /// Returns the way holding a valid line with `tag`, if any.
    ///
    /// Invalid lines never match: a stale tag left behind by a reset or an
    /// unfilled way must not be reported as a hit.
    pub fn find_way_with_tag(&self, tag: u64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.is_valid() && line.tag() == tag)
    }

    /// Returns the first invalid way, if any.
    pub fn find_free_way(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.is_valid())
    }

    /// Returns a copy of the payload in `way`.
    pub fn line_data(&self, way: usize) -> Data {
        self.lines[way].data()
    }

    /// Returns the tag held by `way`.
    pub fn line_tag(&self, way: usize) -> u64 {
        self.lines[way].tag()
    }

    /// Returns `true` if `way` holds a live block.
    pub fn is_way_valid(&self, way: usize) -> bool {
        self.lines[way].is_valid()
    }

    /// Returns `true` if `way` holds uncommitted bytes.
    pub fn is_way_dirty(&self, way: usize) -> bool {
        self.lines[way].is_dirty()
    }

    /// Writes through to the line in `way`.
    ///
    /// Does NOT touch the eviction policy: the cache level calls
    /// [`CacheSet::touch`] explicitly after every access so that hits,
    /// fills, and evictions all update recency the same way.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SizeMismatch`] when `data` is not one line long.
    pub fn update_way(
        &mut self,
        way: usize,
        tag: u64,
        data: &Data,
        valid: bool,
        dirty: bool,
    ) -> Result<(), SimError> {
        self.lines[way].update(tag, data, valid, dirty)
    }

    /// Records an access to `way` in the eviction policy.
    pub fn touch(&mut self, way: usize) {
        self.policy.touch(way);
    }

    /// Returns the way the eviction policy would evict.
    pub fn victim_way(&self) -> usize {
        self.policy.victim()
    }
}

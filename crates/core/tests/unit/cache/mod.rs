//! Set-associative cache tests.
//!
//! This module organizes the cache coverage bottom-up: line and set
//! bookkeeping, replacement ordering, then the access algorithms of the
//! full cache level.



/// Unit tests for flushing dirty state down to the next level.
pub mod flush;

/// Unit tests for cache construction and geometry validation.
pub mod geometry;






/// Unit tests for write-allocate and write-through policy combinations.
pub mod write_policies;

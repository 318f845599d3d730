//! Cache line storage.

use crate::common::{Data, SimError};

/// One line (block) of cache storage: a fixed-size payload plus tag,
/// valid bit, and dirty bit.
///
/// Lines are created invalid when their owning set is constructed and are
/// reused in place for the lifetime of the cache; the payload length always
/// equals the configured line size.
#[derive(Clone)]
pub struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
    data: Data,
}

impl CacheLine {
    /// Creates an invalid line with a zeroed payload of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            tag: 0,
            valid: false,
            dirty: false,
            data: Data::new(size),
        }
    }

    /// Returns `true` if the line holds a live block.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns `true` if the line holds bytes not yet committed below.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the tag of the block currently held.
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// Returns a copy of the line payload.
    pub fn data(&self) -> Data {
        self.data.clone()
    }

    /// Overwrites tag, payload, and both state bits in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SizeMismatch`] when `data` is not exactly one
    /// line long; the line is left unchanged in that case.
    pub fn update(&mut self, tag: u64, data: &Data, valid: bool, dirty: bool) -> Result<(), SimError> {
        if data.len() != self.data.len() {
            return Err(SimError::SizeMismatch {
                expected: self.data.len(),
                actual: data.len(),
            });
        }

        self.tag = tag;
        self.valid = valid;
        self.dirty = dirty;
        self.data = data.clone();
        Ok(())
    }
}

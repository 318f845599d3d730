//! Set-associative cache levels.
//!
//! This module implements the algorithmic core of the simulator. A
//! [`SetAssociativeCache`] composes an array of [`set::CacheSet`]s, decodes
//! addresses into (tag, index, offset), splits arbitrary requests into
//! line-aligned sub-transactions, executes hit/miss/eviction logic, and
//! forwards misses and write-backs to a next-level storage backend.
//!
//! Geometry examples (`sets` x `ways`, one box per line):
//!
//! ```text
//! 8x1 direct-mapped        4x2 two-way              2x4 four-way
//! +--------+               +--------+               +--------+
//! |        | set 0         |        | set 0         |        | set 0
//! +--------+               |        |               |        |
//! |        | set 1         +--------+               |        |
//! +--------+               |        | set 1         |        |
//!   ...                    |        |               +--------+
//! +--------+               +--------+               |        | set 1
//! |        | set 7           ...                      ...
//! +--------+               +--------+               +--------+
//! ```
//!
//! `ways` is the number of lines per set; block size and set count must be
//! powers of two so the address fields are fixed-width bit ranges.

/// Cache line storage (tag, valid, dirty, payload).
pub mod line;

/// Eviction policy implementations.
pub mod policies;

/// Cache sets (the ways selected by one index value).
pub mod set;

use self::set::CacheSet;
use crate::common::{Data, SimError, multi_block_access_latency};
use crate::config::{CacheConfig, ReplacementPolicyKind};
use crate::storage::{AccessKind, DataStorage, NO_DEEPER_ACCESS, SharedStorage, Transaction};
use crate::trace::{AccessEvent, AccessListener, AccessOutcome};

/// One level of a cache hierarchy.
///
/// Configuration is immutable after construction; address masks are
/// computed once and reused for every access. Misses and write-backs go to
/// the `next_level` backend, which is either another cache level or the
/// leaf memory.
pub struct SetAssociativeCache {
    name: String,
    next_level: SharedStorage,
    write_allocate: bool,
    write_through: bool,
    miss_latency: u64,
    hit_latency: u64,
    line_size: usize,
    sets: usize,
    ways: usize,
    replacement_policy: ReplacementPolicyKind,
    multi_block_access: usize,

    offset_bits: u32,
    index_bits: u32,
    offset_mask: u64,
    index_mask: u64,
    tag_mask: u64,

    cache_sets: Vec<CacheSet>,
    listener: Option<Box<dyn AccessListener>>,
}

impl std::fmt::Debug for SetAssociativeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetAssociativeCache")
            .field("name", &self.name)
            .field("sets", &self.sets)
            .field("ways", &self.ways)
            .field("line_size", &self.line_size)
            .finish_non_exhaustive()
    }
}

impl SetAssociativeCache {
    /// Creates a cache level from its configuration, wired to an
    /// already-built next-level backend.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] when the block size or
    /// set count is not a power of two, or when `ways` or
    /// `multi_block_access` is zero.
    pub fn new(config: &CacheConfig, next_level: SharedStorage) -> Result<Self, SimError> {
        if !config.cache_block_size.is_power_of_two() {
            return Err(SimError::InvalidConfiguration(format!(
                "cache_block_size {} of '{}' is not a power of two",
                config.cache_block_size, config.name
            )));
        }
        if !config.sets.is_power_of_two() {
            return Err(SimError::InvalidConfiguration(format!(
                "sets {} of '{}' is not a power of two",
                config.sets, config.name
            )));
        }
        if config.ways == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "'{}' must have at least one way",
                config.name
            )));
        }
        if config.multi_block_access == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "multi_block_access of '{}' must be at least 1",
                config.name
            )));
        }

        let offset_bits = config.cache_block_size.trailing_zeros();
        let index_bits = config.sets.trailing_zeros();
        let offset_mask = config.cache_block_size as u64 - 1;
        let index_mask = (config.sets as u64 - 1) << offset_bits;

        let mut cache = Self {
            name: config.name.clone(),
            next_level,
            write_allocate: config.write_allocate,
            write_through: config.write_through,
            miss_latency: config.miss_latency,
            hit_latency: config.hit_latency,
            line_size: config.cache_block_size,
            sets: config.sets,
            ways: config.ways,
            replacement_policy: config.replacement_policy,
            multi_block_access: config.multi_block_access,
            offset_bits,
            index_bits,
            offset_mask,
            index_mask,
            tag_mask: !offset_mask & !index_mask,
            cache_sets: Vec::new(),
            listener: None,
        };
        cache.reset();
        Ok(cache)
    }

    /// Installs an access-decision listener; pass through for builder-style
    /// construction.
    pub fn with_listener(mut self, listener: Box<dyn AccessListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the configured line (block) size in bytes.
    pub fn line_size(&self) -> usize {
        self.line_size
    }

    fn notify(
        &mut self,
        kind: AccessKind,
        address: u64,
        set: u64,
        way: Option<usize>,
        outcome: AccessOutcome,
    ) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_access(&AccessEvent {
                level: &self.name,
                kind,
                address,
                set,
                way,
                outcome,
            });
        }
    }

    /// Extracts the byte offset within a line (the `offset_bits` LSBs).
    fn address_offset(&self, address: u64) -> u64 {
        address & self.offset_mask
    }

    /// Extracts the set index field.
    fn address_index(&self, address: u64) -> u64 {
        (address & self.index_mask) >> self.offset_bits
    }

    /// Extracts the tag field (everything above index and offset).
    fn address_tag(&self, address: u64) -> u64 {
        (address & self.tag_mask) >> (self.offset_bits + self.index_bits)
    }

    /// Reconstructs the line-aligned address a (set, tag) pair caches.
    fn address_from_index_and_tag(&self, index: u64, tag: u64) -> u64 {
        (tag << (self.offset_bits + self.index_bits)) | (index << self.offset_bits)
    }

    /// Splits a write into line-aligned chunks, none crossing a line
    /// boundary. The first chunk absorbs `line_size - offset` bytes (or the
    /// whole request if it fits), middle chunks are full lines, and the
    /// last chunk may be partial.
    fn split_write(&self, address: u64, data: &Data) -> Vec<(u64, Data)> {
        let offset = self.address_offset(address) as usize;

        if offset + data.len() <= self.line_size {
            return vec![(address, data.clone())];
        }

        let bytes = data.as_slice();
        let mut chunks = Vec::with_capacity(data.len() / self.line_size + 2);
        let mut consumed = self.line_size - offset;
        chunks.push((address, Data::from_slice(&bytes[..consumed])));

        while consumed < data.len() {
            let take = (data.len() - consumed).min(self.line_size);
            chunks.push((
                address + consumed as u64,
                Data::from_slice(&bytes[consumed..consumed + take]),
            ));
            consumed += take;
        }
        chunks
    }

    /// Splits a read into line-aligned (address, length) chunks; same
    /// arithmetic as [`Self::split_write`].
    fn split_read(&self, address: u64, num_bytes: usize) -> Vec<(u64, usize)> {
        let offset = self.address_offset(address) as usize;

        if offset + num_bytes <= self.line_size {
            return vec![(address, num_bytes)];
        }

        let mut chunks = Vec::with_capacity(num_bytes / self.line_size + 2);
        let mut consumed = self.line_size - offset;
        chunks.push((address, consumed));

        while consumed < num_bytes {
            let take = (num_bytes - consumed).min(self.line_size);
            chunks.push((address + consumed as u64, take));
            consumed += take;
        }
        chunks
    }

    /// Fetches the full line containing `address` from the next level and
    /// merges `data` into it at the address's offset.
    ///
    /// Returns the merged line plus the hit level and latency of the fill
    /// read, which the caller folds into its own result.
    fn fill_line_from_next_level(
        &mut self,
        address: u64,
        data: &Data,
    ) -> Result<(Data, i32, u64), SimError> {
        let offset = self.address_offset(address) as usize;
        let base = address - offset as u64;

        let fill = self.next_level.borrow_mut().read(base, self.line_size)?;
        let mut line = fill.data;
        line.copy_from_slice_at(offset, data.as_slice());

        Ok((line, fill.hit_level, fill.latency))
    }

    /// Writes back the line in `way` to the next level if it is valid and
    /// dirty, returning the latency incurred. Mandatory before any reuse of
    /// an occupied way.
    fn write_back_if_dirty(
        &mut self,
        kind: AccessKind,
        index: u64,
        way: usize,
    ) -> Result<u64, SimError> {
        let set = &self.cache_sets[index as usize];
        if !(set.is_way_valid(way) && set.is_way_dirty(way)) {
            return Ok(0);
        }

        let data = set.line_data(way);
        let tag = set.line_tag(way);
        let address = self.address_from_index_and_tag(index, tag);

        let wb = self.next_level.borrow_mut().write(address, &data)?;
        self.notify(kind, address, index, Some(way), AccessOutcome::WriteBack);
        Ok(wb.latency)
    }

    /// Writes one line-aligned chunk (`data.len() <= line_size`, no
    /// boundary crossing).
    ///
    /// Hit: merge into (or overwrite) the cached line, mark dirty. Miss
    /// with write-allocate: pick a free way or evict (writing back a dirty
    /// victim first); a partial write fetches the line from below to merge
    /// into, a full-line write allocates without any deeper access. Miss
    /// without write-allocate: forward to the next level uncached. A set
    /// write-through flag issues one additional next-level write unless the
    /// chunk was already forwarded.
    fn aligned_write(&mut self, address: u64, data: &Data) -> Result<Transaction, SimError> {
        let offset = self.address_offset(address) as usize;
        let tag = self.address_tag(address);
        let index = self.address_index(address);

        let mut hit_level = NO_DEEPER_ACCESS;
        let mut latency;
        let mut forwarded = false;

        if let Some(way) = self.cache_sets[index as usize].find_way_with_tag(tag) {
            hit_level = 0;
            latency = self.hit_latency;

            let line_data = if data.len() == self.line_size {
                data.clone()
            } else {
                let mut merged = self.cache_sets[index as usize].line_data(way);
                merged.copy_from_slice_at(offset, data.as_slice());
                merged
            };

            self.cache_sets[index as usize].update_way(way, tag, &line_data, true, true)?;
            self.cache_sets[index as usize].touch(way);
            self.notify(AccessKind::Write, address, index, Some(way), AccessOutcome::Hit);
        } else {
            latency = self.miss_latency;

            if self.write_allocate {
                let (way, outcome) = match self.cache_sets[index as usize].find_free_way() {
                    Some(way) => (way, AccessOutcome::MissFill),
                    None => {
                        let way = self.cache_sets[index as usize].victim_way();
                        latency += self.write_back_if_dirty(AccessKind::Write, index, way)?;
                        (way, AccessOutcome::MissEvict)
                    }
                };

                if data.len() == self.line_size {
                    // Full-line allocate: nothing below is touched.
                    self.cache_sets[index as usize].update_way(way, tag, data, true, true)?;
                } else {
                    let (line, fill_hit_level, fill_latency) =
                        self.fill_line_from_next_level(address, data)?;
                    hit_level = fill_hit_level + 1;
                    latency += fill_latency;
                    self.cache_sets[index as usize].update_way(way, tag, &line, true, true)?;
                }

                self.cache_sets[index as usize].touch(way);
                self.notify(AccessKind::Write, address, index, Some(way), outcome);
            } else {
                let fwd = self.next_level.borrow_mut().write(address, data)?;
                hit_level = fwd.hit_level + 1;
                latency += fwd.latency;
                forwarded = true;
                self.notify(AccessKind::Write, address, index, None, AccessOutcome::Forward);
            }
        }

        if self.write_through && !forwarded {
            let wt = self.next_level.borrow_mut().write(address, data)?;
            latency += wt.latency;
            self.notify(AccessKind::Write, address, index, None, AccessOutcome::WriteThrough);
        }

        Ok(Transaction::write(address, latency, hit_level, data.clone()))
    }

    /// Reads one line-aligned chunk (`num_bytes <= line_size`, no boundary
    /// crossing).
    ///
    /// Hit: copy the requested sub-range out of the cached line. Miss: pick
    /// a free way or evict (writing back a dirty victim first), fetch the
    /// full line from below, store it valid and NOT dirty (a read fill
    /// never dirties a line), then copy the sub-range out.
    fn aligned_read(&mut self, address: u64, num_bytes: usize) -> Result<Transaction, SimError> {
        let offset = self.address_offset(address) as usize;
        let tag = self.address_tag(address);
        let index = self.address_index(address);

        if let Some(way) = self.cache_sets[index as usize].find_way_with_tag(tag) {
            let block = self.cache_sets[index as usize].line_data(way);
            let read_data = Data::from_slice(&block.as_slice()[offset..offset + num_bytes]);

            self.cache_sets[index as usize].touch(way);
            self.notify(AccessKind::Read, address, index, Some(way), AccessOutcome::Hit);

            return Ok(Transaction::read(address, self.hit_latency, 0, read_data));
        }

        let mut latency = self.miss_latency;

        let (way, outcome) = match self.cache_sets[index as usize].find_free_way() {
            Some(way) => (way, AccessOutcome::MissFill),
            None => {
                let way = self.cache_sets[index as usize].victim_way();
                latency += self.write_back_if_dirty(AccessKind::Read, index, way)?;
                (way, AccessOutcome::MissEvict)
            }
        };

        let base = address - offset as u64;
        let fill = self.next_level.borrow_mut().read(base, self.line_size)?;
        let hit_level = fill.hit_level + 1;
        latency += fill.latency;

        let read_data = Data::from_slice(&fill.data.as_slice()[offset..offset + num_bytes]);

        self.cache_sets[index as usize].update_way(way, tag, &fill.data, true, false)?;
        self.cache_sets[index as usize].touch(way);
        self.notify(AccessKind::Read, address, index, Some(way), outcome);

        Ok(Transaction::read(address, latency, hit_level, read_data))
    }

    /// Drains every valid, dirty line to the next level and resets the
    /// cache.
    ///
    /// Write-back addresses are reconstructed from set index and tag. The
    /// returned transaction is a synthetic write with zero payload and zero
    /// latency carrying the deepest hit level observed; a cache holding
    /// only clean lines reports hit level 0.
    ///
    /// # Errors
    ///
    /// Propagates any error from the next-level write-backs.
    pub fn flush(&mut self) -> Result<Transaction, SimError> {
        let mut hit_level = 0;

        for index in 0..self.sets {
            for way in 0..self.ways {
                let set = &self.cache_sets[index];
                if !(set.is_way_valid(way) && set.is_way_dirty(way)) {
                    continue;
                }

                let data = set.line_data(way);
                let tag = set.line_tag(way);
                let address = self.address_from_index_and_tag(index as u64, tag);

                let wb = self.next_level.borrow_mut().write(address, &data)?;
                hit_level = hit_level.max(wb.hit_level + 1);
                self.notify(
                    AccessKind::Write,
                    address,
                    index as u64,
                    Some(way),
                    AccessOutcome::WriteBack,
                );
            }
        }
        self.reset();

        Ok(Transaction::write(0, 0, hit_level, Data::new(0)))
    }

    /// Returns `true` if the line containing `address` is cached and valid.
    /// Debugging aid; simulation logic never calls this.
    pub fn is_address_cached(&self, address: u64) -> bool {
        let tag = self.address_tag(address);
        let index = self.address_index(address) as usize;
        self.cache_sets[index].find_way_with_tag(tag).is_some()
    }

    /// Returns `true` if the line containing `address` is cached with its
    /// valid bit set. Lookup already ignores invalid lines, so this always
    /// agrees with [`Self::is_address_cached`].
    pub fn is_address_valid(&self, address: u64) -> bool {
        self.is_address_cached(address)
    }

    /// Returns `true` if the line containing `address` is cached and dirty.
    /// Debugging aid; simulation logic never calls this.
    pub fn is_address_dirty(&self, address: u64) -> bool {
        let tag = self.address_tag(address);
        let index = self.address_index(address) as usize;
        self.cache_sets[index]
            .find_way_with_tag(tag)
            .is_some_and(|way| self.cache_sets[index].is_way_dirty(way))
    }

    /// Returns the cached byte at `address`, or 0 when the line is absent.
    /// Debugging aid; check [`Self::is_address_cached`] first.
    pub fn get_byte(&self, address: u64) -> u8 {
        let offset = self.address_offset(address) as usize;
        let tag = self.address_tag(address);
        let index = self.address_index(address) as usize;

        self.cache_sets[index]
            .find_way_with_tag(tag)
            .map_or(0, |way| self.cache_sets[index].line_data(way)[offset])
    }

    /// Returns a copy of the payload in (`set`, `way`). Debugging aid.
    pub fn line_data(&self, set: usize, way: usize) -> Data {
        self.cache_sets[set].line_data(way)
    }

    /// Returns the tag in (`set`, `way`). Debugging aid.
    pub fn line_tag(&self, set: usize, way: usize) -> u64 {
        self.cache_sets[set].line_tag(way)
    }

    /// Returns the valid bit of (`set`, `way`). Debugging aid.
    pub fn is_line_valid(&self, set: usize, way: usize) -> bool {
        self.cache_sets[set].is_way_valid(way)
    }

    /// Returns the dirty bit of (`set`, `way`). Debugging aid.
    pub fn is_line_dirty(&self, set: usize, way: usize) -> bool {
        self.cache_sets[set].is_way_dirty(way)
    }
}

impl DataStorage for SetAssociativeCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.sets * self.ways * self.line_size
    }

    /// Reads `num_bytes` at `address`, splitting unaligned and multi-line
    /// spans into line-aligned chunks. The combined hit level is the
    /// deepest observed across chunks; the combined latency follows the
    /// multi-block batching rule.
    fn read(&mut self, address: u64, num_bytes: usize) -> Result<Transaction, SimError> {
        let mut read_data = Data::new(num_bytes);
        let mut hit_level = NO_DEEPER_ACCESS;
        let mut latencies = Vec::new();
        let mut filled = 0;

        for (chunk_address, chunk_len) in self.split_read(address, num_bytes) {
            let chunk = self.aligned_read(chunk_address, chunk_len)?;
            read_data.copy_from_slice_at(filled, chunk.data.as_slice());
            filled += chunk_len;

            latencies.push(chunk.latency);
            hit_level = hit_level.max(chunk.hit_level);
        }

        let latency = multi_block_access_latency(&latencies, self.multi_block_access);
        Ok(Transaction::read(address, latency, hit_level, read_data))
    }

    /// Writes `data` at `address`, splitting unaligned and multi-line spans
    /// into line-aligned chunks; combination rules as in
    /// [`DataStorage::read`].
    fn write(&mut self, address: u64, data: &Data) -> Result<Transaction, SimError> {
        let mut hit_level = NO_DEEPER_ACCESS;
        let mut latencies = Vec::new();

        for (chunk_address, chunk_data) in self.split_write(address, data) {
            let chunk = self.aligned_write(chunk_address, &chunk_data)?;
            latencies.push(chunk.latency);
            hit_level = hit_level.max(chunk.hit_level);
        }

        let latency = multi_block_access_latency(&latencies, self.multi_block_access);
        Ok(Transaction::write(address, latency, hit_level, data.clone()))
    }

    /// Discards and recreates every set: all lines invalid, eviction
    /// policy state cleared.
    fn reset(&mut self) {
        self.cache_sets = (0..self.sets)
            .map(|_| CacheSet::new(self.line_size, self.ways, self.replacement_policy))
            .collect();
    }
}

//! Write Policy Unit Tests.
//!
//! Verifies the four write-allocate / write-through combinations: where
//! the bytes land, what latency accrues, and how the hit level reports a
//! full-line allocate that touches nothing below.

use cachesim_core::{Data, DataStorage};

use crate::common::harness::{
    HIT_LATENCY, MEM_READ_LATENCY, MEM_WRITE_LATENCY, MISS_LATENCY, cache_config,
    cache_over_memory,
};

// ══════════════════════════════════════════════════════════
// 1. Write-allocate, write-back (the default fixture)
// ══════════════════════════════════════════════════════════

#[test]
fn full_line_allocate_touches_nothing_below() {
    let config = cache_config(4, 2, 8);
    let (mut cache, memory) = cache_over_memory(&config);

    let line = Data::from_slice(&[0xAB; 8]);
    let written = cache.write(0x00, &line).unwrap();

    // The whole line is overwritten, so no fill is needed.
    assert_eq!(written.hit_level, -1);
    assert_eq!(written.latency, MISS_LATENCY);
    assert!(cache.is_address_dirty(0x00));
    assert_eq!(memory.borrow().get(0), 0);
}

#[test]
fn partial_allocate_fills_from_below() {
    let config = cache_config(4, 2, 8);
    let (mut cache, _memory) = cache_over_memory(&config);

    let written = cache.write(0x00, &Data::from_slice(&[1, 2])).unwrap();
    assert_eq!(written.hit_level, 1);
    assert_eq!(written.latency, MISS_LATENCY + MEM_READ_LATENCY);
}

// ══════════════════════════════════════════════════════════
// 2. No write-allocate: misses forward uncached
// ══════════════════════════════════════════════════════════

#[test]
fn no_allocate_miss_forwards_to_next_level() {
    let mut config = cache_config(4, 2, 8);
    config.write_allocate = false;
    let (mut cache, memory) = cache_over_memory(&config);

    let written = cache.write(0x10, &Data::from_slice(&[0x42])).unwrap();

    assert_eq!(written.hit_level, 1);
    assert_eq!(written.latency, MISS_LATENCY + MEM_WRITE_LATENCY);
    assert!(!cache.is_address_cached(0x10));
    assert_eq!(memory.borrow().get(0x10), 0x42);
}

#[test]
fn no_allocate_still_hits_resident_lines() {
    let mut config = cache_config(4, 2, 8);
    config.write_allocate = false;
    let (mut cache, memory) = cache_over_memory(&config);

    // Bring the line in with a read, then write to it.
    let _ = cache.read(0x10, 8).unwrap();
    let written = cache.write(0x10, &Data::from_slice(&[0x42])).unwrap();

    assert_eq!(written.hit_level, 0);
    assert_eq!(written.latency, HIT_LATENCY);
    assert!(cache.is_address_dirty(0x10));
    // Write-back: the byte stays above the leaf until eviction.
    assert_eq!(memory.borrow().get(0x10), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Write-through: every cached write also lands below
// ══════════════════════════════════════════════════════════

#[test]
fn write_through_hit_propagates_immediately() {
    let mut config = cache_config(4, 2, 8);
    config.write_through = true;
    let (mut cache, memory) = cache_over_memory(&config);

    let _ = cache.read(0x20, 8).unwrap();
    let written = cache.write(0x20, &Data::from_slice(&[0x99])).unwrap();

    assert_eq!(written.latency, HIT_LATENCY + MEM_WRITE_LATENCY);
    assert_eq!(memory.borrow().get(0x20), 0x99);
    assert_eq!(cache.get_byte(0x20), 0x99);
}

#[test]
fn write_through_allocate_miss_fills_then_propagates() {
    let mut config = cache_config(4, 2, 8);
    config.write_through = true;
    let (mut cache, memory) = cache_over_memory(&config);

    let written = cache.write(0x20, &Data::from_slice(&[0x99])).unwrap();

    assert_eq!(
        written.latency,
        MISS_LATENCY + MEM_READ_LATENCY + MEM_WRITE_LATENCY
    );
    assert_eq!(memory.borrow().get(0x20), 0x99);
}

#[test]
fn write_through_no_allocate_does_not_double_write() {
    let mut config = cache_config(4, 2, 8);
    config.write_allocate = false;
    config.write_through = true;
    let (mut cache, memory) = cache_over_memory(&config);

    // The forwarded miss already reached the next level; write-through
    // must not issue a second write for the same chunk.
    let written = cache.write(0x30, &Data::from_slice(&[0x77])).unwrap();

    assert_eq!(written.latency, MISS_LATENCY + MEM_WRITE_LATENCY);
    assert_eq!(memory.borrow().get(0x30), 0x77);
}

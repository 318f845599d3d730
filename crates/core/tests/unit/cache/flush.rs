//! Flush Unit Tests.
//!
//! Verifies that flushing drains every dirty line to the next level at
//! its reconstructed address, leaves clean lines alone, and resets the
//! cache afterwards.

use cachesim_core::{Data, DataStorage};

use crate::common::harness::{cache_config, cache_over_memory};

#[test]
fn flush_of_clean_cache_writes_nothing() {
    let config = cache_config(4, 2, 8);
    let (mut cache, memory) = cache_over_memory(&config);

    // Read fills only: every resident line is clean.
    let _ = cache.read(0x00, 8).unwrap();
    let _ = cache.read(0x08, 8).unwrap();

    let flushed = cache.flush().unwrap();

    assert_eq!(flushed.hit_level, 0);
    assert_eq!(flushed.latency, 0);
    assert_eq!(memory.borrow().get(0x00), 0);
}

#[test]
fn flush_commits_dirty_lines_at_reconstructed_addresses() {
    let config = cache_config(4, 2, 8);
    let (mut cache, memory) = cache_over_memory(&config);

    let _ = cache.write(0x00, &Data::from_slice(&[0xA0; 8])).unwrap();
    let _ = cache.write(0x28, &Data::from_slice(&[0xB0; 8])).unwrap();

    let flushed = cache.flush().unwrap();
    assert_eq!(flushed.hit_level, 1);

    let memory = memory.borrow();
    assert_eq!(memory.get(0x00), 0xA0);
    assert_eq!(memory.get(0x07), 0xA0);
    assert_eq!(memory.get(0x28), 0xB0);
    assert_eq!(memory.get(0x2F), 0xB0);
}

#[test]
fn flush_empties_the_cache() {
    let config = cache_config(4, 2, 8);
    let (mut cache, _memory) = cache_over_memory(&config);

    let _ = cache.write(0x00, &Data::from_slice(&[0xA0; 8])).unwrap();
    let _ = cache.flush().unwrap();

    assert!(!cache.is_address_cached(0x00));

    // The flushed bytes survive below and refill on the next read.
    let read = cache.read(0x00, 8).unwrap();
    assert_eq!(read.hit_level, 1);
    assert_eq!(read.data.as_slice(), &[0xA0; 8]);
}

#[test]
fn flush_skips_clean_lines_next_to_dirty_ones() {
    let config = cache_config(4, 2, 8);
    let (mut cache, memory) = cache_over_memory(&config);

    // Seed the leaf so the clean fill has recognizable content.
    memory.borrow_mut().set(0x10, 0x55);
    let _ = cache.read(0x10, 8).unwrap();
    let _ = cache.write(0x18, &Data::from_slice(&[0xD0; 8])).unwrap();

    // Overwrite the leaf behind the cache's back; a spurious write-back
    // of the clean line would restore 0x55.
    memory.borrow_mut().set(0x10, 0x99);

    let _ = cache.flush().unwrap();

    let memory = memory.borrow();
    assert_eq!(memory.get(0x10), 0x99);
    assert_eq!(memory.get(0x18), 0xD0);
}

#[test]
fn flush_twice_is_idempotent() {
    let config = cache_config(4, 2, 8);
    let (mut cache, _memory) = cache_over_memory(&config);

    let _ = cache.write(0x00, &Data::from_slice(&[0xA0; 8])).unwrap();
    let first = cache.flush().unwrap();
    let second = cache.flush().unwrap();

    assert_eq!(first.hit_level, 1);
    // Nothing left to drain.
    assert_eq!(second.hit_level, 0);
    assert_eq!(second.latency, 0);
}

//! Cache Geometry Unit Tests.
//!
//! Verifies construction-time validation and the derived size metadata
//! across a range of geometries.

use cachesim_core::{DataStorage, SetAssociativeCache, SimError};
use rstest::rstest;

use crate::common::harness::{cache_config, shared_memory};

#[rstest]
#[case(1, 1, 8)]
#[case(4, 2, 8)]
#[case(64, 8, 64)]
#[case(256, 16, 128)]
fn valid_geometry_constructs(
    #[case] sets: usize,
    #[case] ways: usize,
    #[case] cache_block_size: usize,
) {
    let config = cache_config(sets, ways, cache_block_size);
    let cache = SetAssociativeCache::new(&config, shared_memory()).unwrap();

    assert_eq!(cache.size(), sets * ways * cache_block_size);
    assert_eq!(cache.line_size(), cache_block_size);
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(12)]
#[case(100)]
fn block_size_must_be_power_of_two(#[case] cache_block_size: usize) {
    let config = cache_config(4, 2, cache_block_size);
    let err = SetAssociativeCache::new(&config, shared_memory()).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(6)]
#[case(1000)]
fn set_count_must_be_power_of_two(#[case] sets: usize) {
    let config = cache_config(sets, 2, 8);
    let err = SetAssociativeCache::new(&config, shared_memory()).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn name_comes_from_configuration() {
    let config = cache_config(4, 2, 8);
    let cache = SetAssociativeCache::new(&config, shared_memory()).unwrap();
    assert_eq!(cache.name(), "l1");
}

#[test]
fn zero_ways_is_rejected() {
    let config = cache_config(4, 0, 8);
    let err = SetAssociativeCache::new(&config, shared_memory()).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn zero_multi_block_access_is_rejected() {
    let mut config = cache_config(4, 2, 8);
    config.multi_block_access = 0;
    let err = SetAssociativeCache::new(&config, shared_memory()).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

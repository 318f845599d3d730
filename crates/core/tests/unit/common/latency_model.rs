//! Multi-Block Latency Unit Tests.
//!
//! Verifies the batching rule: blocks within a batch of `parallelism`
//! run concurrently (max), batches run back to back (sum).

use cachesim_core::common::multi_block_access_latency;

#[test]
fn sequential_access_sums() {
    assert_eq!(multi_block_access_latency(&[10, 20, 30], 1), 60);
}

#[test]
fn full_parallelism_takes_slowest_block() {
    assert_eq!(multi_block_access_latency(&[10, 20, 30], 3), 30);
}

#[test]
fn batches_sum_their_maxima() {
    // Batches: [10, 50] -> 50, [20, 40] -> 40, [30] -> 30.
    assert_eq!(multi_block_access_latency(&[10, 50, 20, 40, 30], 2), 120);
}

#[test]
fn single_block_is_its_own_latency() {
    assert_eq!(multi_block_access_latency(&[42], 4), 42);
}

#[test]
fn empty_access_costs_nothing() {
    assert_eq!(multi_block_access_latency(&[], 2), 0);
}

#[test]
fn zero_parallelism_clamps_to_sequential() {
    assert_eq!(multi_block_access_latency(&[5, 7], 0), 12);
}

#[test]
fn parallelism_wider_than_access_is_one_batch() {
    assert_eq!(multi_block_access_latency(&[5, 7], 16), 7);
}

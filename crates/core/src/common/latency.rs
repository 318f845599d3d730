//! Latency aggregation for multi-block accesses.

/// Combines per-block latencies under a parallel access factor.
///
/// Consecutive latencies are grouped into batches of `parallelism` blocks.
/// Blocks within a batch are accessed in parallel, so a batch costs as much
/// as its slowest block; batches execute sequentially and their costs sum.
/// A factor of 1 degenerates to a plain sum.
///
/// # Arguments
///
/// * `latencies` - Per-block latencies in access order.
/// * `parallelism` - Number of blocks accessed in parallel (clamped to 1).
///
/// # Returns
///
/// The effective latency of the whole access in cycles.
pub fn multi_block_access_latency(latencies: &[u64], parallelism: usize) -> u64 {
    let parallelism = parallelism.max(1);
    latencies
        .chunks(parallelism)
        .map(|batch| batch.iter().copied().max().unwrap_or(0))
        .sum()
}

//! Component E: degree-sorted pods spread round-robin across latency-sorted nodes, with a
//! configurable balance factor.

use crate::error::{Result, SchedulerError};
use meridian_core::{Assignment, Matrix};

/// Fail fast on `balance_factor <= 0` per the error handling design: a balance factor of
/// zero has no sane quota interpretation and must not be silently coerced to 1.
pub fn validate_balance_factor(k: usize) -> Result<()> {
    if k == 0 {
        return Err(SchedulerError::invalid_parameters(
            "balance_factor must be >= 1",
        ));
    }
    Ok(())
}

/// Order pod indices by descending degree in `dependencies`, ties broken by original
/// insertion order (i.e. a stable sort).
pub fn degree_order(dependencies: &Matrix) -> Vec<usize> {
    let n = dependencies.size();
    let mut order: Vec<usize> = (0..n).collect();
    let degree = |i: usize| -> f64 { dependencies.row_sum(i) };
    order.sort_by(|&a, &b| degree(b).partial_cmp(&degree(a)).unwrap());
    order
}

/// Order node indices by ascending total latency, ties broken by original order.
pub fn latency_order(node_totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..node_totals.len()).collect();
    order.sort_by(|&a, &b| node_totals[a].partial_cmp(&node_totals[b]).unwrap());
    order
}

/// Place `n` pods (in `pod_order`) onto the first `k` nodes of `node_order`, round-robin
/// by quota: the first `n mod k` nodes get `ceil(n/k)` pods, the rest get `floor(n/k)`.
///
/// Returns a pod-index -> node-index assignment. Callers must validate `k >= 1` via
/// [`validate_balance_factor`] before calling; `k` is additionally clamped to
/// `node_order.len()` here since a balance factor wider than the node inventory degrades
/// to "spread across every node" rather than an error.
pub fn place_greedy(pod_order: &[usize], node_order: &[usize], k: usize) -> Assignment {
    let n = pod_order.len();
    let mut assignment = vec![0usize; n];
    if n == 0 || node_order.is_empty() {
        return assignment;
    }
    let k = k.min(node_order.len()).max(1);

    let base = n / k;
    let remainder = n % k;

    let mut pod_iter = pod_order.iter();
    for slot in 0..k {
        let quota = base + if slot < remainder { 1 } else { 0 };
        let node = node_order[slot];
        for _ in 0..quota {
            if let Some(&pod_idx) = pod_iter.next() {
                assignment[pod_idx] = node;
            }
        }
    }

    assignment
}

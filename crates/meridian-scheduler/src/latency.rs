//! Component C: reduces a time-indexed latency sample stream into a symmetric per-pair
//! matrix and a per-node mean, dropping control-plane nodes along the way.

use crate::types::{AggregatedLatency, LatencySnapshot};
use meridian_core::{is_control_plane_name, Matrix};
use std::collections::HashMap;
use std::time::Duration;

/// Aggregate a raw latency snapshot into a symmetric matrix plus per-node totals.
///
/// Samples whose `src` or `dst` contains the substring `control` are dropped before any
/// aggregation. An unordered pair with no surviving readings leaves its matrix entry at 0,
/// which the evaluator reads as "no data" (indistinguishable from "same node").
pub fn aggregate_latency(snapshot: &LatencySnapshot) -> AggregatedLatency {
    let mut node_names: Vec<String> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    fn ensure_index(
        name: &str,
        node_names: &mut Vec<String>,
        index_of: &mut HashMap<String, usize>,
    ) -> usize {
        if let Some(&i) = index_of.get(name) {
            return i;
        }
        let i = node_names.len();
        node_names.push(name.to_string());
        index_of.insert(name.to_string(), i);
        i
    }

    // sums[(i,j)] with i<=j accumulates (total, count) for the unordered pair
    let mut pair_sums: HashMap<(usize, usize), (f64, usize)> = HashMap::new();
    let mut node_sums: HashMap<usize, (f64, usize)> = HashMap::new();

    for sample in &snapshot.samples {
        if is_control_plane_name(&sample.src) || is_control_plane_name(&sample.dst) {
            continue;
        }
        if sample.values.is_empty() {
            continue;
        }

        let i = ensure_index(&sample.src, &mut node_names, &mut index_of);
        let j = ensure_index(&sample.dst, &mut node_names, &mut index_of);
        let key = if i <= j { (i, j) } else { (j, i) };

        let sum: f64 = sample.values.iter().map(|r| r.value).sum();
        let count = sample.values.len();

        let entry = pair_sums.entry(key).or_insert((0.0, 0));
        entry.0 += sum;
        entry.1 += count;

        let ni = node_sums.entry(i).or_insert((0.0, 0));
        ni.0 += sum;
        ni.1 += count;

        if j != i {
            let nj = node_sums.entry(j).or_insert((0.0, 0));
            nj.0 += sum;
            nj.1 += count;
        }
    }

    let m = node_names.len();
    let mut matrix = Matrix::zeros(m);
    for (&(i, j), &(sum, count)) in &pair_sums {
        if i == j || count == 0 {
            continue;
        }
        let mean = sum / count as f64;
        matrix.set(i, j, mean);
        matrix.set(j, i, mean);
    }

    let node_totals: Vec<f64> = (0..m)
        .map(|i| match node_sums.get(&i) {
            Some(&(sum, count)) if count > 0 => sum / count as f64,
            _ => 0.0,
        })
        .collect();

    AggregatedLatency {
        node_names,
        matrix,
        node_totals,
    }
}

/// Step size the caller should use when querying a latency window of the given length.
///
/// `window <= 30min -> 8s`, `window <= 2h -> 15s`, otherwise `60s`.
pub fn sampling_step(window: Duration) -> Duration {
    if window <= Duration::from_secs(30 * 60) {
        Duration::from_secs(8)
    } else if window <= Duration::from_secs(2 * 60 * 60) {
        Duration::from_secs(15)
    } else {
        Duration::from_secs(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LatencyReading, LatencySample};

    fn reading(ts: i64, value: f64) -> LatencyReading {
        LatencyReading { ts, value }
    }

    #[test]
    fn symmetrizes_and_averages() {
        let snapshot = LatencySnapshot {
            samples: vec![LatencySample {
                src: "node-a".into(),
                dst: "node-b".into(),
                values: vec![reading(0, 10.0), reading(1, 20.0)],
            }],
        };
        let agg = aggregate_latency(&snapshot);
        assert_eq!(agg.len(), 2);
        let a = agg.node_names.iter().position(|n| n == "node-a").unwrap();
        let b = agg.node_names.iter().position(|n| n == "node-b").unwrap();
        assert_eq!(agg.matrix.get(a, b), 15.0);
        assert_eq!(agg.matrix.get(b, a), 15.0);
    }

    #[test]
    fn control_plane_nodes_excluded() {
        let snapshot = LatencySnapshot {
            samples: vec![
                LatencySample {
                    src: "control-plane-1".into(),
                    dst: "node-b".into(),
                    values: vec![reading(0, 5.0)],
                },
                LatencySample {
                    src: "node-a".into(),
                    dst: "node-b".into(),
                    values: vec![reading(0, 5.0)],
                },
            ],
        };
        let agg = aggregate_latency(&snapshot);
        assert!(!agg.node_names.iter().any(|n| n.contains("control")));
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn step_size_buckets() {
        assert_eq!(sampling_step(Duration::from_secs(60)), Duration::from_secs(8));
        assert_eq!(
            sampling_step(Duration::from_secs(90 * 60)),
            Duration::from_secs(15)
        );
        assert_eq!(
            sampling_step(Duration::from_secs(3 * 60 * 60)),
            Duration::from_secs(60)
        );
    }
}

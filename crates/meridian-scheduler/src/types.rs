use meridian_core::Matrix;
use serde::{Deserialize, Serialize};

/// Which term of the normalized composite score currently dominates.
///
/// Fed back into the heuristic operator (§4.G) so it can pick the repair strategy that
/// addresses whichever term is driving the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    LatencyDominant,
    BalanceDominant,
    Neutral,
}

/// Output of the graph parser: everything downstream components need, derived once from a
/// `Workload`.
#[derive(Debug, Clone)]
pub struct ParsedGraph {
    /// Pod names in canonical (insertion, deduplicated) order; row/column index into `dependencies`.
    pub pod_names: Vec<String>,
    /// Parallel to `pod_names`: resolved (cpu, memory) demand for each pod.
    pub demands: Vec<meridian_core::ResourceDemand>,
    pub dependencies: Matrix,
    pub balance_factor: usize,
}

impl ParsedGraph {
    pub fn is_empty(&self) -> bool {
        self.pod_names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pod_names.len()
    }
}

/// One latency reading at a point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatencyReading {
    pub ts: i64,
    pub value: f64,
}

/// A stream of readings between an unordered pair of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencySample {
    pub src: String,
    pub dst: String,
    pub values: Vec<LatencyReading>,
}

/// A full latency snapshot: the raw sample stream the external metrics client delivers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencySnapshot {
    pub samples: Vec<LatencySample>,
}

/// Output of the latency aggregator: the symmetrized per-pair matrix plus a per-node mean,
/// over exactly the node names that survived control-plane filtering.
#[derive(Debug, Clone)]
pub struct AggregatedLatency {
    pub node_names: Vec<String>,
    pub matrix: Matrix,
    /// Parallel to `node_names`: mean of every reading that mentions that node.
    pub node_totals: Vec<f64>,
}

impl AggregatedLatency {
    pub fn len(&self) -> usize {
        self.node_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }
}

/// Result of an objective evaluation: the unnormalized sentinel-or-score plus feasibility.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub score: f64,
    pub feasible: bool,
    pub mode: Mode,
}

/// Sentinel score returned for an infeasible assignment under the unnormalized objective.
pub const INFEASIBLE: f64 = 1e8;

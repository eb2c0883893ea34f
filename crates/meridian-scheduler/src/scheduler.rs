//! Component K: ties the graph parser, latency aggregator, and the three placement
//! strategies together behind one facade. Owns no cross-call state: every method takes its
//! inputs and returns a fresh result.

use crate::annealing::{anneal, AnnealingParams, AnnealingResult};
use crate::error::{Result, SchedulerError};
use crate::exhaustive::exhaustive_search;
use crate::greedy::{degree_order, latency_order, place_greedy, validate_balance_factor};
use crate::latency::aggregate_latency;
use crate::parser::parse_workload;
use crate::types::LatencySnapshot;
use meridian_core::{Assignment, Node, Workload};
use std::collections::HashMap;
use tracing::{info, warn};

/// A pod name -> node name mapping, the engine's public output shape.
pub type Placement = HashMap<String, String>;

/// Configuration shared across a `Scheduler`'s calls. Holds only tunables, no request state.
#[derive(Debug, Clone, Default)]
pub struct SchedulerConfig {
    pub annealing: AnnealingParams,
}

/// Facade wiring the parser, aggregator, and strategies together.
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// `true` iff the snapshot has at least one non-empty sample after control-plane
    /// filtering. Lets the driver decide between a latency-aware and a fallback placement.
    pub fn has_latency(&self, snapshot: &LatencySnapshot) -> bool {
        !aggregate_latency(snapshot).is_empty()
    }

    fn build_graph_and_nodes(
        &self,
        workload: &Workload,
        nodes: &[Node],
        snapshot: &LatencySnapshot,
    ) -> Result<(crate::types::ParsedGraph, crate::types::AggregatedLatency, Vec<meridian_core::ResourceDemand>)> {
        let graph = parse_workload(workload);
        let aggregated = aggregate_latency(snapshot);

        if !aggregated.is_empty() && aggregated.len() != nodes.len() {
            return Err(SchedulerError::shape_mismatch(format!(
                "latency snapshot covers {} nodes but {} were supplied",
                aggregated.len(),
                nodes.len()
            )));
        }

        let capacities: Vec<meridian_core::ResourceDemand> =
            aggregated
                .node_names
                .iter()
                .map(|name| {
                    nodes
                        .iter()
                        .find(|n| &n.name == name)
                        .map(|n| n.capacity)
                        .unwrap_or(meridian_core::ResourceDemand::new(0.0, 0.0))
                })
                .collect();

        Ok((graph, aggregated, capacities))
    }

    /// Run the greedy degree-ordered placer (fast path).
    pub fn place_greedy(
        &self,
        workload: &Workload,
        nodes: &[Node],
        snapshot: &LatencySnapshot,
    ) -> Result<Placement> {
        let graph = parse_workload(workload);
        if graph.is_empty() {
            info!("empty workload, nothing to place");
            return Ok(Placement::new());
        }
        validate_balance_factor(graph.balance_factor)?;

        let aggregated = aggregate_latency(snapshot);
        if !aggregated.is_empty() && aggregated.len() != nodes.len() {
            return Err(SchedulerError::shape_mismatch(format!(
                "latency snapshot covers {} nodes but {} were supplied",
                aggregated.len(),
                nodes.len()
            )));
        }

        let node_names: Vec<String> = if aggregated.is_empty() {
            nodes.iter().map(|n| n.name.clone()).collect()
        } else {
            aggregated.node_names.clone()
        };
        let node_totals = if aggregated.is_empty() {
            vec![0.0; node_names.len()]
        } else {
            aggregated.node_totals.clone()
        };

        let pod_order = degree_order(&graph.dependencies);
        let node_order = latency_order(&node_totals);
        let assignment = place_greedy(&pod_order, &node_order, graph.balance_factor);

        Ok(to_placement(&graph.pod_names, &node_names, &assignment))
    }

    /// Run the simulated-annealing solver (quality path).
    pub fn place_annealing(
        &self,
        workload: &Workload,
        nodes: &[Node],
        snapshot: &LatencySnapshot,
        cancel: Option<&dyn Fn() -> bool>,
    ) -> Result<(Placement, AnnealingResult)> {
        let (graph, aggregated, capacities) = self.build_graph_and_nodes(workload, nodes, snapshot)?;
        if graph.is_empty() {
            info!("empty workload, nothing to place");
            let result = AnnealingResult {
                assignment: Vec::new(),
                score: 0.0,
                feasible: true,
                cancelled: false,
            };
            return Ok((Placement::new(), result));
        }

        let node_names: Vec<String> = if aggregated.is_empty() {
            nodes.iter().map(|n| n.name.clone()).collect()
        } else {
            aggregated.node_names.clone()
        };
        let latency_matrix = aggregated.matrix.clone();
        let capacities: Vec<meridian_core::ResourceDemand> = if aggregated.is_empty() {
            nodes.iter().map(|n| n.capacity).collect()
        } else {
            capacities
        };

        let result = anneal(
            &graph.dependencies,
            &latency_matrix,
            &graph.demands,
            &capacities,
            &self.config.annealing,
            cancel,
        )?;

        if !result.feasible {
            warn!("annealing found no feasible placement");
            return Err(SchedulerError::no_feasible_placement(
                graph.len(),
                node_names.len(),
            ));
        }

        let placement = to_placement(&graph.pod_names, &node_names, &result.assignment);
        Ok((placement, result))
    }

    /// Run the exhaustive enumerator. `O(m^n)`; intended only for small validation instances.
    pub fn place_exhaustive(
        &self,
        workload: &Workload,
        nodes: &[Node],
        snapshot: &LatencySnapshot,
    ) -> Result<(Placement, f64)> {
        let (graph, aggregated, capacities) = self.build_graph_and_nodes(workload, nodes, snapshot)?;
        if graph.is_empty() {
            return Ok((Placement::new(), 0.0));
        }
        let node_names: Vec<String> = if aggregated.is_empty() {
            nodes.iter().map(|n| n.name.clone()).collect()
        } else {
            aggregated.node_names.clone()
        };
        let capacities: Vec<meridian_core::ResourceDemand> = if aggregated.is_empty() {
            nodes.iter().map(|n| n.capacity).collect()
        } else {
            capacities
        };

        let (assignment, score) = exhaustive_search(
            &graph.dependencies,
            &aggregated.matrix,
            &graph.demands,
            &capacities,
            self.config.annealing.alpha,
            self.config.annealing.beta,
        );

        if crate::annealing::is_infeasible_score(score) {
            return Err(SchedulerError::no_feasible_placement(
                graph.len(),
                node_names.len(),
            ));
        }

        Ok((to_placement(&graph.pod_names, &node_names, &assignment), score))
    }
}

fn to_placement(pod_names: &[String], node_names: &[String], assignment: &Assignment) -> Placement {
    let mut placement = Placement::new();
    for (pod_idx, &node_idx) in assignment.iter().enumerate() {
        if let (Some(pod), Some(node)) = (pod_names.get(pod_idx), node_names.get(node_idx)) {
            placement.insert(pod.clone(), node.clone());
        }
    }
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LatencyReading, LatencySample};
    use meridian_core::{Dependency, Pod, ResourceDemand};

    fn workload() -> Workload {
        Workload {
            pods: vec![
                Pod::new("p1", ResourceDemand::new(1.0, 1.0)),
                Pod::new("p2", ResourceDemand::new(1.0, 1.0)),
            ],
            dependencies: vec![Dependency::new("p1", "p2")],
            balance_factor: 1,
        }
    }

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("node-a", ResourceDemand::new(10.0, 10.0)),
            Node::new("node-b", ResourceDemand::new(10.0, 10.0)),
        ]
    }

    fn snapshot() -> LatencySnapshot {
        LatencySnapshot {
            samples: vec![LatencySample {
                src: "node-a".into(),
                dst: "node-b".into(),
                values: vec![LatencyReading { ts: 0, value: 50.0 }],
            }],
        }
    }

    #[test]
    fn e1_greedy_colocates() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let placement = scheduler
            .place_greedy(&workload(), &nodes(), &snapshot())
            .unwrap();
        let node1 = &placement["p1"];
        let node2 = &placement["p2"];
        assert_eq!(node1, node2);
    }

    #[test]
    fn empty_workload_is_noop() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let empty = Workload {
            pods: vec![],
            dependencies: vec![],
            balance_factor: 1,
        };
        let placement = scheduler.place_greedy(&empty, &nodes(), &snapshot()).unwrap();
        assert!(placement.is_empty());
    }

    #[test]
    fn has_latency_reflects_snapshot_contents() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        assert!(scheduler.has_latency(&snapshot()));
        assert!(!scheduler.has_latency(&LatencySnapshot::default()));
    }

    #[test]
    fn zero_balance_factor_is_rejected() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let mut bad_workload = workload();
        bad_workload.balance_factor = 0;
        let result = scheduler.place_greedy(&bad_workload, &nodes(), &snapshot());
        assert!(matches!(result, Err(SchedulerError::InvalidParameters { .. })));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let one_node = vec![Node::new("node-a", ResourceDemand::new(10.0, 10.0))];
        let result = scheduler.place_greedy(&workload(), &one_node, &snapshot());
        assert!(result.is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative cpu/memory demand or capacity.
///
/// Cpu is expressed in fractional cores, memory in bytes, matching the plain-real
/// representation the evaluator works in. Use [`crate::quantities::parse_cpu`] /
/// [`crate::quantities::parse_memory`] to accept Kubernetes-style quantity strings at the
/// edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceDemand {
    pub cpu: f64,
    pub memory: f64,
}

impl ResourceDemand {
    pub fn new(cpu: f64, memory: f64) -> Self {
        Self { cpu, memory }
    }
}

/// A unit of scheduling within a [`Workload`].
///
/// `template` is an opaque payload (container specs, labels, etc.) the placement core
/// never inspects; it is threaded through untouched for the external pod-materialization
/// step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    pub demand: ResourceDemand,
    #[serde(default)]
    pub template: serde_json::Value,
}

impl Pod {
    pub fn new(name: impl Into<String>, demand: ResourceDemand) -> Self {
        Self {
            name: name.into(),
            demand,
            template: serde_json::Value::Null,
        }
    }
}

/// A scheduling target with positive cpu/memory capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub capacity: ResourceDemand,
}

impl Node {
    pub fn new(name: impl Into<String>, capacity: ResourceDemand) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    /// `true` if this node's name marks it as control-plane (see §6 of the spec: nodes
    /// whose name contains the substring `control` are excluded from the latency matrix).
    pub fn is_control_plane(&self) -> bool {
        is_control_plane_name(&self.name)
    }
}

/// Name-based control-plane marker shared by the latency aggregator and node filtering.
pub fn is_control_plane_name(name: &str) -> bool {
    name.contains("control")
}

/// An undirected communication edge between two pods, named by pod name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub p1: String,
    pub p2: String,
}

impl Dependency {
    pub fn new(p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
        }
    }
}

/// The full input to a placement request: an ordered pod list, the communication graph
/// between them, and the target spread factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    pub pods: Vec<Pod>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Target number of distinct nodes to spread pods across (k >= 1).
    pub balance_factor: usize,
}

/// An assignment of pod index `i` to node index `assign[i]`.
pub type Assignment = Vec<usize>;

/// Workload lifecycle phase, surfaced by the external reconciliation driver rather than
/// computed by the core, but given a concrete representation here so callers and tests
/// have something typed to report against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Phase {
    Scheduling,
    Scheduled,
    Failed,
    Deleted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Scheduling => "Scheduling",
            Phase::Scheduled => "Scheduled",
            Phase::Failed => "Failed",
            Phase::Deleted => "Deleted",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_plane_name_matching() {
        assert!(is_control_plane_name("control-plane-1"));
        assert!(is_control_plane_name("k8s-control"));
        assert!(!is_control_plane_name("worker-1"));
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Scheduled.to_string(), "Scheduled");
    }

    #[test]
    fn pod_template_defaults_to_null() {
        let pod = Pod::new("p1", ResourceDemand::new(1.0, 2.0));
        assert_eq!(pod.template, serde_json::Value::Null);
    }
}

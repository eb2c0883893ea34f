//! Renders a placement decision as a Kubernetes node affinity term.
//!
//! Not called by the placement engine itself: this is a convenience the external
//! pod-materialization step can reach for instead of hand-rolling the `k8s-openapi`
//! structure for a `requiredDuringSchedulingIgnoredDuringExecution` hostname match.

use k8s_openapi::api::core::v1::{NodeAffinity, NodeSelector, NodeSelectorRequirement, NodeSelectorTerm};

const HOSTNAME_LABEL: &str = "kubernetes.io/hostname";

/// Build a `NodeAffinity` that requires scheduling onto the node named `node_name`.
///
/// The host scheduler is still free to reject this placement (e.g. on a resource-feasibility
/// conflict discovered at materialization time) and fall through to normal scheduling.
pub fn render_node_affinity(node_name: &str) -> NodeAffinity {
    NodeAffinity {
        required_during_scheduling_ignored_during_execution: Some(NodeSelector {
            node_selector_terms: vec![NodeSelectorTerm {
                match_expressions: Some(vec![NodeSelectorRequirement {
                    key: HOSTNAME_LABEL.to_string(),
                    operator: "In".to_string(),
                    values: Some(vec![node_name.to_string()]),
                }]),
                match_fields: None,
            }],
        }),
        preferred_during_scheduling_ignored_during_execution: None,
    }
}

//! Component B: turns a `Workload` into the canonical pod list, dependency matrix, and
//! resource demands the rest of the engine operates on.

use crate::types::ParsedGraph;
use meridian_core::{Matrix, Workload};
use std::collections::HashMap;

/// Parse a workload into its canonical graph form.
///
/// Dependencies naming an unknown pod are silently dropped. Duplicate pod names are assumed
/// not to occur (validated upstream); the first occurrence of a name wins its index.
pub fn parse_workload(workload: &Workload) -> ParsedGraph {
    let mut pod_names = Vec::with_capacity(workload.pods.len());
    let mut demands = Vec::with_capacity(workload.pods.len());
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for pod in &workload.pods {
        if index_of.contains_key(pod.name.as_str()) {
            continue;
        }
        index_of.insert(pod.name.as_str(), pod_names.len());
        pod_names.push(pod.name.clone());
        demands.push(pod.demand);
    }

    let n = pod_names.len();
    let mut dependencies = Matrix::zeros(n);
    for dep in &workload.dependencies {
        if let (Some(&i), Some(&j)) = (index_of.get(dep.p1.as_str()), index_of.get(dep.p2.as_str()))
        {
            if i != j {
                dependencies.set(i, j, 1.0);
                dependencies.set(j, i, 1.0);
            }
        }
    }

    ParsedGraph {
        pod_names,
        demands,
        dependencies,
        balance_factor: workload.balance_factor,
    }
}

//! Component D: the composite placement objective — latency cost, resource-feasibility
//! penalty, and latency-weighted balance penalty, in unnormalized and normalized forms.

use crate::types::{Evaluation, Mode, INFEASIBLE};
use meridian_core::{Assignment, Matrix, ResourceDemand};

/// Per-node resource usage under an assignment.
fn node_usage(
    assignment: &Assignment,
    demands: &[ResourceDemand],
    node_count: usize,
) -> Vec<ResourceDemand> {
    let mut usage = vec![ResourceDemand::new(0.0, 0.0); node_count];
    for (i, &node) in assignment.iter().enumerate() {
        if node < node_count {
            usage[node].cpu += demands[i].cpu;
            usage[node].memory += demands[i].memory;
        }
    }
    usage
}

/// `Lcost(A) = 1/2 * sum_{i,j} L[A[i]][A[j]] * D[i][j]`.
pub fn latency_cost(assignment: &Assignment, dependencies: &Matrix, latency: &Matrix) -> f64 {
    let n = assignment.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in 0..n {
            let d = dependencies.get(i, j);
            if d == 0.0 {
                continue;
            }
            total += latency.get(assignment[i], assignment[j]) * d;
        }
    }
    total / 2.0
}

/// `true` iff every node's usage is within capacity on both axes.
pub fn is_feasible(assignment: &Assignment, demands: &[ResourceDemand], capacities: &[ResourceDemand]) -> bool {
    let usage = node_usage(assignment, demands, capacities.len());
    usage.iter().zip(capacities.iter()).all(|(u, c)| {
        u.cpu <= c.cpu && u.memory <= c.memory
    })
}

/// `P1(A) = sum_n (usedCPU(n)/cpuCap(n))^2 + (usedMem(n)/memCap(n))^2`.
pub fn resource_penalty(assignment: &Assignment, demands: &[ResourceDemand], capacities: &[ResourceDemand]) -> f64 {
    let usage = node_usage(assignment, demands, capacities.len());
    usage
        .iter()
        .zip(capacities.iter())
        .map(|(u, c)| {
            let cpu_ratio = if c.cpu > 0.0 { u.cpu / c.cpu } else { 0.0 };
            let mem_ratio = if c.memory > 0.0 { u.memory / c.memory } else { 0.0 };
            cpu_ratio * cpu_ratio + mem_ratio * mem_ratio
        })
        .sum()
}

/// Inverse of each node's total latency to its peers; higher = more central.
fn centrality_weights(latency: &Matrix, node_count: usize) -> Vec<f64> {
    (0..node_count)
        .map(|n| {
            let total = latency.row_sum(n);
            if total > 0.0 {
                1.0 / total
            } else {
                0.0
            }
        })
        .collect()
}

/// `P2(A) = sum_n (1/w(n) - mu)^2`, rewarding spreading load away from peripheral nodes.
pub fn balance_penalty(
    assignment: &Assignment,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    latency: &Matrix,
) -> f64 {
    let node_count = capacities.len();
    if node_count == 0 {
        return 0.0;
    }
    let usage = node_usage(assignment, demands, node_count);
    let weights = centrality_weights(latency, node_count);

    let rho: Vec<f64> = usage
        .iter()
        .zip(capacities.iter())
        .map(|(u, c)| {
            let cpu_ratio = if c.cpu > 0.0 { u.cpu / c.cpu } else { 0.0 };
            let mem_ratio = if c.memory > 0.0 { u.memory / c.memory } else { 0.0 };
            0.5 * (cpu_ratio + mem_ratio)
        })
        .collect();

    let inv_weights: Vec<f64> = weights
        .iter()
        .map(|&w| if w > 0.0 { 1.0 / w } else { 0.0 })
        .collect();

    let mu = rho
        .iter()
        .zip(weights.iter())
        .map(|(&r, &w)| if w > 0.0 { r / w } else { 0.0 })
        .sum::<f64>()
        / node_count as f64;

    inv_weights.iter().map(|&iw| (iw - mu).powi(2)).sum()
}

/// Loose theoretical upper bound on latency cost: `(upper-triangle sum of D) * max(L) / 1.5`.
fn latency_bounds(dependencies: &Matrix, latency: &Matrix) -> (f64, f64) {
    let lmax = (dependencies.upper_triangle_sum() * latency.max()) / 1.5;
    (0.0, lmax)
}

/// `Pmin`/`Pmax` for the balance penalty: perfectly even load vs. all load on the single
/// most-central node.
///
/// **Bug fix**: the teacher-adjacent source summed `cpu` into both accumulators; this sums
/// `cpu` into the cpu accumulator and `memory` into the memory accumulator.
fn balance_bounds(demands: &[ResourceDemand], capacities: &[ResourceDemand], latency: &Matrix) -> (f64, f64) {
    let node_count = capacities.len();
    if node_count == 0 {
        return (0.0, 0.0);
    }
    let weights = centrality_weights(latency, node_count);
    let inv_weights: Vec<f64> = weights
        .iter()
        .map(|&w| if w > 0.0 { 1.0 / w } else { 0.0 })
        .collect();

    let total_cpu: f64 = demands.iter().map(|d| d.cpu).sum();
    let total_mem: f64 = demands.iter().map(|d| d.memory).sum();
    let total_cpu_cap: f64 = capacities.iter().map(|c| c.cpu).sum();
    let total_mem_cap: f64 = capacities.iter().map(|c| c.memory).sum();

    // Evenly spread: each node's rho equals the global mean utilization ratio.
    let even_cpu_ratio = if total_cpu_cap > 0.0 { total_cpu / total_cpu_cap } else { 0.0 };
    let even_mem_ratio = if total_mem_cap > 0.0 { total_mem / total_mem_cap } else { 0.0 };
    let even_rho = 0.5 * (even_cpu_ratio + even_mem_ratio);

    let mu_even = inv_weights
        .iter()
        .zip(weights.iter())
        .map(|(_, &w)| if w > 0.0 { even_rho / w } else { 0.0 })
        .sum::<f64>()
        / node_count as f64;
    let pmin: f64 = inv_weights.iter().map(|&iw| (iw - mu_even).powi(2)).sum();

    // All load on the single node with the smallest 1/w (the most central).
    let (central_idx, _) = inv_weights
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap_or((0, &0.0));

    let central_cpu_ratio = if capacities[central_idx].cpu > 0.0 {
        total_cpu / capacities[central_idx].cpu
    } else {
        0.0
    };
    let central_mem_ratio = if capacities[central_idx].memory > 0.0 {
        total_mem / capacities[central_idx].memory
    } else {
        0.0
    };
    let central_rho = 0.5 * (central_cpu_ratio + central_mem_ratio);

    let mut rho_all = vec![0.0; node_count];
    rho_all[central_idx] = central_rho;
    let mu_central = rho_all
        .iter()
        .zip(weights.iter())
        .map(|(&r, &w)| if w > 0.0 { r / w } else { 0.0 })
        .sum::<f64>()
        / node_count as f64;
    let pmax: f64 = inv_weights.iter().map(|&iw| (iw - mu_central).powi(2)).sum();

    if pmin <= pmax {
        (pmin, pmax)
    } else {
        (pmax, pmin)
    }
}

/// Unnormalized composite objective: `INFEASIBLE` if infeasible, else `alpha*Lcost + beta*P1`.
pub fn evaluate_unnormalized(
    assignment: &Assignment,
    dependencies: &Matrix,
    latency: &Matrix,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    alpha: f64,
    beta: f64,
) -> Evaluation {
    if !is_feasible(assignment, demands, capacities) {
        return Evaluation {
            score: INFEASIBLE,
            feasible: false,
            mode: Mode::Neutral,
        };
    }
    let lcost = latency_cost(assignment, dependencies, latency);
    let p1 = resource_penalty(assignment, demands, capacities);
    Evaluation {
        score: alpha * lcost + beta * p1,
        feasible: true,
        mode: Mode::Neutral,
    }
}

/// Normalized composite objective: min-max scaled `Lcost` and `P2`, plus a dominance mode.
pub fn evaluate_normalized(
    assignment: &Assignment,
    dependencies: &Matrix,
    latency: &Matrix,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    alpha: f64,
    beta: f64,
) -> Evaluation {
    let feasible = is_feasible(assignment, demands, capacities);
    if !feasible {
        return Evaluation {
            score: INFEASIBLE,
            feasible: false,
            mode: Mode::Neutral,
        };
    }

    let lcost = latency_cost(assignment, dependencies, latency);
    let p2 = balance_penalty(assignment, demands, capacities, latency);

    let (lmin, lmax) = latency_bounds(dependencies, latency);
    let (pmin, pmax) = balance_bounds(demands, capacities, latency);

    let l_term = if lmax > lmin { (lcost - lmin) / (lmax - lmin) } else { 0.0 };
    let p_term = if pmax > pmin { (p2 - pmin) / (pmax - pmin) } else { 0.0 };

    let weighted_l = alpha * l_term;
    let weighted_p = beta * p_term;
    let mode = if weighted_l > weighted_p {
        Mode::LatencyDominant
    } else if weighted_p > weighted_l {
        Mode::BalanceDominant
    } else {
        Mode::Neutral
    };

    Evaluation {
        score: l_term + p_term,
        feasible: true,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand(cpu: f64, mem: f64) -> ResourceDemand {
        ResourceDemand::new(cpu, mem)
    }

    #[test]
    fn latency_cost_zero_when_no_dependency() {
        let dep = Matrix::zeros(2);
        let mut lat = Matrix::zeros(2);
        lat.set(0, 1, 50.0);
        lat.set(1, 0, 50.0);
        let assignment = vec![0, 1];
        assert_eq!(latency_cost(&assignment, &dep, &lat), 0.0);
    }

    #[test]
    fn latency_cost_same_node_is_zero() {
        let mut dep = Matrix::zeros(2);
        dep.set(0, 1, 1.0);
        dep.set(1, 0, 1.0);
        let mut lat = Matrix::zeros(2);
        lat.set(0, 1, 50.0);
        lat.set(1, 0, 50.0);
        let assignment = vec![0, 0];
        assert_eq!(latency_cost(&assignment, &dep, &lat), 0.0);
    }

    #[test]
    fn feasibility_checks_both_axes() {
        let demands = vec![demand(10.0, 10.0); 4];
        let caps = vec![demand(20.0, 20.0)];
        let assignment = vec![0, 0, 0, 0];
        assert!(!is_feasible(&assignment, &demands, &caps));
    }

    #[test]
    fn infeasible_sentinel() {
        let dep = Matrix::zeros(4);
        let lat = Matrix::zeros(1);
        let demands = vec![demand(10.0, 10.0); 4];
        let caps = vec![demand(20.0, 20.0)];
        let assignment = vec![0, 0, 0, 0];
        let eval = evaluate_unnormalized(&assignment, &dep, &lat, &demands, &caps, 0.7, 0.3);
        assert_eq!(eval.score, INFEASIBLE);
        assert!(!eval.feasible);
    }

    #[test]
    fn normalized_score_within_bounds_for_feasible_assignment() {
        let mut dep = Matrix::zeros(3);
        dep.set(0, 1, 1.0);
        dep.set(1, 0, 1.0);
        let mut lat = Matrix::zeros(2);
        lat.set(0, 1, 10.0);
        lat.set(1, 0, 10.0);
        let demands = vec![demand(1.0, 1.0); 3];
        let caps = vec![demand(10.0, 10.0); 2];
        let assignment = vec![0, 1, 0];
        let eval = evaluate_normalized(&assignment, &dep, &lat, &demands, &caps, 0.7, 0.3);
        assert!(eval.feasible);
        assert!(eval.score >= 0.0 && eval.score <= 2.0);
    }

    #[test]
    fn pmax_concentrates_on_most_central_node() {
        // node 0 is far from the others (peripheral), node 2 is closest to both (most central).
        let mut lat = Matrix::zeros(3);
        lat.set(0, 1, 1000.0);
        lat.set(1, 0, 1000.0);
        lat.set(0, 2, 900.0);
        lat.set(2, 0, 900.0);
        lat.set(1, 2, 10.0);
        lat.set(2, 1, 10.0);
        let demands = vec![demand(1.0, 1.0); 6];
        let caps = vec![demand(10.0, 10.0); 3];

        let (pmin, pmax) = balance_bounds(&demands, &caps, &lat);
        assert!(pmax >= pmin);

        // Piling all load onto node 2 (the most central, smallest 1/w) must reproduce pmax.
        let all_on_central = vec![2usize; 6];
        let p2 = balance_penalty(&all_on_central, &demands, &caps, &lat);
        assert!((p2 - pmax).abs() < 1e-9);
    }

    #[test]
    fn normalized_score_stays_in_bounds_with_asymmetric_latency() {
        let mut dep = Matrix::zeros(4);
        dep.set(0, 1, 1.0);
        dep.set(1, 0, 1.0);
        dep.set(2, 3, 1.0);
        dep.set(3, 2, 1.0);

        let mut lat = Matrix::zeros(3);
        lat.set(0, 1, 1000.0);
        lat.set(1, 0, 1000.0);
        lat.set(0, 2, 900.0);
        lat.set(2, 0, 900.0);
        lat.set(1, 2, 10.0);
        lat.set(2, 1, 10.0);

        let demands = vec![demand(1.0, 1.0); 4];
        let caps = vec![demand(10.0, 10.0); 3];
        let assignment = vec![2, 2, 1, 0];

        let eval = evaluate_normalized(&assignment, &dep, &lat, &demands, &caps, 0.5, 0.6);
        assert!(eval.feasible);
        assert!(eval.score >= 0.0 && eval.score <= 2.0);
    }
}

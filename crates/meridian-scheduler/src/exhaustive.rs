//! Component H: brute-force reference enumerator used as a correctness oracle for small
//! instances. Complexity is `m^n`; not meant for production-sized inputs.

use crate::objective::evaluate_unnormalized;
use meridian_core::{Assignment, Matrix, ResourceDemand};

/// Enumerate every assignment in `[0,m)^n` and return the one with the minimal unnormalized
/// score, along with that score.
pub fn exhaustive_search(
    dependencies: &Matrix,
    latency: &Matrix,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    alpha: f64,
    beta: f64,
) -> (Assignment, f64) {
    let n = demands.len();
    let m = capacities.len();

    let mut best = vec![0usize; n];
    let mut best_score = f64::INFINITY;

    if n == 0 || m == 0 {
        return (best, best_score);
    }

    let mut assignment = vec![0usize; n];
    search(
        0,
        &mut assignment,
        n,
        m,
        dependencies,
        latency,
        demands,
        capacities,
        alpha,
        beta,
        &mut best,
        &mut best_score,
    );

    (best, best_score)
}

#[allow(clippy::too_many_arguments)]
fn search(
    pos: usize,
    assignment: &mut Assignment,
    n: usize,
    m: usize,
    dependencies: &Matrix,
    latency: &Matrix,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    alpha: f64,
    beta: f64,
    best: &mut Assignment,
    best_score: &mut f64,
) {
    if pos == n {
        let eval = evaluate_unnormalized(assignment, dependencies, latency, demands, capacities, alpha, beta);
        if eval.score < *best_score {
            *best_score = eval.score;
            *best = assignment.clone();
        }
        return;
    }

    for node in 0..m {
        assignment[pos] = node;
        search(
            pos + 1,
            assignment,
            n,
            m,
            dependencies,
            latency,
            demands,
            capacities,
            alpha,
            beta,
            best,
            best_score,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e1_colocation_is_optimal() {
        let mut dep = Matrix::zeros(2);
        dep.set(0, 1, 1.0);
        dep.set(1, 0, 1.0);
        let mut lat = Matrix::zeros(2);
        lat.set(0, 1, 50.0);
        lat.set(1, 0, 50.0);
        let demands = vec![ResourceDemand::new(1.0, 1.0); 2];
        let caps = vec![ResourceDemand::new(10.0, 10.0); 2];

        let (assignment, score) = exhaustive_search(&dep, &lat, &demands, &caps, 1.0, 0.0);
        assert_eq!(assignment[0], assignment[1]);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn finds_global_minimum_over_small_space() {
        let mut dep = Matrix::zeros(3);
        dep.set(0, 1, 1.0);
        dep.set(1, 0, 1.0);
        let mut lat = Matrix::zeros(2);
        lat.set(0, 1, 10.0);
        lat.set(1, 0, 10.0);
        let demands = vec![ResourceDemand::new(1.0, 1.0); 3];
        let caps = vec![ResourceDemand::new(10.0, 10.0); 2];

        let (_assignment, score) = exhaustive_search(&dep, &lat, &demands, &caps, 1.0, 0.0);
        assert!(score <= 5.0);
    }
}

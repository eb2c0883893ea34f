//! Component G: local repair moves used by the annealing solver's heuristic proposal,
//! dispatching on which term of the normalized objective currently dominates.

use crate::greedy::degree_order;
use crate::types::Mode;
use meridian_core::{Assignment, Matrix};
use rand::Rng;

/// Mode 1: move a random pod to the node immediately more central than its current node,
/// ranked by ascending total latency.
fn latency_dominant_move(
    assignment: &Assignment,
    latency: &Matrix,
    node_count: usize,
    rng: &mut impl Rng,
) -> Assignment {
    let mut next = assignment.clone();
    if assignment.is_empty() || node_count == 0 {
        return next;
    }

    let mut ranked: Vec<usize> = (0..node_count).collect();
    ranked.sort_by(|&a, &b| latency.row_sum(a).partial_cmp(&latency.row_sum(b)).unwrap());

    let pod = rng.gen_range(0..assignment.len());
    let current = assignment[pod];
    if let Some(rank) = ranked.iter().position(|&n| n == current) {
        if rank > 0 {
            next[pod] = ranked[rank - 1];
        }
    }
    next
}

/// Mode 2: shave the most overloaded node using one of the least-connected pods.
fn balance_dominant_move(
    assignment: &Assignment,
    dependencies: &Matrix,
    node_count: usize,
    rng: &mut impl Rng,
) -> Assignment {
    let mut next = assignment.clone();
    let n = assignment.len();
    if n == 0 || node_count == 0 {
        return next;
    }

    let by_degree = degree_order(dependencies);
    let ascending: Vec<usize> = by_degree.into_iter().rev().collect();

    let mut counts = vec![0usize; node_count];
    for &node in assignment {
        if node < node_count {
            counts[node] += 1;
        }
    }
    let bal = n as f64 / node_count as f64;

    let consider = if ascending.len() > 2 {
        &ascending[..ascending.len() - 2]
    } else {
        &ascending[..]
    };

    for &pod in consider {
        let current = assignment[pod];
        if current < node_count && counts[current] as f64 >= bal + 1.0 {
            next[pod] = rng.gen_range(0..node_count);
            return next;
        }
    }
    next
}

/// Move a random pod to a uniformly random different node.
pub fn random_move(assignment: &Assignment, node_count: usize, rng: &mut impl Rng) -> Assignment {
    let mut next = assignment.clone();
    if assignment.is_empty() || node_count <= 1 {
        return next;
    }
    let pod = rng.gen_range(0..assignment.len());
    let current = assignment[pod];
    let mut new_node = rng.gen_range(0..node_count);
    while new_node == current {
        new_node = rng.gen_range(0..node_count);
    }
    next[pod] = new_node;
    next
}

/// Dispatch on `mode` to produce a locally repaired neighbor. Never mutates `assignment`.
pub fn heuristic_move(
    assignment: &Assignment,
    dependencies: &Matrix,
    latency: &Matrix,
    node_count: usize,
    mode: Mode,
    rng: &mut impl Rng,
) -> Assignment {
    match mode {
        Mode::LatencyDominant => latency_dominant_move(assignment, latency, node_count, rng),
        Mode::BalanceDominant => balance_dominant_move(assignment, dependencies, node_count, rng),
        Mode::Neutral => random_move(assignment, node_count, rng),
    }
}

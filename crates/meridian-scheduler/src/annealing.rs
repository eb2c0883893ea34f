//! Component F: simulated-annealing solver over assignments, with Metropolis acceptance
//! and geometric cooling. Supports both the unnormalized and normalized objectives.

use crate::error::{Result, SchedulerError};
use crate::heuristic::{heuristic_move, random_move};
use crate::objective::{evaluate_normalized, evaluate_unnormalized};
use crate::types::{Mode, INFEASIBLE};
use meridian_core::{Assignment, Matrix, ResourceDemand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Annealer parameters. Mirrors the solver's tunables from the source design.
#[derive(Debug, Clone)]
pub struct AnnealingParams {
    pub alpha: f64,
    pub beta: f64,
    pub max_iter: u64,
    pub init_temp: f64,
    pub final_temp: f64,
    pub cooling_rate: f64,
    pub seed: Option<u64>,
    pub normalized: bool,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            beta: 0.3,
            max_iter: 10_000,
            init_temp: 1000.0,
            final_temp: 0.1,
            cooling_rate: 0.98,
            seed: None,
            normalized: false,
        }
    }
}

impl AnnealingParams {
    /// Validate preconditions per the error handling design: `init_temp > final_temp`,
    /// `cooling_rate` in `(0,1)`, `max_iter > 0`.
    pub fn validate(&self) -> Result<()> {
        if self.init_temp <= self.final_temp {
            return Err(SchedulerError::invalid_parameters(
                "init_temp must be greater than final_temp",
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(SchedulerError::invalid_parameters(
                "cooling_rate must be in (0, 1)",
            ));
        }
        if self.max_iter == 0 {
            return Err(SchedulerError::invalid_parameters("max_iter must be > 0"));
        }
        Ok(())
    }
}

/// Result of an annealing run: the best assignment found, its score, feasibility, and
/// whether a cancellation probe stopped the run early.
#[derive(Debug, Clone)]
pub struct AnnealingResult {
    pub assignment: Assignment,
    pub score: f64,
    pub feasible: bool,
    pub cancelled: bool,
}

fn random_assignment(n: usize, node_count: usize, rng: &mut impl Rng) -> Assignment {
    if node_count == 0 {
        return vec![0; n];
    }
    (0..n).map(|_| rng.gen_range(0..node_count)).collect()
}

/// Run simulated annealing. `cancel` is checked once per iteration; when it returns `true`
/// the run stops early and returns the best assignment found so far with `cancelled: true`.
pub fn anneal(
    dependencies: &Matrix,
    latency: &Matrix,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    params: &AnnealingParams,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<AnnealingResult> {
    params.validate()?;
    let n = demands.len();
    let node_count = capacities.len();

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut current = random_assignment(n, node_count, &mut rng);
    let mut current_eval = evaluate(
        &current, dependencies, latency, demands, capacities, params, 1000.0,
    );
    let mut best = current.clone();
    let mut best_score = current_eval.0;
    let mut best_feasible = current_eval.1;

    let mut temp = params.init_temp;
    let mut repeat: u32 = 0;
    let mut cancelled = false;
    let mut iter = 0u64;

    while iter < params.max_iter && temp > params.final_temp {
        if let Some(probe) = cancel {
            if probe() {
                cancelled = true;
                break;
            }
        }

        let mode = current_eval.2;
        let use_heuristic = if params.normalized {
            if repeat > 3 {
                repeat = 0;
                true
            } else {
                temp <= 0.3 * params.init_temp
            }
        } else {
            false
        };

        let candidate = if use_heuristic {
            heuristic_move(&current, dependencies, latency, node_count, mode, &mut rng)
        } else {
            random_move(&current, node_count, &mut rng)
        };

        let candidate_eval = evaluate(
            &candidate, dependencies, latency, demands, capacities, params, temp,
        );
        let delta = candidate_eval.0 - current_eval.0;

        let accept = if delta < 0.0 {
            true
        } else {
            let p = (-delta / temp).exp();
            rng.gen::<f64>() < p
        };

        if accept {
            current = candidate;
            current_eval = candidate_eval;
            repeat = 0;
            if current_eval.0 < best_score {
                best = current.clone();
                best_score = current_eval.0;
                best_feasible = current_eval.1;
            }
        } else {
            repeat += 1;
        }

        temp *= params.cooling_rate;
        iter += 1;
    }

    debug!(iterations = iter, best_score, "annealing run complete");

    Ok(AnnealingResult {
        assignment: best,
        score: best_score,
        feasible: best_feasible,
        cancelled,
    })
}

/// Evaluate `assignment`, picking weights and objective form per the temperature schedule.
/// Returns `(score, feasible, mode)`.
fn evaluate(
    assignment: &Assignment,
    dependencies: &Matrix,
    latency: &Matrix,
    demands: &[ResourceDemand],
    capacities: &[ResourceDemand],
    params: &AnnealingParams,
    temp: f64,
) -> (f64, bool, Mode) {
    if !params.normalized {
        let eval = evaluate_unnormalized(
            assignment, dependencies, latency, demands, capacities, params.alpha, params.beta,
        );
        return (eval.score, eval.feasible, eval.mode);
    }

    let (alpha, beta) = if temp > 0.4 * params.init_temp {
        (0.7, 0.3)
    } else {
        (0.5, 0.6)
    };
    let eval = evaluate_normalized(assignment, dependencies, latency, demands, capacities, alpha, beta);
    (eval.score, eval.feasible, eval.mode)
}

/// `true` iff `score` is the infeasibility sentinel.
pub fn is_infeasible_score(score: f64) -> bool {
    score >= INFEASIBLE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_caps(n: usize, cpu: f64, mem: f64) -> Vec<ResourceDemand> {
        vec![ResourceDemand::new(cpu, mem); n]
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut params = AnnealingParams::default();
        params.init_temp = 1.0;
        params.final_temp = 10.0;
        assert!(params.validate().is_err());

        let mut params = AnnealingParams::default();
        params.cooling_rate = 1.5;
        assert!(params.validate().is_err());

        let mut params = AnnealingParams::default();
        params.max_iter = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn deterministic_with_fixed_seed() {
        let dep = Matrix::zeros(4);
        let lat = Matrix::zeros(2);
        let demands = vec![ResourceDemand::new(1.0, 1.0); 4];
        let caps = uniform_caps(2, 10.0, 10.0);
        let mut params = AnnealingParams::default();
        params.seed = Some(42);
        params.max_iter = 200;

        let r1 = anneal(&dep, &lat, &demands, &caps, &params, None).unwrap();
        let r2 = anneal(&dep, &lat, &demands, &caps, &params, None).unwrap();
        assert_eq!(r1.assignment, r2.assignment);
        assert_eq!(r1.score, r2.score);
    }

    #[test]
    fn e5_infeasible_returns_no_feasible_assignment() {
        let dep = Matrix::zeros(4);
        let lat = Matrix::zeros(1);
        let demands = vec![ResourceDemand::new(10.0, 1.0); 4];
        let caps = uniform_caps(1, 20.0, 100.0);
        let mut params = AnnealingParams::default();
        params.seed = Some(1);
        params.max_iter = 200;

        let result = anneal(&dep, &lat, &demands, &caps, &params, None).unwrap();
        assert!(!result.feasible);
        assert!(is_infeasible_score(result.score));
    }

    #[test]
    fn e4_nine_pod_benchmark_beats_all_on_node_zero() {
        let edges = [
            (0, 1),
            (1, 2),
            (1, 5),
            (1, 8),
            (2, 3),
            (2, 4),
            (5, 6),
            (5, 7),
            (5, 8),
        ];
        let mut dep = Matrix::zeros(9);
        for (i, j) in edges {
            dep.set(i, j, 1.0);
            dep.set(j, i, 1.0);
        }

        let raw_latency: [[f64; 5]; 5] = [
            [0.0, 132.0, 121.0, 400.0, 130.0],
            [101.0, 0.0, 121.0, 400.0, 130.0],
            [101.0, 132.0, 0.0, 400.0, 130.0],
            [101.0, 132.0, 121.0, 0.0, 130.0],
            [417.0, 432.0, 321.0, 301.0, 0.0],
        ];
        let mut lat = Matrix::zeros(5);
        for i in 0..5 {
            for j in 0..5 {
                lat.set(i, j, raw_latency[i][j]);
            }
        }

        let demands = vec![ResourceDemand::new(2.0, 4.0); 9];
        let caps = uniform_caps(5, 32.0, 64.0);

        let mut params = AnnealingParams::default();
        params.alpha = 0.7;
        params.beta = 0.3;
        params.max_iter = 10_000;
        params.init_temp = 1000.0;
        params.final_temp = 0.1;
        params.cooling_rate = 0.98;
        params.seed = Some(42);

        let result = anneal(&dep, &lat, &demands, &caps, &params, None).unwrap();
        assert!(result.feasible);

        let all_on_zero = vec![0usize; 9];
        let baseline = evaluate_unnormalized(&all_on_zero, &dep, &lat, &demands, &caps, params.alpha, params.beta);
        assert!(result.score < baseline.score);
    }

    #[test]
    fn cancellation_stops_early() {
        let dep = Matrix::zeros(4);
        let lat = Matrix::zeros(2);
        let demands = vec![ResourceDemand::new(1.0, 1.0); 4];
        let caps = uniform_caps(2, 10.0, 10.0);
        let mut params = AnnealingParams::default();
        params.seed = Some(5);
        params.max_iter = 100_000;

        let cancel = || true;
        let result = anneal(&dep, &lat, &demands, &caps, &params, Some(&cancel)).unwrap();
        assert!(result.cancelled);
    }
}

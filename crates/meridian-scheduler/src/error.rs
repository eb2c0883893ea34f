use meridian_core::MeridianError;
use miette::Diagnostic;
use thiserror::Error;

/// Scheduler error type.
#[derive(Error, Debug, Diagnostic)]
pub enum SchedulerError {
    /// The latency matrix dimension does not match the node inventory.
    #[error("invalid inputs: {reason}")]
    #[diagnostic(
        code(scheduler::invalid_inputs),
        help("Make sure the latency snapshot covers exactly the nodes passed to the scheduler")
    )]
    ShapeMismatch { reason: String },

    /// Every assignment the solver examined violated resource capacity.
    #[error("no feasible placement found for {pod_count} pods across {node_count} nodes")]
    #[diagnostic(
        code(scheduler::no_feasible_placement),
        help("Relax pod resource demands, add node capacity, or retry with a larger search budget")
    )]
    NoFeasiblePlacement { pod_count: usize, node_count: usize },

    /// A solver parameter violated its precondition.
    #[error("invalid parameter: {reason}")]
    #[diagnostic(
        code(scheduler::invalid_parameters),
        help("Check init_temp > final_temp, cooling_rate in (0,1), max_iter > 0, and balance_factor >= 1")
    )]
    InvalidParameters { reason: String },

    /// Propagated from `meridian-core`.
    #[error("core error: {0}")]
    #[diagnostic(code(scheduler::core_error))]
    Core(#[from] MeridianError),

    /// Internal error (bug).
    #[error("internal error: {message}")]
    #[diagnostic(
        code(scheduler::internal_error),
        help("This is likely a bug. Please report it")
    )]
    InternalError { message: String },
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

impl SchedulerError {
    pub fn shape_mismatch(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }

    pub fn no_feasible_placement(pod_count: usize, node_count: usize) -> Self {
        Self::NoFeasiblePlacement {
            pod_count,
            node_count,
        }
    }

    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

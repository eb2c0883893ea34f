use miette::Diagnostic;
use thiserror::Error;

/// Core error type shared by every Meridian crate.
#[derive(Error, Debug, Diagnostic)]
pub enum MeridianError {
    /// A matrix, assignment, or inventory did not have the shape the caller expected.
    #[error("shape mismatch: {reason}")]
    #[diagnostic(
        code(meridian::shape_mismatch),
        help("Check that the latency matrix dimension matches the node inventory")
    )]
    ShapeMismatch { reason: String },

    /// A resource quantity string could not be parsed.
    #[error("invalid resource quantity '{value}': {reason}")]
    #[diagnostic(
        code(meridian::invalid_resource),
        help("Use a plain number (cores/bytes) or a Kubernetes-style quantity like '500m' or '1Gi'")
    )]
    InvalidResource { value: String, reason: String },

    /// JSON (de)serialization failed.
    #[error("serialization error: {message}")]
    #[diagnostic(code(meridian::serialization_error), help("Check the input is valid JSON"))]
    SerializationError { message: String },

    /// Anything else that should never happen in correct usage.
    #[error("internal error: {message}")]
    #[diagnostic(
        code(meridian::internal_error),
        help("This is likely a bug. Please report it with the full error details")
    )]
    InternalError { message: String },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, MeridianError>;

impl MeridianError {
    pub fn shape_mismatch(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }

    pub fn invalid_resource(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

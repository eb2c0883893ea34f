//! Meridian Core - shared data model for the latency-aware placement engine
//!
//! This crate provides:
//! - The `Matrix` primitive shared by the dependency and latency matrices
//! - The `Pod` / `Node` / `Workload` / `Dependency` data model
//! - Error types with miette diagnostics
//! - Resource quantity parsing and node-affinity rendering helpers

pub mod affinity;
pub mod error;
pub mod matrix;
pub mod quantities;
pub mod types;

pub use affinity::render_node_affinity;
pub use error::{MeridianError, Result};
pub use matrix::Matrix;
pub use types::{
    is_control_plane_name, Assignment, Dependency, Node, Phase, Pod, ResourceDemand, Workload,
};

/// Serialize a value to JSON.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| MeridianError::serialization_error(format!("failed to serialize: {e}")))
}

/// Serialize a value to pretty-printed JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| MeridianError::serialization_error(format!("failed to serialize: {e}")))
}

/// Deserialize a value from JSON.
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data)
        .map_err(|e| MeridianError::serialization_error(format!("failed to deserialize: {e}")))
}

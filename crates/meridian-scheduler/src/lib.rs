//! Meridian Scheduler - the latency-aware placement core
//!
//! This crate provides:
//! - A graph parser turning a `Workload` into a canonical dependency matrix
//! - A latency aggregator reducing a raw sample stream to a symmetric matrix
//! - An objective evaluator (latency cost, resource feasibility, balance penalty)
//! - Three placement strategies: greedy, simulated annealing, and exhaustive enumeration
//! - A `Scheduler` facade wiring all of the above together

pub mod annealing;
pub mod error;
pub mod exhaustive;
pub mod greedy;
pub mod heuristic;
pub mod latency;
pub mod objective;
pub mod parser;
pub mod scheduler;
pub mod types;

pub use annealing::{AnnealingParams, AnnealingResult};
pub use error::{Result, SchedulerError};
pub use scheduler::{Placement, Scheduler, SchedulerConfig};
pub use types::{AggregatedLatency, LatencyReading, LatencySample, LatencySnapshot, Mode, ParsedGraph};

//! Velocity, streak and daily-aggregate post-processing for South Delta
//! gate scenarios.
//!
//! The pipeline takes an assembled scenario, slices it per gate, derives
//! velocity from flow and stage, run-length encodes the velocity and
//! gate-operation categories into streaks, joins the two annotated
//! series per timestamp, and reduces the result to daily compliance
//! statistics:
//!
//! - [`bundle`] - per-gate partitioning of scenario tables
//! - [`velocity`] - series alignment and velocity computation
//! - [`streaks`] - category labeling and run-length streak detection
//! - [`samples`] - per-timestamp merge of the two annotated series
//! - [`aggregate`] - the two daily reductions
//! - [`pipeline`] - the end-to-end per-scenario driver
//! - [`report`] - CSV/JSON writers for everything above

pub mod aggregate;
pub mod bundle;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod samples;
pub mod streaks;
pub mod velocity;

pub use error::{PostError, Result};

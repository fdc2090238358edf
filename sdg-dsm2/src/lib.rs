//! Core types and readers for DSM2 South Delta gate output.
//!
//! A DSM2 run leaves behind a pair of exported time-series containers
//! (gate flows/stages and channel hydrodynamics) plus an input echo file.
//! This crate turns those files into normalized tables and typed gate
//! configuration that the post-processing crate consumes:
//!
//! - [`pathname`] - six-part series addresses and catalog filters
//! - [`timeseries`] - container reader producing normalized long tables
//! - [`record`] - the normalized record/table types
//! - [`echo`] - `GATE_WEIR_DEVICE` section parser for physical settings
//! - [`gates`] - the static South Delta gate registry
//! - [`scenario`] - scenario assembly and directory discovery

pub mod dates;
pub mod echo;
pub mod error;
pub mod gates;
pub mod pathname;
pub mod record;
pub mod scenario;
pub mod timeseries;

pub use error::{Dsm2Error, Result};

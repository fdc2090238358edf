//! Static South Delta gate registry.
//!
//! The three temporary barriers (Grant Line Canal, Middle River, Old
//! River) and the sensor names their series are published under. These
//! values mirror the DSM2 model configuration and only change when the
//! model setup does, so they live in code rather than in a runtime
//! config file.

use serde::Serialize;
use std::fmt;

/// Elevation sensors carried in the gate-flow export (part B names).
pub const ELEVATION_SENSORS: [&str; 6] = [
    "MID_GATE_UP",
    "MID_GATE_DOWN",
    "GLC_GATE_UP",
    "GLC_GATE_DOWN",
    "OLD_GATE_UP",
    "OLD_GATE_DOWN",
];

/// Flow sensors carried in the gate-flow export.
pub const FLOW_SENSORS: [&str; 5] = [
    "GLC_FLOW_FISH",
    "MID_FLOW_FISH",
    "MID_FLOW_GATE",
    "OLD_FLOW_FISH",
    "OLD_FLOW_GATE",
];

/// Gate-operation loggers carried in the gate-flow export.
pub const GATE_OP_SENSORS: [&str; 3] = ["MID_GATEOP", "GLC_GATEOP", "OLD_GATEOP"];

/// Compliance stations carried in the hydro export.
pub const COMPLIANCE_STATIONS: [&str; 3] = ["MHO", "DGL", "OLD"];

/// Gate-operation logger aliases, raw name to canonical station code.
pub const GATE_OP_ALIASES: [(&str, &str); 3] = [
    ("MID_GATEOP", "MHO"),
    ("GLC_GATEOP", "DGL"),
    ("OLD_GATEOP", "OLD"),
];

/// The three South Delta fish-passage gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gate {
    GrantLine,
    MiddleRiver,
    OldRiver,
}

impl Gate {
    pub const ALL: [Gate; 3] = [Gate::GrantLine, Gate::MiddleRiver, Gate::OldRiver];

    /// Three-letter code used in output tables.
    pub fn code(&self) -> &'static str {
        match self {
            Gate::GrantLine => "GLC",
            Gate::MiddleRiver => "MID",
            Gate::OldRiver => "OLD",
        }
    }

    /// Human-readable gate name.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::GrantLine => "GrantLine",
            Gate::MiddleRiver => "MiddleRiver",
            Gate::OldRiver => "OldRiver",
        }
    }

    /// Gate name as it appears in echo-file `GATE_WEIR_DEVICE` rows.
    pub fn echo_name(&self) -> &'static str {
        match self {
            Gate::GrantLine => "grantline_gate",
            Gate::MiddleRiver => "middle_r_gate",
            Gate::OldRiver => "old_r_gate",
        }
    }

    /// Look a gate up by its echo-file name.
    pub fn from_echo_name(name: &str) -> Option<Gate> {
        Gate::ALL.iter().copied().find(|g| g.echo_name() == name)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-gate configuration driving partitioning and velocity.
///
/// `width` and `bottom_elevation` are the as-modeled geometry in feet;
/// `discharge_coefficient` is carried for reporting. The `*_key` fields
/// name the series each gate's data is published under.
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub gate: Gate,
    /// Fish-passage opening width in feet.
    pub width: f64,
    /// Gate bottom elevation in feet (negative is below datum).
    pub bottom_elevation: f64,
    pub discharge_coefficient: f64,
    /// Compliance/gate-op station code (DGL, MHO, OLD).
    pub station_key: &'static str,
    /// Identifier of the fish-passage flow series.
    pub flow_series_key: &'static str,
    /// Identifier of the upstream gate stage series.
    pub gate_status_series_key: &'static str,
}

impl GateConfig {
    /// The production South Delta gate table.
    pub fn south_delta() -> Vec<GateConfig> {
        vec![
            GateConfig {
                gate: Gate::GrantLine,
                width: 5.0,
                bottom_elevation: -6.0,
                discharge_coefficient: 0.8,
                station_key: "DGL",
                flow_series_key: "GLC_FLOW_FISH",
                gate_status_series_key: "GLC_GATE_UP",
            },
            GateConfig {
                gate: Gate::MiddleRiver,
                width: 5.0,
                bottom_elevation: -5.0,
                discharge_coefficient: 0.8,
                station_key: "MHO",
                flow_series_key: "MID_FLOW_FISH",
                gate_status_series_key: "MID_GATE_UP",
            },
            GateConfig {
                gate: Gate::OldRiver,
                width: 5.0,
                bottom_elevation: -7.0,
                discharge_coefficient: 0.8,
                station_key: "OLD",
                flow_series_key: "OLD_FLOW_FISH",
                gate_status_series_key: "OLD_GATE_UP",
            },
        ]
    }
}

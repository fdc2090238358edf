//! Per-gate partitioning of assembled scenario data.
//!
//! Partitioning slices the scenario tables into one bundle per gate
//! using the static gate configuration: each gate names the flow,
//! stage, gate-operation and compliance series it owns. A required
//! selection that comes back empty is a configuration/source naming
//! mismatch and fails loudly instead of producing a hollow bundle.

use std::collections::BTreeMap;

use sdg_dsm2::dates::TimeWindow;
use sdg_dsm2::gates::{Gate, GateConfig, GATE_OP_ALIASES};
use sdg_dsm2::record::TimeSample;
use sdg_dsm2::scenario::ScenarioData;

use crate::error::{PostError, Result};

/// One gate's slice of a scenario plus the geometry velocity needs.
///
/// `velocity` starts empty and is populated by the velocity engine;
/// nothing else changes after partitioning.
#[derive(Debug, Clone)]
pub struct GateBundle {
    pub gate: Gate,
    /// Fish-passage opening width in feet.
    pub width: f64,
    /// Gate bottom elevation in feet.
    pub bottom_elevation: f64,
    pub flow: Vec<TimeSample>,
    pub stage: Vec<TimeSample>,
    pub gate_ops: Vec<TimeSample>,
    pub compliance: Vec<TimeSample>,
    pub velocity: Vec<TimeSample>,
}

/// Split a scenario into per-gate bundles.
///
/// Per config: flow rows by the flow series key; stage rows by the
/// gate-status series key restricted to `FEET` (rows in any other unit
/// are dropped, the stage table can carry mixed units upstream);
/// gate-operation rows by station code after alias renaming; compliance
/// rows by station code. The window bounds every selection, both ends
/// inclusive. Empty flow or stage after filtering is an
/// [`PostError::EmptyPartition`].
pub fn partition(
    scenario: &ScenarioData,
    configs: &[GateConfig],
    window: &TimeWindow,
) -> Result<BTreeMap<Gate, GateBundle>> {
    // one renaming pass up front; every gate reads from the result
    let gate_ops = scenario.gate_ops.rename_identifiers(&GATE_OP_ALIASES);

    let mut bundles = BTreeMap::new();
    for config in configs {
        let flow_table = scenario
            .flow
            .filter_identifier(config.flow_series_key)
            .filter_window(window);
        if flow_table.is_empty() {
            return Err(PostError::EmptyPartition {
                gate: config.gate.code().to_string(),
                key: config.flow_series_key.to_string(),
            });
        }

        let stage_table = scenario
            .stage
            .filter_identifier(config.gate_status_series_key)
            .filter_unit("FEET")
            .filter_window(window);
        if stage_table.is_empty() {
            return Err(PostError::EmptyPartition {
                gate: config.gate.code().to_string(),
                key: config.gate_status_series_key.to_string(),
            });
        }

        let op_table = gate_ops
            .filter_identifier(config.station_key)
            .filter_window(window);
        let compliance_table = scenario
            .compliance
            .filter_identifier(config.station_key)
            .filter_window(window);

        log::debug!(
            "gate {}: {} flow, {} stage, {} gate-op, {} compliance rows",
            config.gate,
            flow_table.len(),
            stage_table.len(),
            op_table.len(),
            compliance_table.len()
        );

        bundles.insert(
            config.gate,
            GateBundle {
                gate: config.gate,
                width: config.width,
                bottom_elevation: config.bottom_elevation,
                flow: flow_table.series(config.flow_series_key),
                stage: stage_table.series(config.gate_status_series_key),
                gate_ops: op_table.series(config.station_key),
                compliance: compliance_table.series(config.station_key),
                velocity: Vec::new(),
            },
        );
    }
    Ok(bundles)
}

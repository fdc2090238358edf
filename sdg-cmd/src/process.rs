//! Single-scenario post-processing: assemble the scenario, run the
//! gate pipeline, write the report files.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use log::info;
use sdg_dsm2::gates::{Gate, GateConfig};
use sdg_dsm2::scenario::{assemble, scenario_name_from_path};
use sdg_post::pipeline::{process_scenario, GateReport, PostParams};
use sdg_post::report::{write_daily_csv, write_daily_json, write_merged_csv, write_streaks_csv};

use crate::parse_window;

pub fn run_process(
    gate_flow: &Path,
    compliance: &Path,
    echo: &Path,
    name: Option<&str>,
    datetime_filter: Option<&str>,
    threshold: f64,
    interval: f64,
    output: &Path,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => scenario_name_from_path(gate_flow),
    };
    let params = PostParams {
        sampling_interval_minutes: interval,
        velocity_threshold_fps: threshold,
        window: parse_window(datetime_filter)?,
    };

    let scenario = assemble(&name, gate_flow, compliance, echo)?;
    let configs = GateConfig::south_delta();
    let reports = process_scenario(&scenario, &configs, &params)?;
    write_reports(output, &reports)?;
    info!(
        "scenario '{}' processed, reports in {}",
        name,
        output.display()
    );
    Ok(())
}

/// Write the per-gate report files into `output`.
///
/// Produces `<scenario>_<gate>_merged.csv`, `..._velocity_streaks.csv`,
/// `..._gate_streaks.csv`, `..._daily.csv` and `..._daily.json` for
/// every gate in the run.
pub(crate) fn write_reports(
    output: &Path,
    reports: &BTreeMap<Gate, GateReport>,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(output)?;
    for (gate, report) in reports {
        let base = format!("{}_{}", report.scenario, gate.code());
        write_merged_csv(
            File::create(output.join(format!("{}_merged.csv", base)))?,
            &report.merged,
        )?;
        write_streaks_csv(
            File::create(output.join(format!("{}_velocity_streaks.csv", base)))?,
            &report.velocity_streaks,
        )?;
        write_streaks_csv(
            File::create(output.join(format!("{}_gate_streaks.csv", base)))?,
            &report.gate_streaks,
        )?;
        write_daily_csv(
            File::create(output.join(format!("{}_daily.csv", base)))?,
            &report.daily,
        )?;
        write_daily_json(
            File::create(output.join(format!("{}_daily.json", base)))?,
            &report.daily,
        )?;
    }
    Ok(())
}

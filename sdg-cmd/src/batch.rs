//! Batch post-processing over every scenario in a study directory.
//!
//! Scenario failures are isolated: each one is logged, the remaining
//! scenarios still run, and the command exits nonzero at the end if
//! anything failed.

use std::path::Path;

use log::{error, info};
use sdg_dsm2::gates::GateConfig;
use sdg_dsm2::scenario::{assemble, discover_scenarios, ScenarioFiles};
use sdg_post::pipeline::{process_scenario, PostParams};

use crate::parse_window;
use crate::process::write_reports;

pub fn run_batch(
    dir: &Path,
    name_filter: Option<&str>,
    datetime_filter: Option<&str>,
    threshold: f64,
    interval: f64,
    output: &Path,
) -> anyhow::Result<()> {
    let params = PostParams {
        sampling_interval_minutes: interval,
        velocity_threshold_fps: threshold,
        window: parse_window(datetime_filter)?,
    };
    let configs = GateConfig::south_delta();

    let scenarios = discover_scenarios(dir, name_filter)?;
    if scenarios.is_empty() {
        anyhow::bail!("no scenarios found under {}", dir.display());
    }
    let total = scenarios.len();
    info!("processing {} scenario(s) from {}", total, dir.display());

    let mut failures: Vec<String> = Vec::new();
    for files in scenarios {
        match process_one(&files, &configs, &params, output) {
            Ok(()) => info!("scenario '{}' done", files.name),
            Err(err) => {
                error!("scenario '{}' failed: {:#}", files.name, err);
                failures.push(files.name);
            }
        }
    }

    if failures.is_empty() {
        info!(
            "all {} scenario(s) processed, reports in {}",
            total,
            output.display()
        );
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} scenario(s) failed: {}",
            failures.len(),
            total,
            failures.join(", ")
        )
    }
}

fn process_one(
    files: &ScenarioFiles,
    configs: &[GateConfig],
    params: &PostParams,
    output: &Path,
) -> anyhow::Result<()> {
    let scenario = assemble(&files.name, &files.gate_flow, &files.compliance, &files.echo)?;
    let reports = process_scenario(&scenario, configs, params)?;
    write_reports(output, &reports)
}

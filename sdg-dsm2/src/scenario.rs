//! Scenario assembly and directory discovery.
//!
//! A scenario is one simulation run represented by three files: the
//! gate-flow container (`*sdg*.csv`), the channel hydrodynamics
//! container (`*hydro*.csv`) and the input echo file (`*echo*.inp`).
//! Assembly reads all three and splits the gate-flow data into the
//! stage, flow and gate-operation tables post-processing needs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::echo::{self, GateSettings};
use crate::error::{with_path, Dsm2Error, Result};
use crate::gates::{
    Gate, COMPLIANCE_STATIONS, ELEVATION_SENSORS, FLOW_SENSORS, GATE_OP_SENSORS,
};
use crate::pathname::PathFilter;
use crate::record::TimeSeriesTable;
use crate::timeseries::parse_timeseries;

/// All source data of one scenario, immutable once assembled.
#[derive(Debug, Clone)]
pub struct ScenarioData {
    pub name: String,
    /// Gate stage sensors (upstream/downstream elevations), in feet.
    pub stage: TimeSeriesTable,
    /// Fish-passage and gate device flows, in CFS.
    pub flow: TimeSeriesTable,
    /// Raw gate-operation logger series.
    pub gate_ops: TimeSeriesTable,
    /// Water levels at the compliance stations.
    pub compliance: TimeSeriesTable,
    /// Physical gate settings from the echo file.
    pub gate_settings: BTreeMap<Gate, GateSettings>,
}

/// Assemble a scenario from its three source files.
///
/// The gate-flow container is split by three disjoint filters (stage,
/// device flow, gate operations); the hydro container supplies water
/// levels at the compliance stations. Empty stage or flow tables are
/// malformed sources because velocity needs both downstream.
pub fn assemble(
    name: &str,
    gate_flow_path: &Path,
    compliance_path: &Path,
    echo_path: &Path,
) -> Result<ScenarioData> {
    let sdg_text = read_source(gate_flow_path)?;
    let hydro_text = read_source(compliance_path)?;

    let scenario = assemble_from_text(name, &sdg_text, &hydro_text)
        .map_err(|e| with_path(e, gate_flow_path))?;
    let gate_settings = echo::read_echo(echo_path)?;

    log::info!(
        "scenario {}: {} stage, {} flow, {} gate-op, {} compliance rows",
        name,
        scenario.stage.len(),
        scenario.flow.len(),
        scenario.gate_ops.len(),
        scenario.compliance.len()
    );
    Ok(ScenarioData {
        gate_settings,
        ..scenario
    })
}

/// Assemble the table half of a scenario from container text.
///
/// `gate_settings` is left empty; [`assemble`] fills it from the echo
/// file.
pub fn assemble_from_text(name: &str, sdg_text: &str, hydro_text: &str) -> Result<ScenarioData> {
    let stage = parse_timeseries(sdg_text, &PathFilter::for_series(&ELEVATION_SENSORS, "STAGE"))?;
    let flow = parse_timeseries(sdg_text, &PathFilter::for_series(&FLOW_SENSORS, "DEVICE-FLOW"))?;
    let gate_ops = parse_timeseries(sdg_text, &PathFilter::for_series(&GATE_OP_SENSORS, "ELEV"))?;
    let compliance = parse_timeseries(
        hydro_text,
        &PathFilter::for_series(&COMPLIANCE_STATIONS, "STAGE"),
    )?;

    if stage.is_empty() {
        return Err(malformed("no gate stage series matched the elevation sensors"));
    }
    if flow.is_empty() {
        return Err(malformed("no device flow series matched the flow sensors"));
    }

    Ok(ScenarioData {
        name: name.to_string(),
        stage,
        flow,
        gate_ops,
        compliance,
        gate_settings: BTreeMap::new(),
    })
}

// ───────────────────── Discovery ─────────────────────

/// The three files of one scenario found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioFiles {
    pub name: String,
    pub gate_flow: PathBuf,
    pub compliance: PathBuf,
    pub echo: PathBuf,
}

/// Scan a scenario directory's `output/` subdirectory and pair the
/// gate-flow, hydro and echo files that belong together.
///
/// Files pair when their stems share the same first underscore token
/// (the scenario name) and the same token count, mirroring how runs
/// name their outputs (`base_hydro.csv` with `base_sdg.csv`). An
/// optional `name_filter` keeps only files containing the given string,
/// case-insensitively.
pub fn discover_scenarios(dir: &Path, name_filter: Option<&str>) -> Result<Vec<ScenarioFiles>> {
    let output_dir = dir.join("output");
    let entries = std::fs::read_dir(&output_dir).map_err(|source| Dsm2Error::SourceUnavailable {
        path: output_dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Dsm2Error::SourceUnavailable {
            path: output_dir.clone(),
            source,
        })?;
        files.push(entry.path());
    }

    pair_scenario_files(&output_dir, files, name_filter)
}

/// Pure pairing step behind [`discover_scenarios`].
pub fn pair_scenario_files(
    dir: &Path,
    files: Vec<PathBuf>,
    name_filter: Option<&str>,
) -> Result<Vec<ScenarioFiles>> {
    let keep = |path: &PathBuf| match name_filter {
        Some(filter) => file_name_lower(path).contains(&filter.to_lowercase()),
        None => true,
    };
    let files: Vec<PathBuf> = files.into_iter().filter(keep).collect();

    let gate_flow_files = select(&files, "sdg", "csv");
    let hydro_files = select(&files, "hydro", "csv");
    let echo_files = select(&files, "echo", "inp");

    if gate_flow_files.len() != hydro_files.len() {
        return Err(Dsm2Error::UnmatchedScenarioFiles {
            dir: dir.to_path_buf(),
            reason: format!(
                "{} gate-flow files but {} hydro files",
                gate_flow_files.len(),
                hydro_files.len()
            ),
        });
    }

    let mut scenarios = Vec::new();
    for gate_flow in &gate_flow_files {
        let name = scenario_name_from_path(gate_flow);
        let compliance = find_mate(&hydro_files, gate_flow).ok_or_else(|| {
            Dsm2Error::UnmatchedScenarioFiles {
                dir: dir.to_path_buf(),
                reason: format!("no hydro file pairs with {}", gate_flow.display()),
            }
        })?;
        let echo = echo_files
            .iter()
            .find(|e| scenario_name_from_path(e) == name)
            .ok_or_else(|| Dsm2Error::UnmatchedScenarioFiles {
                dir: dir.to_path_buf(),
                reason: format!("no echo file pairs with {}", gate_flow.display()),
            })?;
        scenarios.push(ScenarioFiles {
            name,
            gate_flow: gate_flow.clone(),
            compliance: compliance.clone(),
            echo: echo.clone(),
        });
    }

    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    log::info!("discovered {} scenario(s) in {}", scenarios.len(), dir.display());
    Ok(scenarios)
}

/// Scenario short name from a file path: the stem's first underscore
/// token.
pub fn scenario_name_from_path(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    stem.split('_').next().unwrap_or(stem).to_string()
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn select(files: &[PathBuf], tag: &str, extension: &str) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|p| {
            file_name_lower(p).contains(tag)
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .cloned()
        .collect()
}

/// A hydro file pairs with a gate-flow file when both stems have the
/// same token count and share the first token.
fn find_mate<'a>(candidates: &'a [PathBuf], reference: &Path) -> Option<&'a PathBuf> {
    let ref_stem = reference.file_stem().and_then(|s| s.to_str())?;
    let ref_tokens: Vec<&str> = ref_stem.split('_').collect();
    candidates.iter().find(|c| {
        let Some(stem) = c.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };
        let tokens: Vec<&str> = stem.split('_').collect();
        tokens.len() == ref_tokens.len() && tokens.first() == ref_tokens.first()
    })
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Dsm2Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

fn malformed(reason: &str) -> Dsm2Error {
    Dsm2Error::MalformedSource {
        path: Default::default(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDG: &str = "\
path,datetime,value,unit
/HIST/GLC_FLOW_FISH/DEVICE-FLOW//15MIN/SDG/,2016-01-01 00:00,120.0,CFS
/HIST/GLC_GATE_UP/STAGE//15MIN/SDG/,2016-01-01 00:00,2.5,FEET
/HIST/GLC_GATEOP/ELEV//15MIN/SDG/,2016-01-01 00:00,10.0,
";

    const HYDRO: &str = "\
path,datetime,value,unit
/HIST/DGL/STAGE//15MIN/HYDRO/,2016-01-01 00:00,1.8,FEET
/HIST/MHO/STAGE//15MIN/HYDRO/,2016-01-01 00:00,1.9,FEET
/HIST/ROLD034/STAGE//15MIN/HYDRO/,2016-01-01 00:00,1.7,FEET
";

    #[test]
    fn test_assemble_from_text_splits_sources() {
        let scenario = assemble_from_text("base", SDG, HYDRO).unwrap();
        assert_eq!(scenario.name, "base");
        assert_eq!(scenario.stage.identifiers(), vec!["GLC_GATE_UP".to_string()]);
        assert_eq!(scenario.flow.identifiers(), vec!["GLC_FLOW_FISH".to_string()]);
        assert_eq!(scenario.gate_ops.identifiers(), vec!["GLC_GATEOP".to_string()]);
        // ROLD034 is not a compliance station
        assert_eq!(scenario.compliance.len(), 2);
    }

    #[test]
    fn test_assemble_from_text_requires_stage_rows() {
        let no_stage = "\
path,datetime,value,unit
/HIST/GLC_FLOW_FISH/DEVICE-FLOW//15MIN/SDG/,2016-01-01 00:00,120.0,CFS
";
        let err = assemble_from_text("base", no_stage, HYDRO).unwrap_err();
        assert!(matches!(err, Dsm2Error::MalformedSource { .. }));
        assert!(err.to_string().contains("stage"));
    }

    #[test]
    fn test_assemble_from_text_requires_flow_rows() {
        let no_flow = "\
path,datetime,value,unit
/HIST/GLC_GATE_UP/STAGE//15MIN/SDG/,2016-01-01 00:00,2.5,FEET
";
        let err = assemble_from_text("base", no_flow, HYDRO).unwrap_err();
        assert!(err.to_string().contains("flow"));
    }

    #[test]
    fn test_assemble_missing_file_is_source_unavailable() {
        let err = assemble(
            "base",
            Path::new("/nonexistent/base_sdg.csv"),
            Path::new("/nonexistent/base_hydro.csv"),
            Path::new("/nonexistent/base_echo.inp"),
        )
        .unwrap_err();
        assert!(matches!(err, Dsm2Error::SourceUnavailable { .. }));
    }

    // ───────────────────── Discovery ─────────────────────

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("output/{}", n))).collect()
    }

    #[test]
    fn test_pair_scenario_files_matches_by_first_token() {
        let files = paths(&[
            "base_hydro.csv",
            "base_sdg.csv",
            "base_echo.inp",
            "alt_hydro.csv",
            "alt_sdg.csv",
            "alt_echo.inp",
        ]);
        let scenarios = pair_scenario_files(Path::new("output"), files, None).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "alt");
        assert_eq!(scenarios[1].name, "base");
        assert_eq!(
            scenarios[1].gate_flow,
            PathBuf::from("output/base_sdg.csv")
        );
        assert_eq!(
            scenarios[1].compliance,
            PathBuf::from("output/base_hydro.csv")
        );
        assert_eq!(scenarios[1].echo, PathBuf::from("output/base_echo.inp"));
    }

    #[test]
    fn test_pair_scenario_files_applies_name_filter() {
        let files = paths(&[
            "base_hydro.csv",
            "base_sdg.csv",
            "base_echo.inp",
            "alt_hydro.csv",
            "alt_sdg.csv",
            "alt_echo.inp",
        ]);
        let scenarios = pair_scenario_files(Path::new("output"), files, Some("BASE")).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "base");
    }

    #[test]
    fn test_pair_scenario_files_count_mismatch() {
        let files = paths(&["base_hydro.csv", "base_sdg.csv", "alt_sdg.csv", "base_echo.inp"]);
        let err = pair_scenario_files(Path::new("output"), files, None).unwrap_err();
        assert!(matches!(err, Dsm2Error::UnmatchedScenarioFiles { .. }));
    }

    #[test]
    fn test_pair_scenario_files_missing_echo() {
        let files = paths(&["base_hydro.csv", "base_sdg.csv"]);
        let err = pair_scenario_files(Path::new("output"), files, None).unwrap_err();
        assert!(err.to_string().contains("echo"));
    }

    #[test]
    fn test_pair_ignores_unrelated_files() {
        let files = paths(&[
            "base_hydro.csv",
            "base_sdg.csv",
            "base_echo.inp",
            "notes.txt",
            "base_sdg.csv.bak",
        ]);
        let scenarios = pair_scenario_files(Path::new("output"), files, None).unwrap();
        assert_eq!(scenarios.len(), 1);
    }

    #[test]
    fn test_scenario_name_from_path() {
        assert_eq!(
            scenario_name_from_path(Path::new("output/FPV2Ma_sdg.csv")),
            "FPV2Ma"
        );
        assert_eq!(scenario_name_from_path(Path::new("plain.csv")), "plain");
    }
}

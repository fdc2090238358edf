//! Parser for DSM2 input echo files.
//!
//! An echo file replays every input table of a run as fixed-width text.
//! Only the `GATE_WEIR_DEVICE` section matters here: it carries the
//! physical settings of each gate device. The section layout is the
//! section name on its own line, one column-header line, whitespace
//! separated data rows, and a closing `END` line.
//!
//! ```text
//! GATE_WEIR_DEVICE
//! GATE_NAME DEVICE NDUPLICATE WIDTH ELEV HEIGHT CF_FROM_NODE CF_TO_NODE DEFAULT_OP
//! grantline_gate fish_passage 1 5.0 -6.0 10.0 0.8 0.8 gate_close
//! ...
//! END
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Dsm2Error, Result};
use crate::gates::Gate;

/// Name of the device rows describing fish passages.
pub const FISH_PASSAGE_DEVICE: &str = "fish_passage";

/// One row of the `GATE_WEIR_DEVICE` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GateWeirDevice {
    pub gate_name: String,
    pub device: String,
    pub nduplicate: i64,
    pub width: f64,
    pub elev: f64,
    pub height: f64,
    pub cf_from_node: f64,
    pub cf_to_node: f64,
    pub default_op: String,
}

/// Physical gate settings extracted from the echo file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSettings {
    pub width: f64,
    pub bottom_elevation: f64,
    pub c_from_node: f64,
    pub c_to_node: f64,
}

impl From<&GateWeirDevice> for GateSettings {
    fn from(row: &GateWeirDevice) -> Self {
        GateSettings {
            width: row.width,
            bottom_elevation: row.elev,
            c_from_node: row.cf_from_node,
            c_to_node: row.cf_to_node,
        }
    }
}

/// Parse the `GATE_WEIR_DEVICE` section out of echo-file text.
///
/// Returns every data row of the section; rows for other device kinds
/// are included so callers can filter as needed.
pub fn parse_echo(text: &str) -> Result<Vec<GateWeirDevice>> {
    let lines: Vec<&str> = text.lines().collect();

    let start = lines
        .iter()
        .position(|line| line.trim().eq_ignore_ascii_case("GATE_WEIR_DEVICE"))
        .ok_or_else(|| echo_err("GATE_WEIR_DEVICE section not found"))?;
    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.trim().eq_ignore_ascii_case("END"))
        .map(|(i, _)| i)
        .ok_or_else(|| echo_err("GATE_WEIR_DEVICE section has no END"))?;

    // First line after the section name is the column header.
    let data_rows = &lines[start + 2..end];

    let mut devices = Vec::new();
    for (offset, line) in data_rows.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 9 {
            return Err(echo_err(&format!(
                "GATE_WEIR_DEVICE row {} has {} fields, expected 9",
                offset + 1,
                tokens.len()
            )));
        }
        devices.push(GateWeirDevice {
            gate_name: tokens[0].to_string(),
            device: tokens[1].to_string(),
            nduplicate: parse_field(tokens[2], "NDUPLICATE")?,
            width: parse_field(tokens[3], "WIDTH")?,
            elev: parse_field(tokens[4], "ELEV")?,
            height: parse_field(tokens[5], "HEIGHT")?,
            cf_from_node: parse_field(tokens[6], "CF_FROM_NODE")?,
            cf_to_node: parse_field(tokens[7], "CF_TO_NODE")?,
            default_op: tokens[8..].join(" "),
        });
    }
    Ok(devices)
}

/// Extract per-gate fish-passage settings from parsed device rows.
///
/// Every gate in the registry must have exactly one `fish_passage` row;
/// a missing gate is an error because velocity reporting would silently
/// lose that gate otherwise.
pub fn gate_settings(devices: &[GateWeirDevice]) -> Result<BTreeMap<Gate, GateSettings>> {
    let mut settings = BTreeMap::new();
    for gate in Gate::ALL {
        let row = devices
            .iter()
            .filter(|d| d.device == FISH_PASSAGE_DEVICE)
            .find(|d| d.gate_name == gate.echo_name())
            .ok_or_else(|| {
                echo_err(&format!(
                    "no {} row for gate {}",
                    FISH_PASSAGE_DEVICE,
                    gate.echo_name()
                ))
            })?;
        settings.insert(gate, GateSettings::from(row));
    }
    Ok(settings)
}

/// Read an echo file and extract per-gate fish-passage settings.
pub fn read_echo(path: &Path) -> Result<BTreeMap<Gate, GateSettings>> {
    let text = std::fs::read_to_string(path).map_err(|source| Dsm2Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let devices = parse_echo(&text).map_err(|e| crate::error::with_path(e, path))?;
    let settings = gate_settings(&devices).map_err(|e| crate::error::with_path(e, path))?;
    log::info!(
        "echo: {} device rows, {} gate settings from {}",
        devices.len(),
        settings.len(),
        path.display()
    );
    Ok(settings)
}

fn echo_err(reason: &str) -> Dsm2Error {
    Dsm2Error::MalformedSource {
        path: Default::default(),
        reason: reason.to_string(),
    }
}

fn parse_field<T: std::str::FromStr>(token: &str, column: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| echo_err(&format!("bad {} value {:?}", column, token)))
}

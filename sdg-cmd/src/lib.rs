//! Command implementations for the SDG CLI.
//!
//! Provides subcommands for exporting DSM2 container files to
//! normalized CSV and for running the South Delta gate post-processing
//! pipeline over one scenario or a whole study directory.

use std::path::PathBuf;

use clap::Subcommand;
use sdg_dsm2::dates::TimeWindow;
use sdg_post::velocity::VELOCITY_THRESHOLD_FPS;

pub mod batch;
pub mod export;
pub mod process;

#[derive(Subcommand)]
pub enum Command {
    /// Export a DSM2 container file to normalized long-format CSV
    Export {
        /// Path to the exported container CSV
        file: PathBuf,

        /// Output path for the normalized CSV
        output: PathBuf,

        /// Comma separated list of sensor identifiers to keep (part B)
        #[arg(short = 'l', long)]
        location_filter: Option<String>,

        /// Comma separated list of parameters to keep (part C)
        #[arg(short = 'p', long)]
        parameter_filter: Option<String>,

        /// Inclusive `start,end` window; either side may be empty
        #[arg(short = 't', long)]
        datetime_filter: Option<String>,

        /// Also archive the exported rows into this SQLite database file
        #[arg(short = 'd', long)]
        database_file: Option<PathBuf>,

        /// Scenario name used when archiving (defaults to the file stem)
        #[arg(short = 's', long)]
        scenario: Option<String>,
    },

    /// Post-process one scenario from its exported files
    Process {
        /// Gate flow/stage/op container CSV (the `*sdg*` export)
        gate_flow: PathBuf,

        /// Compliance-station hydro container CSV (the `*hydro*` export)
        compliance: PathBuf,

        /// Hydro echo file carrying the gate device table
        echo: PathBuf,

        /// Scenario name (defaults to the first token of the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Inclusive `start,end` window; either side may be empty
        #[arg(short = 't', long)]
        datetime_filter: Option<String>,

        /// Velocity threshold separating the over/under bands, in ft/s
        #[arg(long, default_value_t = VELOCITY_THRESHOLD_FPS)]
        threshold: f64,

        /// Sampling interval of the source series, in minutes
        #[arg(long, default_value_t = 15.0)]
        interval: f64,

        /// Directory the report files are written into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Post-process every scenario found under a study directory
    Batch {
        /// Study directory; scenarios are discovered under `<DIR>/output`
        dir: PathBuf,

        /// Only process scenarios whose name contains this text
        #[arg(short = 'n', long)]
        name_filter: Option<String>,

        /// Inclusive `start,end` window; either side may be empty
        #[arg(short = 't', long)]
        datetime_filter: Option<String>,

        /// Velocity threshold separating the over/under bands, in ft/s
        #[arg(long, default_value_t = VELOCITY_THRESHOLD_FPS)]
        threshold: f64,

        /// Sampling interval of the source series, in minutes
        #[arg(long, default_value_t = 15.0)]
        interval: f64,

        /// Directory the report files are written into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Export {
            file,
            output,
            location_filter,
            parameter_filter,
            datetime_filter,
            database_file,
            scenario,
        } => export::run_export(
            &file,
            &output,
            location_filter.as_deref(),
            parameter_filter.as_deref(),
            datetime_filter.as_deref(),
            database_file.as_deref(),
            scenario.as_deref(),
        ),
        Command::Process {
            gate_flow,
            compliance,
            echo,
            name,
            datetime_filter,
            threshold,
            interval,
            output,
        } => process::run_process(
            &gate_flow,
            &compliance,
            &echo,
            name.as_deref(),
            datetime_filter.as_deref(),
            threshold,
            interval,
            &output,
        ),
        Command::Batch {
            dir,
            name_filter,
            datetime_filter,
            threshold,
            interval,
            output,
        } => batch::run_batch(
            &dir,
            name_filter.as_deref(),
            datetime_filter.as_deref(),
            threshold,
            interval,
            &output,
        ),
    }
}

/// Parse the optional `-t start,end` argument into a window.
pub(crate) fn parse_window(datetime_filter: Option<&str>) -> anyhow::Result<TimeWindow> {
    Ok(match datetime_filter {
        Some(text) => TimeWindow::parse(text)?,
        None => TimeWindow::unbounded(),
    })
}

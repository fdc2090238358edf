//! Delimited report writers for pipeline output.
//!
//! Every exported structure writes as CSV with a header row; the daily
//! summary additionally serializes to JSON for machine consumers. All
//! writers take any `io::Write` sink, so tests capture into buffers and
//! the CLI hands in files.

use std::io;

use sdg_dsm2::dates::{format_datetime, DATE_FORMAT};
use sdg_dsm2::record::TimeSample;

use crate::error::Result;
use crate::pipeline::DailySummary;
use crate::samples::MergedSample;
use crate::streaks::Streak;

/// Write a bare series with a `datetime,<value_column>` header.
pub fn write_series_csv<W: io::Write>(
    writer: W,
    samples: &[TimeSample],
    value_column: &str,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["datetime", value_column])?;
    for s in samples {
        wtr.write_record(&[format_datetime(&s.datetime), s.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a streak table.
pub fn write_streaks_csv<W: io::Write>(writer: W, streaks: &[Streak]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["label", "start", "end", "sample_count", "duration_hours"])?;
    for s in streaks {
        wtr.write_record(&[
            s.label.clone(),
            format_datetime(&s.start),
            format_datetime(&s.end),
            s.sample_count.to_string(),
            s.duration_hours.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write merged samples, one column per annotation.
pub fn write_merged_csv<W: io::Write>(writer: W, merged: &[MergedSample]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "datetime",
        "date",
        "iso_week",
        "gate",
        "scenario",
        "velocity",
        "velocity_category",
        "velocity_streak_id",
        "velocity_streak_start",
        "velocity_streak_end",
        "velocity_streak_count",
        "velocity_streak_hours",
        "gate_status",
        "gate_streak_id",
        "gate_streak_start",
        "gate_streak_end",
        "gate_streak_count",
        "gate_streak_hours",
        "time_unit_hours",
    ])?;
    for m in merged {
        wtr.write_record(&[
            format_datetime(&m.datetime),
            m.date.format(DATE_FORMAT).to_string(),
            m.iso_week.to_string(),
            m.gate.clone(),
            m.scenario.clone(),
            m.velocity.to_string(),
            m.velocity_category.clone(),
            m.velocity_streak_id.to_string(),
            format_datetime(&m.velocity_streak_start),
            format_datetime(&m.velocity_streak_end),
            m.velocity_streak_count.to_string(),
            m.velocity_streak_hours.to_string(),
            m.gate_status.clone(),
            m.gate_streak_id.to_string(),
            format_datetime(&m.gate_streak_start),
            format_datetime(&m.gate_streak_end),
            m.gate_streak_count.to_string(),
            m.gate_streak_hours.to_string(),
            m.time_unit_hours.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the four daily statistics as long-format rows.
pub fn write_daily_csv<W: io::Write>(writer: W, daily: &DailySummary) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["series", "statistic", "category", "average_hours"])?;
    let sections = [
        ("velocity", "daily_total_duration", &daily.velocity_total_duration),
        ("velocity", "daily_streak_length", &daily.velocity_streak_length),
        ("gate", "daily_total_duration", &daily.gate_total_duration),
        ("gate", "daily_streak_length", &daily.gate_streak_length),
    ];
    for (series, statistic, map) in sections {
        for (category, value) in map {
            wtr.write_record(&[
                series.to_string(),
                statistic.to_string(),
                category.clone(),
                value.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed JSON rendition of the daily summary.
pub fn write_daily_json<W: io::Write>(writer: W, daily: &DailySummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, daily)?;
    Ok(())
}

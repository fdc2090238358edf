//! Per-timestamp merge of velocity and gate-status annotations.
//!
//! After streak detection runs once per side, the velocity series and
//! the gate-operation series are joined on exact timestamp. Each merged
//! row carries the sample's category and enclosing streak from both
//! sides, plus the calendar keys the aggregator buckets by. Timestamps
//! present on only one side are dropped by the join.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use itertools::{EitherOrBoth, Itertools};
use sdg_dsm2::gates::Gate;
use serde::Serialize;

use crate::streaks::{sample_streak_ids, LabeledSample, Streak};

/// One timestamp both series cover, with both annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSample {
    pub datetime: NaiveDateTime,
    pub date: NaiveDate,
    pub iso_week: u32,
    /// Three-letter gate code.
    pub gate: String,
    pub scenario: String,
    pub velocity: f64,
    pub velocity_category: String,
    pub velocity_streak_id: usize,
    pub velocity_streak_start: NaiveDateTime,
    pub velocity_streak_end: NaiveDateTime,
    pub velocity_streak_count: usize,
    pub velocity_streak_hours: f64,
    pub gate_status: String,
    pub gate_streak_id: usize,
    pub gate_streak_start: NaiveDateTime,
    pub gate_streak_end: NaiveDateTime,
    pub gate_streak_count: usize,
    pub gate_streak_hours: f64,
    /// Duration one sample stands for, in hours.
    pub time_unit_hours: f64,
}

/// Inner-join the two annotated series on timestamp.
///
/// `velocity_streaks` and `gate_streaks` must be the detector output
/// for `velocity` and `gate_ops` respectively; the streak annotations
/// on a merged row describe the full streak even when the other side's
/// gaps keep some of its samples out of the merge.
pub fn merge_samples(
    scenario: &str,
    gate: Gate,
    velocity: &[LabeledSample],
    velocity_streaks: &[Streak],
    gate_ops: &[LabeledSample],
    gate_streaks: &[Streak],
    time_unit_hours: f64,
) -> Vec<MergedSample> {
    let vel_side = velocity.iter().zip(sample_streak_ids(velocity_streaks));
    let gate_side = gate_ops.iter().zip(sample_streak_ids(gate_streaks));

    let mut merged = Vec::new();
    for pair in vel_side.merge_join_by(gate_side, |(v, _), (g, _)| v.datetime.cmp(&g.datetime)) {
        let EitherOrBoth::Both((v, vid), (g, gid)) = pair else {
            continue;
        };
        let vel_streak = &velocity_streaks[vid];
        let gate_streak = &gate_streaks[gid];
        merged.push(MergedSample {
            datetime: v.datetime,
            date: v.datetime.date(),
            iso_week: v.datetime.iso_week().week(),
            gate: gate.code().to_string(),
            scenario: scenario.to_string(),
            velocity: v.value,
            velocity_category: v.label.clone(),
            velocity_streak_id: vid,
            velocity_streak_start: vel_streak.start,
            velocity_streak_end: vel_streak.end,
            velocity_streak_count: vel_streak.sample_count,
            velocity_streak_hours: vel_streak.duration_hours,
            gate_status: g.label.clone(),
            gate_streak_id: gid,
            gate_streak_start: gate_streak.start,
            gate_streak_end: gate_streak.end,
            gate_streak_count: gate_streak.sample_count,
            gate_streak_hours: gate_streak.duration_hours,
            time_unit_hours,
        });
    }
    if merged.is_empty() && !velocity.is_empty() {
        log::warn!(
            "gate {}: velocity and gate-op series share no timestamps",
            gate
        );
    }
    merged
}

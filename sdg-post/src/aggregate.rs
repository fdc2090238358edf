//! Daily aggregate statistics over categorized samples.
//!
//! Both reductions bucket samples by calendar date and category label,
//! then average across days. They are pure and order-independent: any
//! permutation of the same sample multiset produces the same maps.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::samples::MergedSample;

/// One sample reduced to what the daily statistics need.
///
/// Merged rows project to this twice, once per side (velocity band,
/// gate status).
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedSample {
    pub date: NaiveDate,
    pub category: String,
    /// Identifier of the streak the sample belongs to.
    pub streak_id: usize,
    pub time_unit_hours: f64,
}

/// Velocity-side view of merged rows.
pub fn velocity_samples(merged: &[MergedSample]) -> Vec<CategorizedSample> {
    merged
        .iter()
        .map(|m| CategorizedSample {
            date: m.date,
            category: m.velocity_category.clone(),
            streak_id: m.velocity_streak_id,
            time_unit_hours: m.time_unit_hours,
        })
        .collect()
}

/// Gate-side view of merged rows.
pub fn gate_samples(merged: &[MergedSample]) -> Vec<CategorizedSample> {
    merged
        .iter()
        .map(|m| CategorizedSample {
            date: m.date,
            category: m.gate_status.clone(),
            streak_id: m.gate_streak_id,
            time_unit_hours: m.time_unit_hours,
        })
        .collect()
}

/// Average per-day total time in each category, in hours.
///
/// Every calendar date present anywhere in the input counts in the
/// denominator for every category; a date where a category never occurs
/// contributes zero to that category's total.
pub fn daily_average_total_duration(samples: &[CategorizedSample]) -> BTreeMap<String, f64> {
    let dates: BTreeSet<NaiveDate> = samples.iter().map(|s| s.date).collect();
    if dates.is_empty() {
        return BTreeMap::new();
    }

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for s in samples {
        *totals.entry(s.category.clone()).or_insert(0.0) += s.time_unit_hours;
    }

    let days = dates.len() as f64;
    totals
        .into_iter()
        .map(|(category, total)| (category, total / days))
        .collect()
}

/// Average per-day streak length in each category, in hours.
///
/// Per date and category: total time divided by the number of distinct
/// streaks touching that date. The result is the mean of those per-day
/// ratios across the category's dates, so days weigh equally regardless
/// of their sample counts.
pub fn daily_average_streak_length(samples: &[CategorizedSample]) -> BTreeMap<String, f64> {
    // (date, category) -> (total hours, distinct streak ids)
    let mut daily: BTreeMap<(NaiveDate, &str), (f64, BTreeSet<usize>)> = BTreeMap::new();
    for s in samples {
        let entry = daily
            .entry((s.date, s.category.as_str()))
            .or_insert_with(|| (0.0, BTreeSet::new()));
        entry.0 += s.time_unit_hours;
        entry.1.insert(s.streak_id);
    }

    let mut ratios: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for ((_, category), (total, streaks)) in &daily {
        let entry = ratios.entry(category).or_insert((0.0, 0));
        entry.0 += total / streaks.len() as f64;
        entry.1 += 1;
    }

    ratios
        .into_iter()
        .map(|(category, (ratio_sum, day_count))| {
            (category.to_string(), ratio_sum / day_count as f64)
        })
        .collect()
}

//! Run-length streak detection over labeled time series.
//!
//! A streak is a maximal run of consecutive samples sharing one
//! category label. Labeling happens first (velocity bands, gate
//! open/closed), then a single linear pass folds the labeled series
//! into streaks. Streak duration always derives from the sample count
//! and the sampling interval, never from `end - start`: the last sample
//! of a streak stands for one full interval past its own timestamp.
//!
//! Missing samples do not split a streak. Two same-label samples with a
//! gap between their timestamps stay in one streak whose duration
//! counts only the samples actually present; gap detection is a known
//! limitation of this pass, not something it attempts.

use chrono::NaiveDateTime;
use sdg_dsm2::record::TimeSample;
use serde::Serialize;

/// Raw gate-operation code at or above which the gate reads as closed.
///
/// The polarity follows the DSM2 operating-rule coding of the GATEOP
/// loggers, where high codes mean the radial gates are down. It reads
/// inverted next to the intuitive open/closed sense; keep it as the
/// model writes it.
pub const GATE_CLOSED_MIN_CODE: f64 = 10.0;

/// Gate status label for one raw gate-operation sample.
pub fn gate_status_label(value: f64) -> &'static str {
    if value >= GATE_CLOSED_MIN_CODE {
        "Closed"
    } else {
        "Open"
    }
}

/// One sample with its category label attached.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub datetime: NaiveDateTime,
    pub value: f64,
    pub label: String,
}

/// Attach labels to a series through a pure classifier.
pub fn label_samples<F>(samples: &[TimeSample], classify: F) -> Vec<LabeledSample>
where
    F: Fn(f64) -> String,
{
    samples
        .iter()
        .map(|s| LabeledSample {
            datetime: s.datetime,
            value: s.value,
            label: classify(s.value),
        })
        .collect()
}

/// A maximal run of consecutive same-label samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Streak {
    pub label: String,
    /// Timestamp of the first member sample.
    pub start: NaiveDateTime,
    /// Timestamp of the last member sample.
    pub end: NaiveDateTime,
    pub sample_count: usize,
    /// `sample_count * sampling_interval / 60`, in hours.
    pub duration_hours: f64,
}

/// Fold a labeled series into streaks in one linear pass.
///
/// A new streak opens at the first sample and on every label change.
/// The result partitions the input exactly: streaks are contiguous,
/// non-overlapping, and their sample counts sum to the input length.
pub fn detect_streaks(samples: &[LabeledSample], sampling_interval_minutes: f64) -> Vec<Streak> {
    let mut streaks: Vec<Streak> = Vec::new();
    for sample in samples {
        match streaks.last_mut() {
            Some(current) if current.label == sample.label => {
                current.end = sample.datetime;
                current.sample_count += 1;
            }
            _ => streaks.push(Streak {
                label: sample.label.clone(),
                start: sample.datetime,
                end: sample.datetime,
                sample_count: 1,
                duration_hours: 0.0,
            }),
        }
    }
    for streak in &mut streaks {
        streak.duration_hours = streak.sample_count as f64 * sampling_interval_minutes / 60.0;
    }
    streaks
}

/// Streak index for every sample of the detected series, in order.
///
/// The returned vector has one entry per input sample (streak counts
/// sum to the series length), so zipping it with the labeled samples
/// annotates each with its enclosing streak.
pub fn sample_streak_ids(streaks: &[Streak]) -> Vec<usize> {
    let mut ids = Vec::with_capacity(streaks.iter().map(|s| s.sample_count).sum());
    for (id, streak) in streaks.iter().enumerate() {
        ids.extend(std::iter::repeat(id).take(streak.sample_count));
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_dsm2::dates::parse_datetime;

    fn labeled(values: &[(&str, f64, &str)]) -> Vec<LabeledSample> {
        values
            .iter()
            .map(|(dt, v, label)| LabeledSample {
                datetime: parse_datetime(dt).unwrap(),
                value: *v,
                label: label.to_string(),
            })
            .collect()
    }

    /// Regular 15-minute series starting at midnight with the given labels.
    fn quarter_hour_series(labels: &[&str]) -> Vec<LabeledSample> {
        let start = parse_datetime("2016-01-01 00:00").unwrap();
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| LabeledSample {
                datetime: start + chrono::Duration::minutes(15 * i as i64),
                value: 0.0,
                label: label.to_string(),
            })
            .collect()
    }

    fn reconstruct(streaks: &[Streak], interval_minutes: i64) -> Vec<LabeledSample> {
        let mut samples = Vec::new();
        for streak in streaks {
            for k in 0..streak.sample_count {
                samples.push(LabeledSample {
                    datetime: streak.start + chrono::Duration::minutes(interval_minutes * k as i64),
                    value: 0.0,
                    label: streak.label.clone(),
                });
            }
        }
        samples
    }

    // ───────────────────── detect_streaks ─────────────────────

    #[test]
    fn open_closed_fifteen_minute_example() {
        let series = quarter_hour_series(&["Open", "Open", "Closed", "Closed", "Closed"]);
        let streaks = detect_streaks(&series, 15.0);
        assert_eq!(streaks.len(), 2);

        assert_eq!(streaks[0].label, "Open");
        assert_eq!(streaks[0].start, series[0].datetime);
        assert_eq!(streaks[0].end, series[1].datetime);
        assert_eq!(streaks[0].sample_count, 2);
        assert_eq!(streaks[0].duration_hours, 0.5);

        assert_eq!(streaks[1].label, "Closed");
        assert_eq!(streaks[1].start, series[2].datetime);
        assert_eq!(streaks[1].end, series[4].datetime);
        assert_eq!(streaks[1].sample_count, 3);
        assert_eq!(streaks[1].duration_hours, 0.75);
    }

    #[test]
    fn streaks_partition_the_series_exactly() {
        let series = quarter_hour_series(&["A", "A", "B", "A", "A", "A", "C", "C"]);
        let streaks = detect_streaks(&series, 15.0);

        let total: usize = streaks.iter().map(|s| s.sample_count).sum();
        assert_eq!(total, series.len());

        // expanding each streak's label by its count reproduces the input order
        let expanded: Vec<&str> = streaks
            .iter()
            .flat_map(|s| std::iter::repeat(s.label.as_str()).take(s.sample_count))
            .collect();
        let original: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(expanded, original);

        // contiguous and non-overlapping
        for pair in streaks.windows(2) {
            assert!(pair[0].end < pair[1].start);
            assert_ne!(pair[0].label, pair[1].label);
        }
    }

    #[test]
    fn count_matches_index_span_and_duration_formula() {
        let series = quarter_hour_series(&["A", "A", "A", "B", "B", "A"]);
        let streaks = detect_streaks(&series, 15.0);

        let mut start_index = 0;
        for streak in &streaks {
            let end_index = start_index + streak.sample_count - 1;
            assert_eq!(series[start_index].datetime, streak.start);
            assert_eq!(series[end_index].datetime, streak.end);
            assert_eq!(streak.sample_count, end_index - start_index + 1);
            assert_eq!(
                streak.duration_hours,
                streak.sample_count as f64 * 15.0 / 60.0
            );
            start_index = end_index + 1;
        }
        assert_eq!(start_index, series.len());
    }

    #[test]
    fn redetection_of_reconstructed_series_is_identical() {
        let series = quarter_hour_series(&["Open", "Closed", "Closed", "Open", "Open", "Open"]);
        let streaks = detect_streaks(&series, 15.0);
        let rebuilt = reconstruct(&streaks, 15);
        assert_eq!(detect_streaks(&rebuilt, 15.0), streaks);
    }

    #[test]
    fn single_sample_yields_one_streak() {
        let series = labeled(&[("2016-01-01 00:00", 1.0, "Open")]);
        let streaks = detect_streaks(&series, 15.0);
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].sample_count, 1);
        assert_eq!(streaks[0].start, streaks[0].end);
        assert_eq!(streaks[0].duration_hours, 0.25);
    }

    #[test]
    fn empty_series_yields_no_streaks() {
        assert!(detect_streaks(&[], 15.0).is_empty());
    }

    #[test]
    fn alternating_labels_never_merge() {
        let series = quarter_hour_series(&["A", "B", "A", "B"]);
        let streaks = detect_streaks(&series, 15.0);
        assert_eq!(streaks.len(), 4);
        assert!(streaks.iter().all(|s| s.sample_count == 1));
    }

    #[test]
    fn timestamp_gaps_do_not_split_streaks() {
        let series = labeled(&[
            ("2016-01-01 00:00", 1.0, "Open"),
            ("2016-01-01 00:15", 1.0, "Open"),
            // two hours of missing samples
            ("2016-01-01 02:15", 1.0, "Open"),
        ]);
        let streaks = detect_streaks(&series, 15.0);
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].sample_count, 3);
        // duration counts present samples only, not the gap span
        assert_eq!(streaks[0].duration_hours, 0.75);
        assert_eq!(streaks[0].end, series[2].datetime);
    }

    #[test]
    fn interval_parameter_scales_duration() {
        let series = quarter_hour_series(&["A", "A"]);
        assert_eq!(detect_streaks(&series, 60.0)[0].duration_hours, 2.0);
        assert_eq!(detect_streaks(&series, 15.0)[0].duration_hours, 0.5);
    }

    // ───────────────────── labeling ─────────────────────

    #[test]
    fn gate_code_polarity_high_means_closed() {
        assert_eq!(gate_status_label(10.0), "Closed");
        assert_eq!(gate_status_label(12.5), "Closed");
        assert_eq!(gate_status_label(9.99), "Open");
        assert_eq!(gate_status_label(0.0), "Open");
        assert_eq!(gate_status_label(-2.0), "Open");
    }

    #[test]
    fn label_samples_applies_classifier() {
        let samples = vec![
            TimeSample {
                datetime: parse_datetime("2016-01-01 00:00").unwrap(),
                value: 10.0,
            },
            TimeSample {
                datetime: parse_datetime("2016-01-01 00:15").unwrap(),
                value: 3.0,
            },
        ];
        let labeled = label_samples(&samples, |v| gate_status_label(v).to_string());
        assert_eq!(labeled[0].label, "Closed");
        assert_eq!(labeled[1].label, "Open");
        assert_eq!(labeled[1].value, 3.0);
    }

    #[test]
    fn sample_streak_ids_expand_by_count() {
        let series = quarter_hour_series(&["A", "A", "B", "C", "C", "C"]);
        let streaks = detect_streaks(&series, 15.0);
        assert_eq!(sample_streak_ids(&streaks), vec![0, 0, 1, 2, 2, 2]);
    }
}

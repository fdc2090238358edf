//! Channel velocity from flow and stage.
//!
//! Velocity through a gate's fish passage is flow divided by the wetted
//! cross-section, where the cross-section is the opening width times the
//! water depth above the gate bottom. Stage at or below the bottom
//! elevation makes the cross-section zero or negative; the IEEE division
//! result (infinite or NaN) is carried through unchanged and surfaces
//! downstream as the `Undefined` velocity band.

use itertools::{EitherOrBoth, Itertools};
use sdg_dsm2::record::TimeSample;

use crate::error::{PostError, Result};

/// Velocity threshold separating the over/under bands, in ft/s.
pub const VELOCITY_THRESHOLD_FPS: f64 = 8.0;

/// Category of one velocity sample relative to a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityBand {
    Over,
    Under,
    /// Non-finite velocity from a zero or negative cross-section.
    Undefined,
}

impl VelocityBand {
    /// Classify one velocity sample. Non-finite values land in
    /// [`VelocityBand::Undefined`] rather than being dropped, so streaks
    /// still cover every sample of the series.
    pub fn classify(velocity: f64, threshold: f64) -> VelocityBand {
        if !velocity.is_finite() {
            VelocityBand::Undefined
        } else if velocity >= threshold {
            VelocityBand::Over
        } else {
            VelocityBand::Under
        }
    }

    /// Rendered category label, e.g. `Over 8ft/s`.
    pub fn label(self, threshold: f64) -> String {
        match self {
            VelocityBand::Over => format!("Over {}ft/s", threshold),
            VelocityBand::Under => format!("Under {}ft/s", threshold),
            VelocityBand::Undefined => "Undefined".to_string(),
        }
    }
}

/// Inner-join two ordered series on timestamp.
///
/// Samples present on only one side are dropped. Inputs must be in
/// ascending datetime order (table extraction guarantees this); outputs
/// are equal-length series over the shared timestamps.
pub fn align_series(a: &[TimeSample], b: &[TimeSample]) -> (Vec<TimeSample>, Vec<TimeSample>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for pair in a
        .iter()
        .merge_join_by(b.iter(), |x, y| x.datetime.cmp(&y.datetime))
    {
        if let EitherOrBoth::Both(x, y) = pair {
            left.push(*x);
            right.push(*y);
        }
    }
    (left, right)
}

/// Compute velocity samples from aligned flow and stage series.
///
/// `velocity[t] = flow[t] / ((stage[t] - bottom_elevation) * width)`.
/// The inputs must already share one timestamp index; call
/// [`align_series`] first when they might not. A zero cross-section
/// produces an infinite or NaN sample, never an error and never zero.
pub fn compute_velocity(
    flow: &[TimeSample],
    stage: &[TimeSample],
    bottom_elevation: f64,
    width: f64,
) -> Result<Vec<TimeSample>> {
    if flow.len() != stage.len() {
        return Err(PostError::SeriesMisaligned {
            reason: format!("{} flow samples vs {} stage samples", flow.len(), stage.len()),
        });
    }
    flow.iter()
        .zip(stage)
        .map(|(f, s)| {
            if f.datetime != s.datetime {
                return Err(PostError::SeriesMisaligned {
                    reason: format!("flow at {} paired with stage at {}", f.datetime, s.datetime),
                });
            }
            let cross_section = (s.value - bottom_elevation) * width;
            Ok(TimeSample {
                datetime: f.datetime,
                value: f.value / cross_section,
            })
        })
        .collect()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Baseline pace from activity history.

use crate::error::DegenerateInputError;
use crate::models::{Activity, PaceEstimate, PaceSource};

/// Pace assumed when the runner has no usable history (6:00 min/km).
pub const DEFAULT_PACE_MIN_PER_KM: f64 = 6.0;

/// Average pace over all runs and trail runs in `activities`.
///
/// Pace is total moving time over total distance, so longer runs weigh
/// more than short ones. With no eligible runs the default pace is
/// returned and flagged as a fallback.
pub fn estimate_baseline_pace(activities: &[Activity]) -> Result<PaceEstimate, DegenerateInputError> {
    let runs: Vec<&Activity> = activities.iter().filter(|a| a.kind.is_running()).collect();

    if runs.is_empty() {
        return Ok(PaceEstimate {
            min_per_km: DEFAULT_PACE_MIN_PER_KM,
            source: PaceSource::NoHistoryFallback,
        });
    }

    if let Some(bad) = runs.iter().find(|a| {
        !a.distance_meters.is_finite()
            || !a.moving_time_seconds.is_finite()
            || a.distance_meters < 0.0
            || a.moving_time_seconds < 0.0
    }) {
        return Err(DegenerateInputError(format!(
            "activity has invalid distance {} m or moving time {} s",
            bad.distance_meters, bad.moving_time_seconds
        )));
    }

    let total_km: f64 = runs.iter().map(|a| a.distance_meters).sum::<f64>() / 1000.0;
    let total_min: f64 = runs.iter().map(|a| a.moving_time_seconds).sum::<f64>() / 60.0;

    if total_km <= 0.0 {
        return Err(DegenerateInputError(format!(
            "{} runs found but their total distance is zero",
            runs.len()
        )));
    }

    let pace = total_min / total_km;
    if pace <= 0.0 {
        return Err(DegenerateInputError(
            "runs have zero total moving time".to_string(),
        ));
    }

    Ok(PaceEstimate {
        min_per_km: pace,
        source: PaceSource::History { runs: runs.len() },
    })
}

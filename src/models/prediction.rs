// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Prediction engine outputs.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How the baseline pace was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaceSource {
    /// Averaged over this many eligible runs.
    History { runs: usize },
    /// No eligible runs; the fixed default pace was used.
    NoHistoryFallback,
}

/// Baseline pace in minutes per kilometer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PaceEstimate {
    pub min_per_km: f64,
    pub source: PaceSource,
}

impl PaceEstimate {
    pub fn is_fallback(&self) -> bool {
        self.source == PaceSource::NoHistoryFallback
    }
}

/// Final race time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictionResult {
    pub baseline_pace_min_per_km: f64,
    pub flat_equivalent_km: f64,
    pub ideal_time_min: f64,
    pub weather_adjusted_time_min: f64,
    pub weather_impact_pct: f64,
}

/// Stacked-chart decomposition of the final time, in minutes.
///
/// `elevation_surcharge_min` covers elevation and terrain together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimeBreakdown {
    pub flat_time_min: f64,
    pub elevation_surcharge_min: f64,
    pub weather_surcharge_min: f64,
}

impl TimeBreakdown {
    pub fn total_min(&self) -> f64 {
        self.flat_time_min + self.elevation_surcharge_min + self.weather_surcharge_min
    }
}

/// A prediction plus its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Prediction {
    pub result: PredictionResult,
    pub breakdown: TimeBreakdown,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weather snapshot and its effect on race time.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Current conditions at the race location.
///
/// `condition_code` follows the WMO weather interpretation codes used by
/// Open-Meteo; codes above 50 are drizzle, rain, snow or worse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeatherObservation {
    pub temperature_celsius: f64,
    pub condition_code: u32,
}

impl WeatherObservation {
    /// Neutral conditions used when the weather provider cannot be reached.
    pub const NEUTRAL: WeatherObservation = WeatherObservation {
        temperature_celsius: 20.0,
        condition_code: 0,
    };
}

/// Where a weather impact value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    Live,
    Cached,
    Fallback,
}

/// Weather multiplier together with the observation it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeatherImpact {
    /// Always >= 1.0
    pub multiplier: f64,
    pub observation: WeatherObservation,
    pub source: WeatherSource,
}

impl WeatherImpact {
    /// The neutral fallback: no penalty, 20 °C, clear sky.
    pub fn fallback() -> Self {
        Self {
            multiplier: 1.0,
            observation: WeatherObservation::NEUTRAL,
            source: WeatherSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == WeatherSource::Fallback
    }
}

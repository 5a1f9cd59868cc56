// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Course profile and the user-facing prediction form.

use crate::error::DegenerateInputError;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Ground technicality. A closed set: no values between the three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum TerrainFactor {
    Easy,
    Moderate,
    Technical,
}

impl TerrainFactor {
    pub const ALL: [TerrainFactor; 3] = [
        TerrainFactor::Easy,
        TerrainFactor::Moderate,
        TerrainFactor::Technical,
    ];

    /// Time multiplier applied to the flat-equivalent distance.
    pub fn multiplier(self) -> f64 {
        match self {
            TerrainFactor::Easy => 1.0,
            TerrainFactor::Moderate => 1.1,
            TerrainFactor::Technical => 1.25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TerrainFactor::Easy => "Easy",
            TerrainFactor::Moderate => "Moderate",
            TerrainFactor::Technical => "Technical",
        }
    }
}

impl TryFrom<f64> for TerrainFactor {
    type Error = DegenerateInputError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        TerrainFactor::ALL
            .into_iter()
            .find(|t| t.multiplier() == value)
            .ok_or_else(|| {
                DegenerateInputError(format!(
                    "terrain factor must be one of 1.0, 1.1 or 1.25 (got {value})"
                ))
            })
    }
}

/// Longest course accepted, in kilometers.
pub const MAX_DISTANCE_KM: f64 = 1_000.0;

/// Largest total climb accepted, in meters.
pub const MAX_ELEVATION_GAIN_M: f64 = 100_000.0;

/// A validated race course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseProfile {
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub terrain: TerrainFactor,
}

impl CourseProfile {
    /// Build a course. Distance must be in (0, 1000] km and elevation gain
    /// in [0, 100000] m, which keeps every derived time finite.
    pub fn new(
        distance_km: f64,
        elevation_gain_m: f64,
        terrain: TerrainFactor,
    ) -> Result<Self, DegenerateInputError> {
        if !distance_km.is_finite() || distance_km <= 0.0 || distance_km > MAX_DISTANCE_KM {
            return Err(DegenerateInputError(format!(
                "distance must be greater than 0 and at most {MAX_DISTANCE_KM} km (got {distance_km})"
            )));
        }
        if !elevation_gain_m.is_finite()
            || elevation_gain_m < 0.0
            || elevation_gain_m > MAX_ELEVATION_GAIN_M
        {
            return Err(DegenerateInputError(format!(
                "elevation gain must be between 0 and {MAX_ELEVATION_GAIN_M} m (got {elevation_gain_m})"
            )));
        }

        Ok(Self {
            distance_km,
            elevation_gain_m,
            terrain,
        })
    }

    /// Naismith: every 100 m of climbing counts as one extra flat kilometer.
    pub fn flat_equivalent_km(&self) -> f64 {
        self.distance_km + self.elevation_gain_m / 100.0
    }
}

/// Race location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw form input shared by the HTML page and the JSON API.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictionForm {
    #[serde(default = "default_distance_km")]
    #[validate(range(
        exclusive_min = 0.0,
        max = MAX_DISTANCE_KM,
        message = "distance_km must be greater than 0 and at most 1000"
    ))]
    pub distance_km: f64,
    #[serde(default = "default_elevation_gain_m")]
    #[validate(range(
        min = 0.0,
        max = MAX_ELEVATION_GAIN_M,
        message = "elevation_gain_m must be between 0 and 100000"
    ))]
    pub elevation_gain_m: f64,
    #[serde(default = "default_terrain")]
    pub terrain: f64,
    #[serde(default = "default_latitude")]
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]"))]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be within [-180, 180]"
    ))]
    pub longitude: f64,
}

fn default_distance_km() -> f64 {
    25.0
}
fn default_elevation_gain_m() -> f64 {
    1200.0
}
fn default_terrain() -> f64 {
    1.0
}
fn default_latitude() -> f64 {
    45.92
}
fn default_longitude() -> f64 {
    6.86
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self {
            distance_km: default_distance_km(),
            elevation_gain_m: default_elevation_gain_m(),
            terrain: default_terrain(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl PredictionForm {
    /// Convert the form into a course and a location.
    ///
    /// Range checks come from `validate()`; NaN slips through range
    /// comparisons, so finiteness is checked here as well.
    pub fn into_course(self) -> Result<(CourseProfile, Coordinates), DegenerateInputError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(DegenerateInputError(
                "coordinates must be finite numbers".to_string(),
            ));
        }

        let terrain = TerrainFactor::try_from(self.terrain)?;
        let course = CourseProfile::new(self.distance_km, self.elevation_gain_m, terrain)?;

        Ok((
            course,
            Coordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            },
        ))
    }
}

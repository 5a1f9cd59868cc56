// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the prediction engine.

pub mod activity;
pub mod course;
pub mod prediction;
pub mod weather;

pub use activity::{Activity, ActivityType};
pub use course::{Coordinates, CourseProfile, PredictionForm, TerrainFactor};
pub use prediction::{PaceEstimate, PaceSource, Prediction, PredictionResult, TimeBreakdown};
pub use weather::{WeatherImpact, WeatherObservation, WeatherSource};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Race time calculator.

use crate::models::{CourseProfile, Prediction, PredictionResult, TimeBreakdown};

/// Predict the finishing time for `course`.
///
/// ideal = flat-equivalent km × pace × terrain, then scaled by the weather
/// multiplier. The breakdown splits the result into flat time, the combined
/// elevation+terrain surcharge, and the weather surcharge.
pub fn predict(course: &CourseProfile, pace_min_per_km: f64, weather_multiplier: f64) -> Prediction {
    let flat_equivalent_km = course.flat_equivalent_km();
    let ideal_time_min = flat_equivalent_km * pace_min_per_km * course.terrain.multiplier();
    let weather_adjusted_time_min = ideal_time_min * weather_multiplier;

    let flat_time_min = course.distance_km * pace_min_per_km;

    Prediction {
        result: PredictionResult {
            baseline_pace_min_per_km: pace_min_per_km,
            flat_equivalent_km,
            ideal_time_min,
            weather_adjusted_time_min,
            weather_impact_pct: (weather_multiplier - 1.0) * 100.0,
        },
        breakdown: TimeBreakdown {
            flat_time_min,
            elevation_surcharge_min: ideal_time_min - flat_time_min,
            weather_surcharge_min: weather_adjusted_time_min - ideal_time_min,
        },
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One full prediction: history, weather, arithmetic, user notices.

use crate::middleware::session::SessionContext;
use crate::models::{
    Coordinates, CourseProfile, PaceEstimate, PaceSource, Prediction, WeatherImpact,
};
use crate::services::pace::{estimate_baseline_pace, DEFAULT_PACE_MIN_PER_KM};
use crate::services::prediction::predict;
use crate::services::strava::{History, HistoryStatus};
use crate::AppState;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// Informational message shown next to the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Everything the presentation layer needs for one evaluation.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Evaluation {
    pub course: CourseProfile,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub location: Coordinates,
    pub pace: PaceEstimate,
    pub weather: WeatherImpact,
    #[serde(flatten)]
    pub prediction: Prediction,
    pub notices: Vec<Notice>,
}

/// Run a prediction for `course` at `location` on behalf of `session`.
///
/// Never fails: upstream problems degrade to default pace and neutral
/// weather, each with a notice.
pub async fn evaluate(
    state: &AppState,
    session: &SessionContext,
    course: CourseProfile,
    location: Coordinates,
) -> Evaluation {
    let (history, weather) = tokio::join!(
        state.strava_client.history(session.access_token()),
        state.weather_service.current_impact(location),
    );

    let mut notices = Vec::new();
    let pace = resolve_pace(&history, &mut notices);

    if weather.is_fallback() {
        notices.push(Notice::new(
            NoticeLevel::Warning,
            "Weather unavailable: assuming neutral conditions (20°C, dry).",
        ));
    }

    let prediction = predict(&course, pace.min_per_km, weather.multiplier);

    tracing::info!(
        distance_km = course.distance_km,
        elevation_gain_m = course.elevation_gain_m,
        terrain = course.terrain.multiplier(),
        pace = pace.min_per_km,
        weather_multiplier = weather.multiplier,
        predicted_min = prediction.result.weather_adjusted_time_min,
        "Prediction computed"
    );

    Evaluation {
        course,
        location,
        pace,
        weather,
        prediction,
        notices,
    }
}

/// Baseline pace from history, with the matching notice.
fn resolve_pace(history: &History, notices: &mut Vec<Notice>) -> PaceEstimate {
    let default_pace = PaceEstimate {
        min_per_km: DEFAULT_PACE_MIN_PER_KM,
        source: PaceSource::NoHistoryFallback,
    };

    match history.status {
        HistoryStatus::NotConnected => {
            notices.push(Notice::new(
                NoticeLevel::Info,
                "Connect your Strava account to personalise the estimate. Using default pace (6:00 min/km).",
            ));
            return default_pace;
        }
        HistoryStatus::Unavailable => {
            notices.push(Notice::new(
                NoticeLevel::Warning,
                "Strava is unavailable right now. Using default pace (6:00 min/km).",
            ));
            return default_pace;
        }
        HistoryStatus::Synced => {}
    }

    match estimate_baseline_pace(&history.activities) {
        Ok(pace) if pace.is_fallback() => {
            notices.push(Notice::new(
                NoticeLevel::Warning,
                "No runs found in your recent activities. Using default pace (6:00 min/km).",
            ));
            pace
        }
        Ok(pace) => {
            notices.push(Notice::new(
                NoticeLevel::Success,
                format!(
                    "Strava data synced! Baseline pace detected: {:.2} min/km",
                    pace.min_per_km
                ),
            ));
            pace
        }
        Err(e) => {
            tracing::warn!(
                kind = "malformed",
                error = %e,
                "Activity history unusable, using default pace"
            );
            notices.push(Notice::new(
                NoticeLevel::Warning,
                "Your recent runs could not be used (zero distance). Using default pace (6:00 min/km).",
            ));
            default_pace
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ActivityType};

    fn history(activities: Vec<Activity>, status: HistoryStatus) -> History {
        History { activities, status }
    }

    #[test]
    fn test_not_connected_uses_default() {
        let mut notices = Vec::new();
        let pace = resolve_pace(&history(vec![], HistoryStatus::NotConnected), &mut notices);

        assert_eq!(pace.min_per_km, 6.0);
        assert!(pace.is_fallback());
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_unavailable_uses_default() {
        let mut notices = Vec::new();
        let pace = resolve_pace(&history(vec![], HistoryStatus::Unavailable), &mut notices);

        assert_eq!(pace.min_per_km, 6.0);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_synced_without_runs_warns() {
        let mut notices = Vec::new();
        let activities = vec![Activity::new(ActivityType::Other, 30_000.0, 3_600.0)];
        let pace = resolve_pace(&history(activities, HistoryStatus::Synced), &mut notices);

        assert!(pace.is_fallback());
        assert!(notices[0].message.contains("No runs found"));
    }

    #[test]
    fn test_synced_with_runs_reports_pace() {
        let mut notices = Vec::new();
        let activities = vec![Activity::new(ActivityType::Run, 10_000.0, 3_300.0)];
        let pace = resolve_pace(&history(activities, HistoryStatus::Synced), &mut notices);

        assert_eq!(pace.min_per_km, 5.5);
        assert_eq!(pace.source, PaceSource::History { runs: 1 });
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert!(notices[0].message.contains("5.50 min/km"));
    }

    #[test]
    fn test_degenerate_history_falls_back() {
        let mut notices = Vec::new();
        let activities = vec![Activity::new(ActivityType::Run, 0.0, 3_300.0)];
        let pace = resolve_pace(&history(activities, HistoryStatus::Synced), &mut notices);

        assert_eq!(pace.min_per_km, 6.0);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }
}

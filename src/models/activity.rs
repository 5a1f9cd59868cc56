// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity history records used to derive a baseline pace.

use serde::{Deserialize, Serialize};

/// Activity type as reported by the history provider.
///
/// Anything other than a road or trail run collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Run,
    TrailRun,
    #[serde(other)]
    Other,
}

impl ActivityType {
    /// Whether this activity counts toward the baseline pace.
    pub fn is_running(self) -> bool {
        matches!(self, ActivityType::Run | ActivityType::TrailRun)
    }
}

/// A past activity. Accepts both our own field names and Strava's
/// `type` / `distance` / `moving_time` summary fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    /// Distance in meters
    #[serde(alias = "distance")]
    pub distance_meters: f64,
    /// Moving time in seconds
    #[serde(alias = "moving_time")]
    pub moving_time_seconds: f64,
}

impl Activity {
    pub fn new(kind: ActivityType, distance_meters: f64, moving_time_seconds: f64) -> Self {
        Self {
            kind,
            distance_meters,
            moving_time_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_strava_summary() {
        let json = r#"{
            "id": 123,
            "name": "Morning Run",
            "type": "TrailRun",
            "sport_type": "TrailRun",
            "distance": 10500.5,
            "moving_time": 3720,
            "elapsed_time": 3900
        }"#;

        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityType::TrailRun);
        assert_eq!(activity.distance_meters, 10500.5);
        assert_eq!(activity.moving_time_seconds, 3720.0);
    }

    #[test]
    fn test_unknown_type_is_other() {
        let json = r#"{"type": "Ride", "distance": 40000, "moving_time": 5400}"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityType::Other);
        assert!(!activity.kind.is_running());
    }

    #[test]
    fn test_running_types() {
        assert!(ActivityType::Run.is_running());
        assert!(ActivityType::TrailRun.is_running());
        assert!(!ActivityType::Other.is_running());
    }
}

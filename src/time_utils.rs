// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for duration and pace formatting.

/// Format a duration in minutes as `"{hours}h {minutes}min"`, truncating
/// partial minutes.
pub fn format_duration(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    let hours = (minutes / 60.0).floor() as u64;
    let rest = (minutes % 60.0).floor() as u64;
    format!("{hours}h {rest}min")
}

/// Format a pace in minutes per kilometer as `"m:ss"`.
pub fn format_pace(min_per_km: f64) -> String {
    let total_secs = (min_per_km.max(0.0) * 60.0).round() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

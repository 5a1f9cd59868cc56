// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - prediction engine and upstream clients.

pub mod evaluation;
pub mod pace;
pub mod prediction;
pub mod strava;
pub mod weather;

pub use evaluation::{evaluate, Evaluation, Notice, NoticeLevel};
pub use pace::estimate_baseline_pace;
pub use prediction::predict;
pub use strava::{History, HistoryStatus, StravaClient};
pub use weather::{impact_multiplier, WeatherService};

use crate::config::Config;

/// Shared HTTP client with the configured timeout on every request.
pub fn http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .connect_timeout(config.http_timeout)
        .user_agent(concat!("trail-predictor/", env!("CARGO_PKG_VERSION")))
        .build()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Trail-Predictor: estimate trail race finishing times
//!
//! This crate combines a runner's Strava pace history, a course profile and
//! live Open-Meteo weather into a finishing time estimate, served as an HTML
//! page and a JSON API.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{StravaClient, WeatherService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava_client: StravaClient,
    pub weather_service: WeatherService,
}

impl AppState {
    /// Build the upstream clients from a validated config.
    pub fn from_config(config: Config) -> reqwest::Result<Self> {
        let http = services::http_client(&config)?;

        let strava_client = StravaClient::new(
            http.clone(),
            config.strava_oauth_url.clone(),
            config.strava_api_url.clone(),
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        );
        let weather_service = WeatherService::new(
            http,
            config.weather_api_url.clone(),
            config.weather_cache_ttl,
        );

        Ok(Self {
            config,
            strava_client,
            weather_service,
        })
    }
}

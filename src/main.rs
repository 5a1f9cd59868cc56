// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail-Predictor API Server
//!
//! Estimates trail race finishing times from Strava history, course
//! profile and live weather.

use std::sync::Arc;
use trail_predictor::{config::Config, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        public_url = %config.public_url,
        timeout_secs = config.http_timeout.as_secs(),
        "Starting Trail-Predictor"
    );

    let port = config.port;
    let state = Arc::new(AppState::from_config(config)?);

    // Build router
    let app = trail_predictor::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trail_predictor=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use serde_json::{json, Value};
use std::sync::Arc;
use trail_predictor::config::Config;
use trail_predictor::middleware::session::create_session_jwt;
use trail_predictor::routes::create_router;
use trail_predictor::AppState;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing both upstreams at `upstream_url`.
#[allow(dead_code)]
pub fn test_config(upstream_url: &str) -> Config {
    Config {
        strava_oauth_url: format!("{upstream_url}/oauth"),
        strava_api_url: format!("{upstream_url}/api/v3"),
        weather_api_url: upstream_url.to_string(),
        ..Config::test_default()
    }
}

/// Create a test app whose Strava and Open-Meteo calls go to `upstream`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(upstream: &MockServer) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(test_config(&upstream.uri()))
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(config).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Serve a current-weather observation.
#[allow(dead_code)]
pub async fn mock_weather(server: &MockServer, temperature: f64, weathercode: u32) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current_weather", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latitude": 45.92,
            "longitude": 6.86,
            "current_weather": {
                "temperature": temperature,
                "windspeed": 5.0,
                "winddirection": 180,
                "weathercode": weathercode,
                "time": "2026-06-01T10:00"
            }
        })))
        .mount(server)
        .await;
}

/// A Strava activity summary as returned by `/athlete/activities`.
#[allow(dead_code)]
pub fn strava_activity(kind: &str, distance: f64, moving_time: u64) -> Value {
    json!({
        "id": 1,
        "name": format!("{kind} activity"),
        "type": kind,
        "sport_type": kind,
        "distance": distance,
        "moving_time": moving_time,
        "elapsed_time": moving_time + 60,
        "total_elevation_gain": 120.0
    })
}

/// Session cookie header value for a Strava access token.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, access_token: &str) -> String {
    let expires_at = chrono::Utc::now().timestamp() + 6 * 3600;
    let jwt = create_session_jwt(
        42,
        "Sam",
        access_token,
        expires_at,
        &state.config.session_signing_key,
    )
    .expect("Failed to create session token");
    format!("trail_session={jwt}")
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML page and health endpoint tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use wiremock::MockServer;

mod common;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let upstream = MockServer::start().await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_default_page_renders_prediction() {
    let upstream = MockServer::start().await;
    common::mock_weather(&upstream, 20.0, 0).await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = common::body_text(response).await;
    // 25 km + 1200 m on easy terrain at 6:00 min/km: 37 km, 222 min
    assert!(html.contains("3h 42min"));
    assert!(html.contains("37.0 km"));
    assert!(html.contains("Conditions: 20.0°C | Impact: +0% on time"));
    assert!(html.contains("Connect my Strava account"));
    assert!(html.contains("/auth/strava?return_to="));
}

#[tokio::test]
async fn test_page_with_hot_rainy_weather() {
    let upstream = MockServer::start().await;
    common::mock_weather(&upstream, 30.0, 61).await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app
        .oneshot(get(
            "/?distance_km=25&elevation_gain_m=1200&terrain=1.1&latitude=45.92&longitude=6.86",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = common::body_text(response).await;
    // 288.156 min
    assert!(html.contains("4h 48min"));
    assert!(html.contains("Impact: +18% on time"));
    assert!(html.contains(r#"<option value="1.1" selected>Moderate</option>"#));

    let flat = html.find("Flat (theoretical): ").unwrap();
    let elevation = html.find("Elevation + terrain: ").unwrap();
    let weather = html.find("Weather surcharge: ").unwrap();
    assert!(flat < elevation && elevation < weather);
}

#[tokio::test]
async fn test_page_shows_auth_error() {
    let upstream = MockServer::start().await;
    common::mock_weather(&upstream, 20.0, 0).await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app
        .oneshot(get("/?auth_error=access_denied"))
        .await
        .unwrap();
    let html = common::body_text(response).await;
    assert!(html.contains("Strava access was not granted."));
}

#[tokio::test]
async fn test_page_rejects_invalid_terrain() {
    let upstream = MockServer::start().await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app.oneshot(get("/?terrain=2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_escapes_athlete_name() {
    let upstream = MockServer::start().await;
    common::mock_weather(&upstream, 20.0, 0).await;
    let (app, state) = common::create_test_app(&upstream);

    let expires_at = chrono::Utc::now().timestamp() + 3600;
    let jwt = trail_predictor::middleware::session::create_session_jwt(
        7,
        "<b>Sam</b>",
        "strava-token",
        expires_at,
        &state.config.session_signing_key,
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, format!("trail_session={jwt}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let html = common::body_text(response).await;
    assert!(html.contains("Connected as &lt;b&gt;Sam&lt;/b&gt;"));
    assert!(html.contains(r#"href="/auth/logout""#));
    // Strava is not mocked, so the history falls back.
    assert!(html.contains("Strava is unavailable"));
}

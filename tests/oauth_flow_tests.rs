// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth redirect, callback and logout tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// Extract the `state` query parameter from the Strava authorize URL.
fn state_param(authorize_url: &str) -> String {
    let query = authorize_url.split_once('?').unwrap().1;
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("state="))
        .expect("missing state parameter");
    urlencoding::decode(raw).unwrap().into_owned()
}

#[tokio::test]
async fn test_auth_start_redirects_to_strava() {
    let upstream = MockServer::start().await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app.oneshot(get("/auth/strava")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let url = location(&response);
    assert!(url.starts_with(&format!("{}/oauth/authorize?", upstream.uri())));
    assert!(url.contains("client_id=test_client_id"));
    assert!(url.contains(
        "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fstrava%2Fcallback"
    ));
    assert!(url.contains("scope=activity:read_all"));
    assert!(!state_param(&url).is_empty());
}

#[tokio::test]
async fn test_full_oauth_flow_sets_session_cookie() {
    let upstream = MockServer::start().await;
    let expires_at = chrono::Utc::now().timestamp() + 6 * 3600;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "strava-token",
            "refresh_token": "refresh",
            "expires_at": expires_at,
            "athlete": {"id": 42, "firstname": "Sam"}
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    let (app, state) = common::create_test_app(&upstream);

    let return_to = "/?distance_km=42&terrain=1.25";
    let response = app
        .clone()
        .oneshot(get(&format!(
            "/auth/strava?return_to={}",
            urlencoding::encode(return_to)
        )))
        .await
        .unwrap();
    let oauth_state = state_param(&location(&response));

    let response = app
        .oneshot(get(&format!(
            "/auth/strava/callback?code=auth-code&state={}&scope=read,activity:read_all",
            urlencoding::encode(&oauth_state)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), return_to);

    let cookies = set_cookie_headers(&response);
    let session = cookies
        .iter()
        .find(|c| c.starts_with("trail_session="))
        .expect("missing session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Path=/"));

    let jwt = session
        .trim_start_matches("trail_session=")
        .split(';')
        .next()
        .unwrap();
    let decoded = trail_predictor::middleware::session::decode_session(
        jwt,
        &state.config.session_signing_key,
    )
    .expect("session token should verify");
    assert_eq!(decoded.access_token(), Some("strava-token"));
    assert_eq!(decoded.athlete_name.as_deref(), Some("Sam"));
}

#[tokio::test]
async fn test_callback_with_tampered_state() {
    let upstream = MockServer::start().await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app
        .oneshot(get("/auth/strava/callback?code=abc&state=dGFtcGVyZWQ"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/?auth_error=invalid_state");
    assert!(set_cookie_headers(&response).is_empty());
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_access_denied() {
    let upstream = MockServer::start().await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app.clone().oneshot(get("/auth/strava")).await.unwrap();
    let oauth_state = state_param(&location(&response));

    let response = app
        .oneshot(get(&format!(
            "/auth/strava/callback?error=access_denied&state={}",
            urlencoding::encode(&oauth_state)
        )))
        .await
        .unwrap();

    assert_eq!(location(&response), "/?auth_error=access_denied");
    assert!(set_cookie_headers(&response).is_empty());
}

#[tokio::test]
async fn test_callback_token_exchange_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Bad Request",
            "errors": [{"resource": "AuthorizationCode", "code": "invalid"}]
        })))
        .mount(&upstream)
        .await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app.clone().oneshot(get("/auth/strava")).await.unwrap();
    let oauth_state = state_param(&location(&response));

    let response = app
        .oneshot(get(&format!(
            "/auth/strava/callback?code=reused&state={}",
            urlencoding::encode(&oauth_state)
        )))
        .await
        .unwrap();

    assert_eq!(location(&response), "/?auth_error=strava_error");
    assert!(set_cookie_headers(&response).is_empty());
}

#[tokio::test]
async fn test_open_redirect_rejected() {
    let upstream = MockServer::start().await;
    let (app, _) = common::create_test_app(&upstream);

    let response = app
        .clone()
        .oneshot(get("/auth/strava?return_to=https%3A%2F%2Fevil.example"))
        .await
        .unwrap();
    let oauth_state = state_param(&location(&response));

    let response = app
        .oneshot(get(&format!(
            "/auth/strava/callback?error=access_denied&state={}",
            urlencoding::encode(&oauth_state)
        )))
        .await
        .unwrap();

    assert_eq!(location(&response), "/?auth_error=access_denied");
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let upstream = MockServer::start().await;
    let (app, state) = common::create_test_app(&upstream);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/logout")
                .header(header::COOKIE, common::session_cookie(&state, "strava-token"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");

    let cookies = set_cookie_headers(&response);
    let removal = cookies
        .iter()
        .find(|c| c.starts_with("trail_session="))
        .expect("missing removal cookie");
    assert!(removal.contains("Max-Age=0"));
    assert!(removal.contains("Path=/"));
}

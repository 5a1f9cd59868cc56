// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::session::{create_session_jwt, SESSION_COOKIE};
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// How long a login attempt may take before its `state` is refused.
const STATE_MAX_AGE_MS: i64 = 15 * 60 * 1000;

/// Allowed clock skew for state timestamps from the future.
const STATE_MAX_SKEW_MS: i64 = 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/strava", get(auth_start))
        .route("/auth/strava/callback", get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Local path (with query) to return to after login, so the form
    /// keeps its values.
    #[serde(default)]
    return_to: Option<String>,
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
) -> Result<Redirect> {
    let return_to = params
        .return_to
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/".to_string());

    let timestamp = chrono::Utc::now().timestamp_millis();
    let oauth_state = sign_state(&return_to, timestamp, &state.config.oauth_state_key)?;

    let auth_url = state
        .strava_client
        .authorize_url(&state.config.oauth_callback_url(), &oauth_state);

    tracing::info!(
        client_id = %state.config.strava_client_id,
        return_to = %return_to,
        "Starting OAuth flow, redirecting to Strava"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token, store it in the session cookie.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let now = chrono::Utc::now().timestamp_millis();

    let Some(return_to) = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key, now))
    else {
        tracing::warn!("Invalid, expired or missing OAuth state parameter");
        return (jar, auth_error_redirect("/", "invalid_state"));
    };

    // Check for OAuth errors
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        let reason = if error == "access_denied" {
            "access_denied"
        } else {
            "strava_error"
        };
        return (jar, auth_error_redirect(&return_to, reason));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("OAuth callback without authorization code");
        return (jar, auth_error_redirect(&return_to, "strava_error"));
    };

    tracing::info!("Exchanging authorization code for token");

    let token = match state.strava_client.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            e.log_fallback("no session");
            return (jar, auth_error_redirect(&return_to, "strava_error"));
        }
    };

    let jwt = match create_session_jwt(
        token.athlete.id,
        &token.athlete.firstname,
        &token.access_token,
        token.expires_at,
        &state.config.session_signing_key,
    ) {
        Ok(jwt) => jwt,
        Err(e) => {
            tracing::error!(error = %e, "Session token creation failed");
            return (jar, auth_error_redirect(&return_to, "strava_error"));
        }
    };

    tracing::info!(athlete_id = token.athlete.id, "OAuth successful, session created");

    let max_age_secs = (token.expires_at - now / 1000).max(0);
    let cookie = Cookie::build((SESSION_COOKIE, jwt))
        .path("/")
        .http_only(true)
        .secure(state.config.secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs));

    (jar.add(cookie), Redirect::temporary(&return_to))
}

/// Logout - drop the session cookie and go back to the form.
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let removal = Cookie::build(SESSION_COOKIE).path("/");
    (jar.remove(removal), Redirect::temporary("/"))
}

fn auth_error_redirect(return_to: &str, reason: &str) -> Redirect {
    let separator = if return_to.contains('?') { '&' } else { '?' };
    Redirect::temporary(&format!("{return_to}{separator}auth_error={reason}"))
}

/// Only same-site absolute paths; rejects `//host` and `/\host` tricks.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(|c| c.is_control())
}

/// Build a signed state value: base64("return_to|timestamp_hex|signature_hex").
fn sign_state(return_to: &str, timestamp_ms: i64, secret: &[u8]) -> Result<String> {
    let state_payload = format!("{}|{:x}", return_to, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(state_payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed_state = format!("{}|{}", state_payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify HMAC signature and age, and decode the return path from the
/// OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8], now_ms: i64) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // The return path may itself contain '|', so split from the right.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let return_to = parts.next()?;

    let payload = format!("{}|{}", return_to, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if !bool::from(signature_hex.as_bytes().ct_eq(expected_signature.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let timestamp = i64::from_str_radix(timestamp_hex, 16).ok()?;
    let age = now_ms - timestamp;
    if age > STATE_MAX_AGE_MS || age < -STATE_MAX_SKEW_MS {
        tracing::warn!(age_ms = age, "OAuth state expired");
        return None;
    }

    if !is_local_path(return_to) {
        return None;
    }

    Some(return_to.to_string())
}

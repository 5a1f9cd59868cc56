// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Optional Strava session carried in a signed JWT cookie.
//!
//! Unlike an auth guard, this never rejects a request: a missing or invalid
//! session simply yields an anonymous `SessionContext`.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "trail_session";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Strava athlete ID)
    pub sub: String,
    /// Athlete first name, for display
    #[serde(default)]
    pub name: String,
    /// Strava access token
    pub strava_token: String,
    /// Expiration time (Unix timestamp), matches the Strava token expiry
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Per-request session state handed to handlers.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub athlete_name: Option<String>,
    access_token: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(access_token: impl Into<String>, athlete_name: Option<String>) -> Self {
        Self {
            athlete_name,
            access_token: Some(access_token.into()),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Middleware that attaches a `SessionContext` to every request.
pub async fn load_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    // Try cookie first, then header
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_string)
        });

    let session = match token {
        Some(token) => match decode_session(&token, &state.config.session_signing_key) {
            Some(session) => session,
            None => {
                tracing::debug!("Ignoring invalid or expired session token");
                SessionContext::anonymous()
            }
        },
        None => SessionContext::anonymous(),
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Decode and verify a session token.
pub fn decode_session(token: &str, signing_key: &[u8]) -> Option<SessionContext> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(token, &key, &validation).ok()?;
    let name = Some(data.claims.name).filter(|n| !n.is_empty());

    Some(SessionContext::with_token(data.claims.strava_token, name))
}

/// Create a session JWT holding the Strava access token.
pub fn create_session_jwt(
    athlete_id: u64,
    athlete_name: &str,
    strava_token: &str,
    expires_at: i64,
    signing_key: &[u8],
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp();
    if expires_at <= now {
        anyhow::bail!("Strava token already expired");
    }

    let claims = Claims {
        sub: athlete_id.to_string(),
        name: athlete_name.to_string(),
        strava_token: strava_token.to_string(),
        iat: now as usize,
        exp: expires_at as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

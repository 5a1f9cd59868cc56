// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Built once at startup, validated, and shared read-only through `AppState`.

use hkdf::Hkdf;
use sha2::Sha256;
use std::env;
use std::time::Duration;

/// Minimum length of `SESSION_SECRET` in bytes.
const MIN_SESSION_SECRET_LEN: usize = 32;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Public base URL of this service, used to build the OAuth redirect URI
    pub public_url: String,
    /// Server port
    pub port: u16,
    /// Strava OAuth endpoints (authorize, token)
    pub strava_oauth_url: String,
    /// Strava REST API base
    pub strava_api_url: String,
    /// Open-Meteo base URL
    pub weather_api_url: String,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
    /// How long a weather observation is reused; zero disables the cache
    pub weather_cache_ttl: Duration,
    /// Origins allowed to call the JSON API cross-site
    pub allowed_origins: Vec<String>,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// HMAC key for OAuth `state` values (derived from SESSION_SECRET)
    pub oauth_state_key: Vec<u8>,
    /// JWT signing key for session cookies (derived from SESSION_SECRET)
    pub session_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;
        let (oauth_state_key, session_signing_key) = derive_keys(session_secret.trim())?;

        let http_timeout_secs: u64 = parse_or("HTTP_TIMEOUT_SECS", 5)?;
        if http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            public_url: trim_url(
                env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            ),
            port: parse_or("PORT", 8080)?,
            strava_oauth_url: trim_url(
                env::var("STRAVA_OAUTH_URL")
                    .unwrap_or_else(|_| "https://www.strava.com/oauth".to_string()),
            ),
            strava_api_url: trim_url(
                env::var("STRAVA_API_URL")
                    .unwrap_or_else(|_| "https://www.strava.com/api/v3".to_string()),
            ),
            weather_api_url: trim_url(
                env::var("WEATHER_API_URL")
                    .unwrap_or_else(|_| "https://api.open-meteo.com".to_string()),
            ),
            http_timeout: Duration::from_secs(http_timeout_secs),
            weather_cache_ttl: Duration::from_secs(parse_or("WEATHER_CACHE_TTL_SECS", 600)?),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            oauth_state_key,
            session_signing_key,
        })
    }

    /// Config for tests: local URLs, short timeout, caching disabled.
    pub fn test_default() -> Self {
        let (oauth_state_key, session_signing_key) =
            derive_keys("test_session_secret_32_bytes_minimum!!").unwrap_or_default();

        Self {
            strava_client_id: "test_client_id".to_string(),
            public_url: "http://localhost:8080".to_string(),
            port: 8080,
            strava_oauth_url: "http://127.0.0.1:9/oauth".to_string(),
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            weather_api_url: "http://127.0.0.1:9".to_string(),
            http_timeout: Duration::from_secs(2),
            weather_cache_ttl: Duration::ZERO,
            allowed_origins: Vec::new(),
            strava_client_secret: "test_secret".to_string(),
            oauth_state_key,
            session_signing_key,
        }
    }

    /// Redirect URI registered with Strava.
    pub fn oauth_callback_url(&self) -> String {
        format!("{}/auth/strava/callback", self.public_url)
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

/// Expand the session secret into independent OAuth-state and session keys.
fn derive_keys(secret: &str) -> Result<(Vec<u8>, Vec<u8>), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LEN {
        return Err(ConfigError::Invalid {
            name: "SESSION_SECRET",
            reason: format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
        });
    }

    let hk = Hkdf::<Sha256>::new(None, secret.as_bytes());
    let mut state_key = vec![0u8; 32];
    let mut session_key = vec![0u8; 32];
    hk.expand(b"trail-predictor oauth-state", &mut state_key)
        .and_then(|_| hk.expand(b"trail-predictor session", &mut session_key))
        .map_err(|e| ConfigError::Invalid {
            name: "SESSION_SECRET",
            reason: e.to_string(),
        })?;

    Ok((state_key, session_key))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("could not parse {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| trim_url(o.to_string()))
        .filter(|o| !o.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the activity history that feeds the baseline pace.
//!
//! Handles:
//! - Building the OAuth authorize URL
//! - Exchanging an authorization code for an access token
//! - Listing the most recent activities
//! - Falling back to an empty history on any failure

use crate::error::UpstreamError;
use crate::models::Activity;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const SERVICE: &str = "strava";

/// Number of recent activities used for the baseline pace.
pub const HISTORY_PAGE_SIZE: u32 = 15;

/// Read access is all we need.
const OAUTH_SCOPE: &str = "activity:read_all";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    oauth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        http: reqwest::Client,
        oauth_url: String,
        api_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http,
            oauth_url,
            api_url,
            client_id,
            client_secret,
        }
    }

    /// URL the user is sent to in order to grant read access.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             approval_prompt=auto&\
             scope={}&\
             state={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            OAUTH_SCOPE,
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchange, UpstreamError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        let token: TokenExchange = check_response_json(response).await?;
        if token.access_token.is_empty() {
            return Err(UpstreamError::Malformed {
                service: SERVICE,
                message: "empty access_token in token response".to_string(),
            });
        }

        Ok(token)
    }

    /// Most recent activities, newest first.
    pub async fn list_recent_activities(
        &self,
        access_token: &str,
    ) -> Result<Vec<Activity>, UpstreamError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", HISTORY_PAGE_SIZE.to_string())])
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        check_response_json(response).await
    }

    /// Activity history for the current session.
    ///
    /// Without a token the history is empty; on failure it is empty too, and
    /// the status records why.
    pub async fn history(&self, access_token: Option<&str>) -> History {
        let Some(token) = access_token else {
            return History {
                activities: Vec::new(),
                status: HistoryStatus::NotConnected,
            };
        };

        match self.list_recent_activities(token).await {
            Ok(activities) => {
                tracing::info!(count = activities.len(), "Fetched activity history");
                History {
                    activities,
                    status: HistoryStatus::Synced,
                }
            }
            Err(e) => {
                e.log_fallback("empty history");
                History {
                    activities: Vec::new(),
                    status: HistoryStatus::Unavailable,
                }
            }
        }
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
        } else {
            tracing::debug!(status = %status, body = %body, "Strava error response");
        }

        return Err(UpstreamError::Status {
            service: SERVICE,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

    serde_json::from_str(&body).map_err(|e| UpstreamError::Malformed {
        service: SERVICE,
        message: e.to_string(),
    })
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    /// Unix timestamp
    pub expires_at: i64,
    pub athlete: StravaAthlete,
}

/// Athlete info from OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: String,
}

/// Why the history looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    /// No Strava session.
    NotConnected,
    /// Fetched successfully (possibly with zero runs).
    Synced,
    /// Strava failed; history replaced by an empty list.
    Unavailable,
}

/// Activity history as seen by the pace estimator.
#[derive(Debug, Clone)]
pub struct History {
    pub activities: Vec<Activity>,
    pub status: HistoryStatus,
}

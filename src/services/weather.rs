// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather impact on race time, backed by Open-Meteo current conditions.
//!
//! Handles:
//! - Fetching the current temperature and WMO weather code for a location
//! - Turning an observation into a time multiplier
//! - Falling back to neutral conditions when the provider is unavailable
//! - Short-lived caching keyed by rounded coordinates

use crate::error::UpstreamError;
use crate::models::{Coordinates, WeatherImpact, WeatherObservation, WeatherSource};
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

const SERVICE: &str = "open-meteo";

/// Temperatures above this start costing time.
const HEAT_THRESHOLD_C: f64 = 25.0;
/// Extra time per degree above the threshold (1.2%).
const HEAT_PENALTY_PER_DEGREE: f64 = 0.012;
/// WMO codes above this are precipitation (rain, snow, storms).
const PRECIPITATION_CODE_THRESHOLD: u32 = 50;
/// Flat penalty for wet or snowy ground (12%).
const PRECIPITATION_PENALTY: f64 = 0.12;

/// Time multiplier for the given conditions. Never below 1.0.
///
/// Heat and precipitation penalties are independent and add up.
pub fn impact_multiplier(observation: &WeatherObservation) -> f64 {
    let mut impact = 1.0;

    if observation.temperature_celsius > HEAT_THRESHOLD_C {
        impact += (observation.temperature_celsius - HEAT_THRESHOLD_C) * HEAT_PENALTY_PER_DEGREE;
    }
    if observation.condition_code > PRECIPITATION_CODE_THRESHOLD {
        impact += PRECIPITATION_PENALTY;
    }

    impact
}

/// Open-Meteo `/v1/forecast?current_weather=true` response (the parts we use).
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u32,
}

/// Upper bound on cached locations.
const MAX_CACHE_ENTRIES: usize = 1024;

/// Coordinates rounded to two decimals (~1 km).
type CacheKey = (i64, i64);

#[derive(Clone, Copy)]
struct CachedObservation {
    observation: WeatherObservation,
    fetched_at: Instant,
}

/// Weather provider client with fallback and caching.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<DashMap<CacheKey, CachedObservation>>,
    cache_ttl: Duration,
}

impl WeatherService {
    /// Create a client. A zero `cache_ttl` disables caching.
    pub fn new(http: reqwest::Client, base_url: String, cache_ttl: Duration) -> Self {
        Self {
            http,
            base_url,
            cache: Arc::new(DashMap::new()),
            cache_ttl,
        }
    }

    /// Weather impact at `coords`. Never fails: any upstream problem
    /// yields the neutral fallback.
    pub async fn current_impact(&self, coords: Coordinates) -> WeatherImpact {
        let key = cache_key(coords);

        if let Some(cached) = self.cached(key) {
            tracing::debug!(
                latitude = coords.latitude,
                longitude = coords.longitude,
                "Weather cache hit"
            );
            return WeatherImpact {
                multiplier: impact_multiplier(&cached),
                observation: cached,
                source: WeatherSource::Cached,
            };
        }

        match self.fetch_observation(coords).await {
            Ok(observation) => {
                self.store(key, observation);
                let multiplier = impact_multiplier(&observation);
                tracing::info!(
                    temperature = observation.temperature_celsius,
                    code = observation.condition_code,
                    multiplier,
                    "Weather observation fetched"
                );
                WeatherImpact {
                    multiplier,
                    observation,
                    source: WeatherSource::Live,
                }
            }
            Err(e) => {
                e.log_fallback("neutral weather");
                WeatherImpact::fallback()
            }
        }
    }

    /// Fetch current conditions from Open-Meteo.
    pub async fn fetch_observation(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherObservation, UpstreamError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Malformed {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(WeatherObservation {
            temperature_celsius: parsed.current_weather.temperature,
            condition_code: parsed.current_weather.weathercode,
        })
    }

    fn cached(&self, key: CacheKey) -> Option<WeatherObservation> {
        if self.cache_ttl.is_zero() {
            return None;
        }

        let entry = *self.cache.get(&key)?;
        if entry.fetched_at.elapsed() < self.cache_ttl {
            Some(entry.observation)
        } else {
            self.cache.remove(&key);
            None
        }
    }

    /// Cache an observation, dropping expired entries first. When the map is
    /// still full of live entries the observation is not cached.
    fn store(&self, key: CacheKey, observation: WeatherObservation) {
        if self.cache_ttl.is_zero() {
            return;
        }

        let ttl = self.cache_ttl;
        self.cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);

        if self.cache.len() >= MAX_CACHE_ENTRIES && !self.cache.contains_key(&key) {
            tracing::debug!(entries = self.cache.len(), "Weather cache full, not caching");
            return;
        }

        self.cache.insert(
            key,
            CachedObservation {
                observation,
                fetched_at: Instant::now(),
            },
        );
    }
}

fn cache_key(coords: Coordinates) -> CacheKey {
    (
        (coords.latitude * 100.0).round() as i64,
        (coords.longitude * 100.0).round() as i64,
    )
}

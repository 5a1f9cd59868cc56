// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON prediction API.

use crate::error::Result;
use crate::middleware::SessionContext;
use crate::models::PredictionForm;
use crate::services::{evaluate, Evaluation};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/predict", get(predict))
}

/// Predict a finishing time. Same inputs as the HTML form.
async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(form): Query<PredictionForm>,
) -> Result<Json<Evaluation>> {
    form.validate()?;
    let (course, location) = form.into_course()?;

    Ok(Json(evaluate(&state, &session, course, location).await))
}

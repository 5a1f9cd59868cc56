// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The interactive prediction page.

use crate::error::Result;
use crate::middleware::SessionContext;
use crate::models::PredictionForm;
use crate::render::render_page;
use crate::services::evaluate;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Set by the OAuth callback when the login did not go through.
#[derive(Deserialize)]
struct PageParams {
    #[serde(default)]
    auth_error: Option<String>,
}

/// Render the form with a prediction for the submitted (or default) course.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(form): Query<PredictionForm>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>> {
    form.validate()?;
    let (course, location) = form.into_course()?;

    let evaluation = evaluate(&state, &session, course, location).await;

    Ok(Html(render_page(
        &evaluation,
        &session,
        params.auth_error.as_deref(),
    )))
}

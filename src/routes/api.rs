// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the signed-in user.

use crate::error::Result;
use crate::models::Identity;
use crate::routes::alerts::AlertResponse;
use crate::routes::auth::IdentityResponse;
use crate::services::volunteer;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a session).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me/volunteering", get(get_my_volunteering))
}

/// Get the current identity.
async fn get_me(Extension(identity): Extension<Identity>) -> Json<IdentityResponse> {
    Json(identity.into())
}

/// Alerts the current user volunteers for.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MyVolunteeringResponse {
    pub alerts: Vec<AlertResponse>,
}

async fn get_my_volunteering(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<MyVolunteeringResponse>> {
    let alerts = volunteer::volunteering_for(&state.db, &identity.uid).await?;

    tracing::debug!(uid = %identity.uid, count = alerts.len(), "Loaded volunteering");

    Ok(Json(MyVolunteeringResponse {
        alerts: alerts.into_iter().map(AlertResponse::from).collect(),
    }))
}

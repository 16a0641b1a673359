// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: exchange a Firebase ID token for a session cookie.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_token, expired_session_cookie, session_cookie};
use crate::services::TokenError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequest {
    id_token: String,
}

/// Signed-in identity.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IdentityResponse {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl From<crate::models::Identity> for IdentityResponse {
    fn from(identity: crate::models::Identity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
            display_name: identity.display_name,
            photo_url: identity.photo_url,
        }
    }
}

/// Verify an ID token and start a session.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: std::result::Result<Json<SessionRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<IdentityResponse>)> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let identity = state
        .token_verifier
        .verify_id_token(&request.id_token)
        .await
        .map_err(|e| match e {
            TokenError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Rejected ID token");
                AppError::InvalidToken
            }
            TokenError::Transient(reason) => AppError::IdentityProvider(reason),
        })?;

    let token = create_session_token(&identity, &state.config.session_signing_key)?;
    let jar = jar.add(session_cookie(token, state.config.secure_cookies()));

    tracing::info!(uid = %identity.uid, "Session started");

    Ok((jar, Json(identity.into())))
}

/// End the session.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.add(expired_session_cookie(state.config.secure_cookies()));
    (jar, StatusCode::NO_CONTENT)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert board routes.

use crate::error::{AppError, Result};
use crate::middleware::MaybeIdentity;
use crate::models::{Alert, Identity, Location, Requirement, Tag};
use crate::services::alerts::{self, TagFilter, ALL_TAGS};
use crate::services::{map, volunteer, VolunteerState};
use crate::time_utils::format_utc_rfc3339;
use crate::validation::AlertSubmission;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes readable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/alerts", get(list_alerts))
        .route("/api/alerts/map", get(alerts_map))
        .route("/api/alerts/{id}", get(get_alert))
        .route("/api/options", get(get_options))
}

/// Routes that write; the auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/alerts", post(create_alert))
        .route("/api/alerts/{id}/volunteers", post(register_volunteer))
}

// ─── Response Types ──────────────────────────────────────────

/// Alert as returned by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AlertResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `[latitude, longitude]`
    #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
    pub location: Location,
    #[cfg_attr(feature = "binding-generation", ts(type = "string[]"))]
    pub requirements: Vec<Requirement>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string[]"))]
    pub tags: Vec<Tag>,
    pub phone_number: String,
    pub created_by: String,
    pub created_by_name: String,
    pub created_at: String,
    pub status: String,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            title: alert.title,
            description: alert.description,
            location: alert.location,
            requirements: alert.requirements,
            tags: alert.tags,
            phone_number: alert.phone_number,
            created_by: alert.created_by,
            created_by_name: alert.created_by_name,
            created_at: format_utc_rfc3339(alert.created_at),
            status: alert.status.as_str().to_string(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AlertListResponse {
    pub alerts: Vec<AlertResponse>,
    /// Filter choices: "All" followed by tags in use.
    pub tags: Vec<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AlertDetailResponse {
    pub alert: AlertResponse,
    pub volunteer_state: VolunteerState,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateAlertResponse {
    pub id: String,
    pub message: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VolunteerResponse {
    pub alert_id: String,
    pub joined_at: String,
    pub message: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OptionsResponse {
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub map_access_token: Option<String>,
}

// ─── Handlers ────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListAlertsQuery {
    tag: Option<String>,
}

/// List alerts, newest first, optionally filtered by one tag.
async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListAlertsQuery>,
) -> Result<Json<AlertListResponse>> {
    let selected = match params.tag.as_deref() {
        None => TagFilter::All,
        Some(name) => TagFilter::parse(name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown tag: {name}")))?,
    };

    let all = alerts::list_alerts(&state.db).await?;

    let tags = std::iter::once(ALL_TAGS.to_string())
        .chain(
            alerts::distinct_tags(&all)
                .into_iter()
                .map(|t| t.as_str().to_string()),
        )
        .collect();

    let alerts = alerts::filter_by_tag(all, selected)
        .into_iter()
        .map(AlertResponse::from)
        .collect();

    Ok(Json(AlertListResponse { alerts, tags }))
}

/// Create an alert from the submitted form.
async fn create_alert(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    body: std::result::Result<Json<AlertSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateAlertResponse>)> {
    let Json(submission) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let alert = alerts::create_alert(&state.db, &submission, Some(&identity)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAlertResponse {
            id: alert.id,
            message: "Alert created successfully!".to_string(),
        }),
    ))
}

/// One alert plus whether the caller can volunteer.
async fn get_alert(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<Json<AlertDetailResponse>> {
    let detail = volunteer::load_alert_detail(&state.db, &alert_id, identity.as_ref()).await?;

    Ok(Json(AlertDetailResponse {
        alert: detail.alert.into(),
        volunteer_state: detail.volunteer_state,
    }))
}

#[derive(Deserialize, Default)]
struct VolunteerRequest {
    #[serde(default)]
    message: Option<String>,
}

/// Register the caller as a volunteer.
///
/// The body is optional; an empty body means no message.
async fn register_volunteer(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> Result<(StatusCode, Json<VolunteerResponse>)> {
    let request: VolunteerRequest = if body.iter().all(u8::is_ascii_whitespace) {
        VolunteerRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid volunteer request: {e}")))?
    };

    let registration = volunteer::register_volunteer(
        &state.db,
        &state.email,
        &alert_id,
        &identity,
        request.message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(VolunteerResponse {
            alert_id,
            joined_at: format_utc_rfc3339(registration.participation.joined_at),
            message: "Thank you for volunteering!".to_string(),
        }),
    ))
}

/// All alerts as a GeoJSON FeatureCollection.
async fn alerts_map(
    State(state): State<Arc<AppState>>,
) -> Result<Json<geojson::FeatureCollection>> {
    let all = alerts::list_alerts(&state.db).await?;
    Ok(Json(map::alerts_to_feature_collection(&all)))
}

/// Fixed form choices and the public map token.
async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        requirements: Requirement::ALL
            .iter()
            .map(|r| r.as_str().to_string())
            .collect(),
        tags: Tag::ALL.iter().map(|t| t.as_str().to_string()).collect(),
        map_access_token: state.config.mapbox_token.clone(),
    })
}

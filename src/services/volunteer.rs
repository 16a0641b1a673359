// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert detail and volunteer registration.
//!
//! Registration is a check followed by a create-if-absent write; the
//! repository's uniqueness key settles concurrent duplicates. The thank-you
//! email goes out on a detached task after the write is durable.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{Alert, Identity, NewParticipation, Participation, ParticipationWrite};
use crate::services::email::{EmailService, VolunteerEmail};
use serde::Serialize;
use tokio::task::JoinHandle;

/// Whether the current caller can volunteer for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum VolunteerState {
    Eligible,
    AlreadyVolunteering,
    SignedOut,
}

/// An alert together with the caller's volunteer state.
#[derive(Debug, Clone)]
pub struct AlertDetail {
    pub alert: Alert,
    pub volunteer_state: VolunteerState,
}

/// Result of a successful registration.
#[derive(Debug)]
pub struct Registration {
    pub participation: Participation,
    /// Notification task, if one was started.
    pub notification: Option<JoinHandle<()>>,
}

/// Load an alert and work out whether `identity` already volunteers.
pub async fn load_alert_detail(
    db: &Database,
    alert_id: &str,
    identity: Option<&Identity>,
) -> Result<AlertDetail, AppError> {
    let alert = db
        .get_alert(alert_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Alert {alert_id}")))?;

    let volunteer_state = match identity {
        None => VolunteerState::SignedOut,
        Some(identity) => match db.get_participation(alert_id, &identity.uid).await? {
            Some(_) => VolunteerState::AlreadyVolunteering,
            None => VolunteerState::Eligible,
        },
    };

    Ok(AlertDetail {
        alert,
        volunteer_state,
    })
}

/// Register `identity` as a volunteer for an alert.
///
/// A second registration by the same identity, including one racing this
/// call, ends in `AlreadyVolunteering` with nothing written twice.
pub async fn register_volunteer(
    db: &Database,
    email: &EmailService,
    alert_id: &str,
    identity: &Identity,
    message: Option<String>,
) -> Result<Registration, AppError> {
    let detail = load_alert_detail(db, alert_id, Some(identity)).await?;
    if detail.volunteer_state == VolunteerState::AlreadyVolunteering {
        return Err(AppError::AlreadyVolunteering);
    }

    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    let write = db
        .create_participation(
            alert_id,
            NewParticipation {
                user_id: identity.uid.clone(),
                name: identity.name_or_anonymous().to_string(),
                message,
            },
        )
        .await?;

    let participation = match write {
        ParticipationWrite::Created(participation) => participation,
        ParticipationWrite::AlreadyExists => {
            tracing::info!(alert_id, uid = %identity.uid, "Duplicate volunteer registration");
            return Err(AppError::AlreadyVolunteering);
        }
    };

    tracing::info!(alert_id, uid = %identity.uid, "Volunteer registered");

    let notification = identity.email.as_ref().map(|to| {
        let message = VolunteerEmail {
            to: to.clone(),
            volunteer_name: participation.name.clone(),
            alert_title: detail.alert.title.clone(),
            alert_description: detail.alert.description.clone(),
            alert_location: detail.alert.location.to_string(),
            alert_phone_number: detail.alert.phone_number.clone(),
            message: participation.message.clone(),
        };
        spawn_notification(email.clone(), message, alert_id.to_string())
    });

    if notification.is_none() {
        tracing::debug!(uid = %identity.uid, "Identity has no email; skipping notification");
    }

    Ok(Registration {
        participation,
        notification,
    })
}

fn spawn_notification(
    email: EmailService,
    message: VolunteerEmail,
    alert_id: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = email.send_volunteer_email(&message).await {
            tracing::warn!(error = %e, alert_id = %alert_id, "Volunteer email not sent");
        }
    })
}

/// Alerts `uid` volunteers for, newest first.
pub async fn volunteering_for(db: &Database, uid: &str) -> Result<Vec<Alert>, AppError> {
    let alert_ids: Vec<String> = db
        .participations_for_user(uid)
        .await?
        .into_iter()
        .map(|p| p.alert_id)
        .collect();

    let mut alerts = db.get_alerts(&alert_ids).await?;
    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(alerts)
}

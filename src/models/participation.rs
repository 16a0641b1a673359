// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Volunteer participation model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name recorded when the identity has none.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// One identity's registration against one alert.
///
/// Stored at: `alerts/{alert_id}/participants/{user_id}`. Keying the
/// document by user ID makes (alert, user) unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    /// Owning alert (denormalized for collection-group queries)
    pub alert_id: String,
    pub user_id: String,
    /// Display name at time of registration
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Repository-assigned registration time
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub joined_at: DateTime<Utc>,
}

/// Participation fields supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParticipation {
    pub user_id: String,
    pub name: String,
    pub message: Option<String>,
}

impl NewParticipation {
    pub fn into_participation(self, alert_id: &str, joined_at: DateTime<Utc>) -> Participation {
        Participation {
            alert_id: alert_id.to_string(),
            user_id: self.user_id,
            name: self.name,
            message: self.message,
            joined_at,
        }
    }
}

/// Outcome of a create-if-absent participation write.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipationWrite {
    Created(Participation),
    /// A record for this (alert, user) already existed; nothing was written.
    AlreadyExists,
}

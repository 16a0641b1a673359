// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert repository (Firestore, or an in-process store).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Alert, NewAlert, NewParticipation, Participation, ParticipationWrite};

/// Collection names as constants.
pub mod collections {
    pub const ALERTS: &str = "alerts";
    /// Sub-collection under each alert, keyed by user ID
    pub const PARTICIPANTS: &str = "participants";
}

/// Generate a new alert document ID.
///
/// Version 7 UUIDs are monotonic within the process, so IDs sort in
/// creation order and break `createdAt` ties in insertion order.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Repository handle shared by all request handlers.
///
/// `id`, `created_at` and `joined_at` are assigned here, never by callers.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    /// Write a new alert and return the stored record.
    pub async fn create_alert(&self, alert: NewAlert) -> Result<Alert, AppError> {
        match self {
            Database::Firestore(db) => db.create_alert(alert).await,
            Database::Memory(db) => Ok(db.create_alert(alert)),
        }
    }

    /// All alerts, newest first.
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, AppError> {
        match self {
            Database::Firestore(db) => db.list_alerts().await,
            Database::Memory(db) => Ok(db.list_alerts()),
        }
    }

    pub async fn get_alert(&self, alert_id: &str) -> Result<Option<Alert>, AppError> {
        match self {
            Database::Firestore(db) => db.get_alert(alert_id).await,
            Database::Memory(db) => Ok(db.get_alert(alert_id)),
        }
    }

    /// Fetch several alerts by ID; IDs with no alert are skipped.
    pub async fn get_alerts(&self, alert_ids: &[String]) -> Result<Vec<Alert>, AppError> {
        match self {
            Database::Firestore(db) => db.get_alerts(alert_ids).await,
            Database::Memory(db) => Ok(db.get_alerts(alert_ids)),
        }
    }

    /// Participation of `user_id` in `alert_id`, if any.
    pub async fn get_participation(
        &self,
        alert_id: &str,
        user_id: &str,
    ) -> Result<Option<Participation>, AppError> {
        match self {
            Database::Firestore(db) => db.get_participation(alert_id, user_id).await,
            Database::Memory(db) => Ok(db.get_participation(alert_id, user_id)),
        }
    }

    /// Create-if-absent write keyed on (alert, user).
    pub async fn create_participation(
        &self,
        alert_id: &str,
        participation: NewParticipation,
    ) -> Result<ParticipationWrite, AppError> {
        match self {
            Database::Firestore(db) => db.create_participation(alert_id, participation).await,
            Database::Memory(db) => Ok(db.create_participation(alert_id, participation)),
        }
    }

    /// Every participation of one user, across all alerts.
    pub async fn participations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Participation>, AppError> {
        match self {
            Database::Firestore(db) => db.participations_for_user(user_id).await,
            Database::Memory(db) => Ok(db.participations_for_user(user_id)),
        }
    }
}

impl From<FirestoreDb> for Database {
    fn from(db: FirestoreDb) -> Self {
        Database::Firestore(db)
    }
}

impl From<MemoryDb> for Database {
    fn from(db: MemoryDb) -> Self {
        Database::Memory(db)
    }
}

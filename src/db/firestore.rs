// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Alerts (`alerts/{id}`)
//! - Participations (`alerts/{id}/participants/{user_id}`)
//!
//! Indexes required outside the emulator:
//! - `alerts`: composite `createdAt` descending, `__name__` ascending
//!   (alert list order).
//! - `participants`: collection-group scope single-field index on `userId`
//!   (My Volunteering lookup). Single-field indexes default to collection
//!   scope, so this needs an explicit exemption.

use crate::db::{collections, new_document_id};
use crate::error::AppError;
use crate::models::{Alert, NewAlert, NewParticipation, Participation, ParticipationWrite};
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    fn participants_parent(
        &self,
        alert_id: &str,
    ) -> Result<firestore::ParentPathBuilder, AppError> {
        self.get_client()?
            .parent_path(collections::ALERTS, alert_id)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Alert Operations ────────────────────────────────────────

    /// Create an alert with a generated ID and the current time.
    pub async fn create_alert(&self, alert: NewAlert) -> Result<Alert, AppError> {
        self.create_alert_at(alert, chrono::Utc::now()).await
    }

    /// Create an alert with a generated ID and an explicit creation time.
    ///
    /// Uses a create (not upsert) so an ID collision can never overwrite.
    pub async fn create_alert_at(
        &self,
        alert: NewAlert,
        created_at: DateTime<Utc>,
    ) -> Result<Alert, AppError> {
        let alert = alert.into_alert(new_document_id(), created_at);

        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::ALERTS)
            .document_id(&alert.id)
            .object(&alert)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(alert_id = %alert.id, created_by = %alert.created_by, "Alert created");
        Ok(alert)
    }

    /// List all alerts ordered by creation time (newest first).
    ///
    /// Equal timestamps fall back to document ID, which sorts in insertion
    /// order.
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ALERTS)
            .order_by([
                ("createdAt", firestore::FirestoreQueryDirection::Descending),
                ("__name__", firestore::FirestoreQueryDirection::Ascending),
            ])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an alert by ID.
    pub async fn get_alert(&self, alert_id: &str) -> Result<Option<Alert>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ALERTS)
            .obj()
            .one(alert_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Participation Operations ────────────────────────────────

    /// Get the participation document for a user, if present.
    pub async fn get_participation(
        &self,
        alert_id: &str,
        user_id: &str,
    ) -> Result<Option<Participation>, AppError> {
        let parent = self.participants_parent(alert_id)?;

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PARTICIPANTS)
            .parent(&parent)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create the participation document keyed by user ID.
    ///
    /// Firestore rejects a create on an existing document, so two racing
    /// registrations from the same user cannot both land.
    pub async fn create_participation(
        &self,
        alert_id: &str,
        participation: NewParticipation,
    ) -> Result<ParticipationWrite, AppError> {
        let parent = self.participants_parent(alert_id)?;
        let record = participation.into_participation(alert_id, chrono::Utc::now());

        let result: Result<(), firestore::errors::FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::PARTICIPANTS)
            .document_id(&record.user_id)
            .parent(&parent)
            .object(&record)
            .execute()
            .await;

        match result {
            Ok(()) => {
                tracing::info!(alert_id, user_id = %record.user_id, "Participation created");
                Ok(ParticipationWrite::Created(record))
            }
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                tracing::debug!(
                    alert_id,
                    user_id = %record.user_id,
                    "Participation already exists (create rejected)"
                );
                Ok(ParticipationWrite::AlreadyExists)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// All participations for a user (collection-group query).
    ///
    /// Needs the collection-group `userId` index; see the module docs.
    pub async fn participations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Participation>, AppError> {
        let user_id = user_id.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::PARTICIPANTS)
            .all_descendants()
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch several alerts by ID concurrently; missing IDs are skipped.
    pub async fn get_alerts(&self, alert_ids: &[String]) -> Result<Vec<Alert>, AppError> {
        let fetched = stream::iter(alert_ids.iter().cloned())
            .map(|alert_id| async move { self.get_alert(&alert_id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<Alert>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<Alert>>, AppError>>()?;

        Ok(fetched.into_iter().flatten().collect())
    }
}

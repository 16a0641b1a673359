// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process repository for local development and tests.
//!
//! Mirrors the Firestore layout: alerts keyed by ID, participations keyed
//! by (alert ID, user ID). Nothing survives a restart.

use crate::db::new_document_id;
use crate::models::{Alert, NewAlert, NewParticipation, Participation, ParticipationWrite};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Stored alert plus its insertion sequence (tie-breaker for equal timestamps).
#[derive(Clone)]
struct StoredAlert {
    seq: u64,
    alert: Alert,
}

#[derive(Default)]
struct Inner {
    alerts: DashMap<String, StoredAlert>,
    participations: DashMap<(String, String), Participation>,
    next_seq: AtomicU64,
}

/// In-memory repository. Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_alert(&self, alert: NewAlert) -> Alert {
        self.create_alert_at(alert, Utc::now())
    }

    /// Create an alert with an explicit creation time.
    pub fn create_alert_at(&self, alert: NewAlert, created_at: DateTime<Utc>) -> Alert {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let alert = alert.into_alert(new_document_id(), created_at);

        self.inner.alerts.insert(
            alert.id.clone(),
            StoredAlert {
                seq,
                alert: alert.clone(),
            },
        );

        tracing::debug!(alert_id = %alert.id, "Alert stored (memory)");
        alert
    }

    /// Newest first; equal timestamps keep insertion order.
    pub fn list_alerts(&self) -> Vec<Alert> {
        let mut stored: Vec<StoredAlert> = self
            .inner
            .alerts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        stored.sort_by(|a, b| {
            b.alert
                .created_at
                .cmp(&a.alert.created_at)
                .then_with(|| a.seq.cmp(&b.seq))
        });

        stored.into_iter().map(|s| s.alert).collect()
    }

    pub fn get_alert(&self, alert_id: &str) -> Option<Alert> {
        self.inner
            .alerts
            .get(alert_id)
            .map(|entry| entry.alert.clone())
    }

    pub fn get_alerts(&self, alert_ids: &[String]) -> Vec<Alert> {
        alert_ids.iter().filter_map(|id| self.get_alert(id)).collect()
    }

    pub fn get_participation(&self, alert_id: &str, user_id: &str) -> Option<Participation> {
        self.inner
            .participations
            .get(&(alert_id.to_string(), user_id.to_string()))
            .map(|entry| entry.value().clone())
    }

    /// The entry lock makes check-and-insert atomic per (alert, user).
    pub fn create_participation(
        &self,
        alert_id: &str,
        participation: NewParticipation,
    ) -> ParticipationWrite {
        let key = (alert_id.to_string(), participation.user_id.clone());

        match self.inner.participations.entry(key) {
            Entry::Occupied(_) => ParticipationWrite::AlreadyExists,
            Entry::Vacant(slot) => {
                let record = participation.into_participation(alert_id, Utc::now());
                slot.insert(record.clone());
                ParticipationWrite::Created(record)
            }
        }
    }

    pub fn participations_for_user(&self, user_id: &str) -> Vec<Participation> {
        self.inner
            .participations
            .iter()
            .filter(|entry| entry.key().1 == user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of participations recorded for one alert.
    pub fn participant_count(&self, alert_id: &str) -> usize {
        self.inner
            .participations
            .iter()
            .filter(|entry| entry.key().0 == alert_id)
            .count()
    }
}

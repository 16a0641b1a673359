// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST`); they are skipped otherwise.

use resq_link::models::{
    Location, NewAlert, NewParticipation, ParticipationWrite, Requirement, Tag,
};

mod common;
use common::test_db;

/// Unique suffix for test isolation.
fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string()
}

fn new_alert(title: &str, created_by: &str) -> NewAlert {
    NewAlert {
        title: title.to_string(),
        description: "Aftershocks damaged the bridge".to_string(),
        location: Location {
            latitude: 35.68,
            longitude: 139.69,
        },
        requirements: vec![Requirement::MedicalPersonnel, Requirement::Shelter],
        tags: vec![Tag::Earthquake, Tag::Infrastructure],
        phone_number: "+81355501234".to_string(),
        created_by: created_by.to_string(),
        created_by_name: "Emulator".to_string(),
    }
}

fn volunteer(user_id: &str) -> NewParticipation {
    NewParticipation {
        user_id: user_id.to_string(),
        name: "Volunteer".to_string(),
        message: Some("On my way".to_string()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ALERT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_alert_create_and_fetch() {
    require_emulator!();

    let db = test_db().await;
    let creator = format!("creator-{}", unique_suffix());

    let created = db
        .create_alert(new_alert("Bridge damage", &creator))
        .await
        .unwrap();
    assert!(!created.id.is_empty());

    let fetched = db
        .get_alert(&created.id)
        .await
        .unwrap()
        .expect("alert should exist");
    assert_eq!(fetched.title, "Bridge damage");
    assert_eq!(fetched.created_by, creator);
    assert_eq!(fetched.location, created.location);
    assert_eq!(fetched.tags, created.tags);
    assert_eq!(
        fetched.created_at.timestamp_millis(),
        created.created_at.timestamp_millis()
    );

    assert!(db.get_alert("no-such-alert").await.unwrap().is_none());
}

#[tokio::test]
async fn test_alert_list_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let creator = format!("creator-{}", unique_suffix());

    let older = db.create_alert(new_alert("Older", &creator)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let newer = db.create_alert(new_alert("Newer", &creator)).await.unwrap();

    let listed = db.list_alerts().await.unwrap();
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let position = |id: &str| listed.iter().position(|a| a.id == id).unwrap();
    assert!(position(&newer.id) < position(&older.id));
}

#[tokio::test]
async fn test_alert_list_ties_keep_insertion_order() {
    require_emulator!();

    let db = test_db().await;
    let creator = format!("creator-{}", unique_suffix());
    let tied = chrono::Utc::now();

    let mut created = Vec::new();
    for title in ["First", "Second", "Third"] {
        let alert = db
            .create_alert_at(new_alert(title, &creator), tied)
            .await
            .unwrap();
        created.push(alert.id);
    }

    let listed: Vec<String> = db
        .list_alerts()
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.created_by == creator)
        .map(|a| a.id)
        .collect();
    assert_eq!(listed, created);
}

// ═══════════════════════════════════════════════════════════════════════════
// PARTICIPATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_participation_created_once() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let user_id = format!("user-{suffix}");
    let alert = db
        .create_alert(new_alert("Shelter needed", &format!("creator-{suffix}")))
        .await
        .unwrap();

    assert!(db
        .get_participation(&alert.id, &user_id)
        .await
        .unwrap()
        .is_none());

    let first = db
        .create_participation(&alert.id, volunteer(&user_id))
        .await
        .unwrap();
    assert!(matches!(first, ParticipationWrite::Created(_)));

    let second = db
        .create_participation(&alert.id, volunteer(&user_id))
        .await
        .unwrap();
    assert_eq!(second, ParticipationWrite::AlreadyExists);

    let stored = db
        .get_participation(&alert.id, &user_id)
        .await
        .unwrap()
        .expect("participation should exist");
    assert_eq!(stored.alert_id, alert.id);
    assert_eq!(stored.message.as_deref(), Some("On my way"));
}

#[tokio::test]
async fn test_participations_for_user_spans_alerts() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let user_id = format!("user-{suffix}");
    let creator = format!("creator-{suffix}");

    let first = db.create_alert(new_alert("First", &creator)).await.unwrap();
    let second = db.create_alert(new_alert("Second", &creator)).await.unwrap();

    for alert in [&first, &second] {
        db.create_participation(&alert.id, volunteer(&user_id))
            .await
            .unwrap();
    }

    let mut alert_ids: Vec<String> = db
        .participations_for_user(&user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.alert_id)
        .collect();
    alert_ids.sort();
    let mut expected = vec![first.id.clone(), second.id.clone()];
    expected.sort();
    assert_eq!(alert_ids, expected);

    let alerts = db.get_alerts(&alert_ids).await.unwrap();
    assert_eq!(alerts.len(), 2);
}

#[tokio::test]
async fn test_offline_mock_reports_database_error() {
    let db = resq_link::db::FirestoreDb::new_mock();
    let result = db.list_alerts().await;
    assert!(matches!(result, Err(resq_link::error::AppError::Database(_))));
}

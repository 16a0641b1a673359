// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert creation, listing and tag filtering.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{Alert, Identity, NewAlert, Tag};
use crate::validation::AlertSubmission;

/// Sentinel tag meaning "no filter".
pub const ALL_TAGS: &str = "All";

/// Tag selection for the alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Tag(Tag),
}

impl TagFilter {
    /// Parse a selection; `None` for a name that is neither "All" nor a tag.
    pub fn parse(name: &str) -> Option<Self> {
        if name == ALL_TAGS {
            return Some(TagFilter::All);
        }
        Tag::from_name(name).map(TagFilter::Tag)
    }
}

/// Validate a submission and write it as a new alert.
///
/// Nothing is written unless the caller is signed in and the submission
/// passes every rule.
pub async fn create_alert(
    db: &Database,
    submission: &AlertSubmission,
    identity: Option<&Identity>,
) -> Result<Alert, AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    let validated = submission.check().map_err(AppError::Validation)?;

    let alert = NewAlert {
        title: validated.title,
        description: validated.description,
        location: validated.location,
        requirements: validated.requirements,
        tags: validated.tags,
        phone_number: validated.phone_number,
        created_by: identity.uid.clone(),
        created_by_name: identity.name_or_anonymous().to_string(),
    };

    let alert = db.create_alert(alert).await?;

    tracing::info!(
        alert_id = %alert.id,
        uid = %identity.uid,
        tags = ?alert.tags,
        "Alert submitted"
    );

    Ok(alert)
}

/// Every alert, newest first.
pub async fn list_alerts(db: &Database) -> Result<Vec<Alert>, AppError> {
    db.list_alerts().await
}

/// Tags present across `alerts`, in order of first appearance.
pub fn distinct_tags(alerts: &[Alert]) -> Vec<Tag> {
    let mut tags = Vec::new();
    for tag in alerts.iter().flat_map(|alert| alert.tags.iter().copied()) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Keep alerts carrying the selected tag; `All` keeps everything.
pub fn filter_by_tag(alerts: Vec<Alert>, selected: TagFilter) -> Vec<Alert> {
    match selected {
        TagFilter::All => alerts,
        TagFilter::Tag(tag) => alerts.into_iter().filter(|a| a.has_tag(tag)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::models::{Location, Requirement};
    use proptest::prelude::*;

    fn identity() -> Identity {
        Identity {
            uid: "uid-1".to_string(),
            email: Some("dana@example.com".to_string()),
            display_name: Some("Dana".to_string()),
            photo_url: None,
        }
    }

    fn submission() -> AlertSubmission {
        AlertSubmission {
            title: "Help needed".to_string(),
            description: "People trapped on rooftop".to_string(),
            location: vec![40.0, -74.0],
            requirements: vec!["Food".to_string()],
            tags: vec!["Flood".to_string()],
            ph_no: "+15551234567".to_string(),
        }
    }

    fn alert_with_tags(id: &str, tags: Vec<Tag>) -> Alert {
        Alert {
            id: id.to_string(),
            title: "Title".to_string(),
            description: "A long enough description".to_string(),
            location: Location {
                latitude: 0.0,
                longitude: 0.0,
            },
            requirements: vec![Requirement::Food],
            tags,
            phone_number: "5551234567".to_string(),
            created_by: "u".to_string(),
            created_by_name: "U".to_string(),
            created_at: chrono::Utc::now(),
            status: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_create_attributes_to_caller() {
        let memory = MemoryDb::new();
        let db = Database::from(memory.clone());

        let alert = create_alert(&db, &submission(), Some(&identity()))
            .await
            .unwrap();

        assert!(!alert.id.is_empty());
        assert_eq!(alert.created_by, "uid-1");
        assert_eq!(alert.created_by_name, "Dana");
        assert_eq!(memory.list_alerts(), vec![alert]);
    }

    #[tokio::test]
    async fn test_create_without_identity_writes_nothing() {
        let memory = MemoryDb::new();
        let db = Database::from(memory.clone());

        let result = create_alert(&db, &submission(), None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
        assert!(memory.list_alerts().is_empty());
    }

    #[tokio::test]
    async fn test_create_invalid_writes_nothing() {
        let memory = MemoryDb::new();
        let db = Database::from(memory.clone());
        let mut bad = submission();
        bad.title = "Hi".to_string();

        match create_alert(&db, &bad, Some(&identity())).await {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("title")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(memory.list_alerts().is_empty());
    }

    #[test]
    fn test_distinct_tags_first_appearance() {
        let alerts = vec![
            alert_with_tags("a", vec![Tag::Wildfire, Tag::Flood]),
            alert_with_tags("b", vec![Tag::Flood, Tag::Earthquake]),
            alert_with_tags("c", vec![Tag::Wildfire]),
        ];
        assert_eq!(
            distinct_tags(&alerts),
            vec![Tag::Wildfire, Tag::Flood, Tag::Earthquake]
        );
        assert!(distinct_tags(&[]).is_empty());
    }

    #[test]
    fn test_filter_by_tag() {
        let alerts = vec![
            alert_with_tags("a", vec![Tag::Wildfire, Tag::Flood]),
            alert_with_tags("b", vec![Tag::Earthquake]),
        ];

        assert_eq!(filter_by_tag(alerts.clone(), TagFilter::All), alerts);

        let floods = filter_by_tag(alerts.clone(), TagFilter::Tag(Tag::Flood));
        assert_eq!(floods.len(), 1);
        assert_eq!(floods[0].id, "a");
        assert_eq!(
            filter_by_tag(floods.clone(), TagFilter::Tag(Tag::Flood)),
            floods
        );

        assert!(filter_by_tag(alerts, TagFilter::Tag(Tag::Tsunami)).is_empty());
    }

    #[test]
    fn test_tag_filter_parse() {
        assert_eq!(TagFilter::parse("All"), Some(TagFilter::All));
        assert_eq!(
            TagFilter::parse("Search & Rescue"),
            Some(TagFilter::Tag(Tag::SearchAndRescue))
        );
        assert_eq!(TagFilter::parse("all"), None);
        assert_eq!(TagFilter::parse("Volcano"), None);
    }

    fn arb_tag() -> impl Strategy<Value = Tag> {
        prop::sample::select(Tag::ALL.to_vec())
    }

    fn arb_filter() -> impl Strategy<Value = TagFilter> {
        prop_oneof![Just(TagFilter::All), arb_tag().prop_map(TagFilter::Tag)]
    }

    fn arb_alerts() -> impl Strategy<Value = Vec<Alert>> {
        let tag_sets = prop::collection::vec(arb_tag(), 0..=5);
        prop::collection::vec(tag_sets, 0..12).prop_map(|tag_sets| {
            tag_sets
                .into_iter()
                .enumerate()
                .map(|(i, tags)| alert_with_tags(&format!("alert-{i}"), tags))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_filter_all_is_identity(alerts in arb_alerts()) {
            prop_assert_eq!(filter_by_tag(alerts.clone(), TagFilter::All), alerts);
        }

        #[test]
        fn prop_filter_is_idempotent(alerts in arb_alerts(), selected in arb_filter()) {
            let once = filter_by_tag(alerts, selected);
            prop_assert_eq!(filter_by_tag(once.clone(), selected), once);
        }

        #[test]
        fn prop_filter_keeps_exactly_tagged_alerts_in_order(
            alerts in arb_alerts(),
            tag in arb_tag(),
        ) {
            let kept = filter_by_tag(alerts.clone(), TagFilter::Tag(tag));
            prop_assert!(kept.iter().all(|a| a.has_tag(tag)));

            let expected: Vec<&str> = alerts
                .iter()
                .filter(|a| a.tags.contains(&tag))
                .map(|a| a.id.as_str())
                .collect();
            let kept_ids: Vec<&str> = kept.iter().map(|a| a.id.as_str()).collect();
            prop_assert_eq!(kept_ids, expected);
        }

        #[test]
        fn prop_distinct_tags_covers_every_tag_once(alerts in arb_alerts()) {
            let tags = distinct_tags(&alerts);
            for (i, tag) in tags.iter().enumerate() {
                prop_assert!(!tags[i + 1..].contains(tag));
            }
            for alert in &alerts {
                prop_assert!(alert.tags.iter().all(|t| tags.contains(t)));
            }
            // Every listed tag selects at least one alert
            for tag in &tags {
                prop_assert!(!filter_by_tag(alerts.clone(), TagFilter::Tag(*tag)).is_empty());
            }
        }
    }
}

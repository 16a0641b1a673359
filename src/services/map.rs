// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoJSON rendering of alerts for the map view.

use crate::models::Alert;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};

/// One Point feature per alert. GeoJSON positions are `[longitude, latitude]`.
pub fn alerts_to_feature_collection(alerts: &[Alert]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: alerts.iter().map(alert_feature).collect(),
        foreign_members: None,
    }
}

fn alert_feature(alert: &Alert) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), alert.id.clone().into());
    properties.insert("title".to_string(), alert.title.clone().into());
    properties.insert("description".to_string(), alert.description.clone().into());
    properties.insert(
        "requirements".to_string(),
        alert
            .requirements
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .into(),
    );
    properties.insert(
        "tags".to_string(),
        alert
            .tags
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .into(),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            alert.location.longitude,
            alert.location.latitude,
        ]))),
        id: Some(Id::String(alert.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

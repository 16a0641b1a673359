// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Alert model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored alert record in Firestore (`alerts/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Repository-assigned ID (also used as document ID)
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub requirements: Vec<Requirement>,
    pub tags: Vec<Tag>,
    pub phone_number: String,
    /// Creator uid
    pub created_by: String,
    /// Creator display name at creation time
    pub created_by_name: String,
    /// Repository-assigned creation time
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Older documents predate the status field
    #[serde(default)]
    pub status: AlertStatus,
}

impl Alert {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// A validated alert that has not been written yet.
///
/// Carries no `id` or `created_at`; the repository assigns both.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub title: String,
    pub description: String,
    pub location: Location,
    pub requirements: Vec<Requirement>,
    pub tags: Vec<Tag>,
    pub phone_number: String,
    pub created_by: String,
    pub created_by_name: String,
}

impl NewAlert {
    /// Materialize the stored record with repository-assigned fields.
    pub fn into_alert(self, id: String, created_at: DateTime<Utc>) -> Alert {
        Alert {
            id,
            title: self.title,
            description: self.description,
            location: self.location,
            requirements: self.requirements,
            tags: self.tags,
            phone_number: self.phone_number,
            created_by: self.created_by,
            created_by_name: self.created_by_name,
            created_at,
            status: AlertStatus::Active,
        }
    }
}

/// Alert lifecycle tag. Only `active` exists; nothing transitions it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
        }
    }
}

/// Geographic point, stored as `[latitude, longitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<[f64; 2]> for Location {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Location> for [f64; 2] {
    fn from(location: Location) -> Self {
        [location.latitude, location.longitude]
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// What an alert asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    #[serde(rename = "Medical Supplies")]
    MedicalSupplies,
    Volunteers,
    Food,
    Shelter,
    Transportation,
    Water,
    Clothing,
    #[serde(rename = "Medical Personnel")]
    MedicalPersonnel,
}

impl Requirement {
    pub const ALL: [Requirement; 8] = [
        Requirement::MedicalSupplies,
        Requirement::Volunteers,
        Requirement::Food,
        Requirement::Shelter,
        Requirement::Transportation,
        Requirement::Water,
        Requirement::Clothing,
        Requirement::MedicalPersonnel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Requirement::MedicalSupplies => "Medical Supplies",
            Requirement::Volunteers => "Volunteers",
            Requirement::Food => "Food",
            Requirement::Shelter => "Shelter",
            Requirement::Transportation => "Transportation",
            Requirement::Water => "Water",
            Requirement::Clothing => "Clothing",
            Requirement::MedicalPersonnel => "Medical Personnel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

/// Kind of emergency an alert describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "Search & Rescue")]
    SearchAndRescue,
    Flood,
    Earthquake,
    Tsunami,
    Wildfire,
    #[serde(rename = "Medical Emergency")]
    MedicalEmergency,
    Infrastructure,
    Evacuation,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::SearchAndRescue,
        Tag::Flood,
        Tag::Earthquake,
        Tag::Tsunami,
        Tag::Wildfire,
        Tag::MedicalEmergency,
        Tag::Infrastructure,
        Tag::Evacuation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::SearchAndRescue => "Search & Rescue",
            Tag::Flood => "Flood",
            Tag::Earthquake => "Earthquake",
            Tag::Tsunami => "Tsunami",
            Tag::Wildfire => "Wildfire",
            Tag::MedicalEmergency => "Medical Emergency",
            Tag::Infrastructure => "Infrastructure",
            Tag::Evacuation => "Evacuation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

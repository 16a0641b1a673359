// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert submission schema.
//!
//! Every field is checked and all failures are reported together, keyed by
//! the wire field name. Validation is pure; the submission is never mutated.

use crate::error::FieldErrors;
use crate::models::{Location, Requirement, Tag};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashSet;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum number of selected requirements or tags.
pub const MAX_SELECTIONS: usize = 5;
const PHONE_MIN_LEN: usize = 10;
const PHONE_MAX_LEN: usize = 15;

/// Raw alert submission as posted by the create form.
///
/// Missing fields deserialize to empty values so they surface as field
/// errors instead of a malformed-body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AlertSubmission {
    #[serde(default)]
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_location"))]
    pub location: Vec<f64>,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "At least one requirement is needed"),
        custom(function = "validate_requirements")
    )]
    pub requirements: Vec<String>,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "At least one tag is needed"),
        custom(function = "validate_tags")
    )]
    pub tags: Vec<String>,

    #[serde(default, rename = "phNo")]
    #[validate(custom(function = "validate_phone_number"))]
    pub ph_no: String,
}

/// Normalized, typed alert fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAlert {
    pub title: String,
    pub description: String,
    pub location: Location,
    pub requirements: Vec<Requirement>,
    pub tags: Vec<Tag>,
    pub phone_number: String,
}

impl AlertSubmission {
    /// Check the submission and return the typed record or every field error.
    pub fn check(&self) -> Result<ValidatedAlert, FieldErrors> {
        self.validate().map_err(|errors| field_messages(&errors))?;

        // The rules above guarantee these conversions succeed.
        let location = match self.location.as_slice() {
            [latitude, longitude] => Location {
                latitude: *latitude,
                longitude: *longitude,
            },
            _ => return Err(single_error("location", LOCATION_LEN_MESSAGE)),
        };

        Ok(ValidatedAlert {
            title: self.title.clone(),
            description: self.description.clone(),
            location,
            requirements: dedup(self.requirements.iter().filter_map(|r| Requirement::from_name(r))),
            tags: dedup(self.tags.iter().filter_map(|t| Tag::from_name(t))),
            phone_number: self.ph_no.clone(),
        })
    }
}

const LOCATION_LEN_MESSAGE: &str = "Location must include latitude and longitude";

/// Collapse duplicate selections, keeping first occurrence.
fn dedup<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Selections are sets; repeats count once toward the limit.
fn distinct(selections: &[String]) -> usize {
    selections.iter().map(String::as_str).collect::<HashSet<_>>().len()
}

fn single_error(field: &str, message: &str) -> FieldErrors {
    FieldErrors::from([(field.to_string(), message.to_string())])
}

/// Flatten validator output to one message per wire field name.
fn field_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((wire_name(&field.to_string()).to_string(), message))
        })
        .collect()
}

fn wire_name(field: &str) -> &str {
    match field {
        "ph_no" => "phNo",
        other => other,
    }
}

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

#[allow(clippy::ptr_arg)]
fn validate_location(location: &Vec<f64>) -> Result<(), ValidationError> {
    let [latitude, longitude] = location.as_slice() else {
        return Err(invalid("location_length", LOCATION_LEN_MESSAGE));
    };
    if !(-90.0..=90.0).contains(latitude) {
        return Err(invalid("latitude_range", "Latitude must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(longitude) {
        return Err(invalid(
            "longitude_range",
            "Longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_requirements(requirements: &Vec<String>) -> Result<(), ValidationError> {
    if distinct(requirements) > MAX_SELECTIONS {
        return Err(invalid(
            "too_many",
            format!("Select at most {MAX_SELECTIONS} requirements"),
        ));
    }
    if let Some(unknown) = requirements
        .iter()
        .find(|r| Requirement::from_name(r).is_none())
    {
        return Err(invalid("unknown_option", format!("Unknown requirement: {unknown}")));
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if distinct(tags) > MAX_SELECTIONS {
        return Err(invalid("too_many", format!("Select at most {MAX_SELECTIONS} tags")));
    }
    if let Some(unknown) = tags.iter().find(|t| Tag::from_name(t).is_none()) {
        return Err(invalid("unknown_option", format!("Unknown tag: {unknown}")));
    }
    Ok(())
}

/// `^\+?[0-9]*$`, 10 to 15 characters long.
#[allow(clippy::ptr_arg)]
fn validate_phone_number(phone: &String) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    if len < PHONE_MIN_LEN {
        return Err(invalid(
            "phone_too_short",
            "Phone number must be at least 10 digits",
        ));
    }
    if len > PHONE_MAX_LEN {
        return Err(invalid(
            "phone_too_long",
            "Phone number must not exceed 15 digits",
        ));
    }
    let digits = phone.strip_prefix('+').unwrap_or(phone.as_str());
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "phone_format",
            "Phone number must contain only numbers and an optional '+'",
        ));
    }
    Ok(())
}

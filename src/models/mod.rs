// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod alert;
pub mod identity;
pub mod participation;

pub use alert::{Alert, AlertStatus, Location, NewAlert, Requirement, Tag};
pub use identity::Identity;
pub use participation::{NewParticipation, Participation, ParticipationWrite};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod alerts;
pub mod email;
pub mod firebase_auth;
pub mod map;
pub mod volunteer;

pub use alerts::TagFilter;
pub use email::{EmailService, NotificationError, VolunteerEmail};
pub use firebase_auth::{FirebaseTokenVerifier, TokenError};
pub use volunteer::{AlertDetail, Registration, VolunteerState};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! ResQ-Link: disaster-response alert board
//!
//! This crate provides the backend API for posting location-tagged
//! emergency alerts, browsing and mapping them, and registering volunteers.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::Database;
use services::{EmailService, FirebaseTokenVerifier};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub email: EmailService,
    pub token_verifier: Arc<FirebaseTokenVerifier>,
}

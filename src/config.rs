// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Collaborator credentials (email API key, map token) are optional: when
//! absent, the corresponding collaborator is degraded and the core alert
//! flows keep working.

use std::env;

/// Default sender for volunteer notification emails.
pub const DEFAULT_EMAIL_FROM: &str = "ResQ-Link <onboarding@resend.dev>";

/// Which repository backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Firestore (or the Firestore emulator when `FIRESTORE_EMULATOR_HOST` is set).
    Firestore,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl StorageBackend {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", raw.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase/GCP project ID (Firestore project and ID token audience)
    pub firebase_project_id: String,
    /// Repository backend
    pub storage_backend: StorageBackend,
    /// Frontend URL (CORS origin, cookie `Secure` flag)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory holding the built front end
    pub static_dir: String,

    // --- Secrets ---
    /// HS256 key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Resend API key; notifications are disabled without it
    pub resend_api_key: Option<String>,
    /// `From` header for notification emails
    pub email_from: String,
    /// Public map access token handed to the client
    pub mapbox_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => StorageBackend::parse(&raw)?,
            Err(_) => StorageBackend::Firestore,
        };

        Ok(Self {
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .or_else(|_| env::var("GCP_PROJECT_ID"))
                .unwrap_or_else(|_| "local-dev".to_string()),
            storage_backend,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "web/dist".to_string()),

            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
            resend_api_key: optional_var("RESEND_API_KEY"),
            email_from: env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            mapbox_token: optional_var("MAPBOX_TOKEN"),
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: "test-project".to_string(),
            storage_backend: StorageBackend::Memory,
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            static_dir: "web/dist".to_string(),
            session_signing_key: b"test_session_key_32_bytes_long!!".to_vec(),
            resend_api_key: None,
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            mapbox_token: Some("pk.test-token".to_string()),
        }
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Read an env var, treating blank values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

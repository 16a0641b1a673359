// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ResQ-Link API Server
//!
//! Serves the alert board API and the built front end.

use resq_link::{
    config::{Config, StorageBackend},
    db::{Database, FirestoreDb, MemoryDb},
    services::{EmailService, FirebaseTokenVerifier},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting ResQ-Link API");

    let db: Database = match config.storage_backend {
        StorageBackend::Firestore => FirestoreDb::new(&config.firebase_project_id).await?.into(),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            MemoryDb::new().into()
        }
    };

    let email = EmailService::new(&config)?;
    let token_verifier = Arc::new(FirebaseTokenVerifier::new(&config)?);

    if config.mapbox_token.is_none() {
        tracing::warn!("MAPBOX_TOKEN not set; the map view will not load tiles");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        email,
        token_verifier,
    });

    // Build router
    let app = resq_link::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, static_dir = %config.static_dir, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("resq_link=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}

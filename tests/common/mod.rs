// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use resq_link::config::Config;
use resq_link::db::{FirestoreDb, MemoryDb};
use resq_link::middleware::auth::create_session_token;
use resq_link::models::Identity;
use resq_link::routes::create_router;
use resq_link::services::{EmailService, FirebaseTokenVerifier, VolunteerEmail};
use resq_link::AppState;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Key ID the static test verifier accepts.
#[allow(dead_code)]
pub const TEST_KID: &str = "test-kid";

const TEST_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/id_token_test_private.pem");
const TEST_PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/id_token_test_public.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Handles a test needs besides the router.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub memory: MemoryDb,
    pub outbox: Arc<Mutex<Vec<VolunteerEmail>>>,
}

/// Create a test app over the in-memory store with a capturing email sender.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> TestApp {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config)
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> TestApp {
    let memory = MemoryDb::new();
    let (email, outbox) = EmailService::capturing();

    let decoding_key =
        DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY).expect("test public key should parse");
    let token_verifier = Arc::new(
        FirebaseTokenVerifier::new_with_static_key(&config, TEST_KID, decoding_key)
            .expect("static verifier should build"),
    );

    let state = Arc::new(AppState {
        config,
        db: memory.clone().into(),
        email,
        token_verifier,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        memory,
        outbox,
    }
}

/// Directory with a minimal built front end.
#[allow(dead_code)]
pub fn test_static_dir() -> String {
    format!("{}/tests/fixtures/site", env!("CARGO_MANIFEST_DIR"))
}

#[allow(dead_code)]
pub fn identity(uid: &str, email: Option<&str>, name: Option<&str>) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: email.map(str::to_string),
        display_name: name.map(str::to_string),
        photo_url: None,
    }
}

/// `Cookie` header value carrying a session for `identity`.
#[allow(dead_code)]
pub fn session_cookie_header(state: &AppState, identity: &Identity) -> String {
    let token = create_session_token(identity, &state.config.session_signing_key)
        .expect("session token should sign");
    format!("__session={token}")
}

#[allow(dead_code)]
fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Firebase-style ID token signed with the test key.
#[allow(dead_code)]
pub fn sign_id_token(project_id: &str, uid: &str, email: Option<&str>) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        iss: String,
        aud: &'a str,
        sub: &'a str,
        iat: usize,
        exp: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<&'a str>,
        name: &'a str,
    }

    let now = now_secs();
    let claims = Claims {
        iss: format!("https://securetoken.google.com/{project_id}"),
        aud: project_id,
        sub: uid,
        iat: now,
        exp: now + 3600,
        email,
        name: "Test Volunteer",
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());

    encode(
        &header,
        &claims,
        &EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY).expect("test private key should parse"),
    )
    .expect("ID token should sign")
}

/// JSON request with an optional cookie.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// GET request with an optional cookie.
#[allow(dead_code)]
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Wait for spawned notification tasks to record `count` emails.
#[allow(dead_code)]
pub async fn wait_for_emails(
    outbox: &Arc<Mutex<Vec<VolunteerEmail>>>,
    count: usize,
) -> Vec<VolunteerEmail> {
    for _ in 0..100 {
        {
            let sent = outbox.lock().unwrap();
            if sent.len() >= count {
                return sent.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    outbox.lock().unwrap().clone()
}

/// The reference alert submission.
#[allow(dead_code)]
pub fn sample_submission() -> serde_json::Value {
    serde_json::json!({
        "title": "Help needed",
        "description": "People trapped on rooftop",
        "location": [40.0, -74.0],
        "requirements": ["Food"],
        "tags": ["Flood"],
        "phNo": "+15551234567"
    })
}

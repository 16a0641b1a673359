// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without a valid session
//! 2. Protected routes accept a session cookie or Bearer token
//! 3. Read-only alert routes stay public
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

mod common;
use common::get_request;

/// Create a session token with an arbitrary expiry.
fn create_test_session(uid: &str, signing_key: &[u8], exp_offset: i64) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: uid.to_string(),
        exp: (now + exp_offset) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

#[tokio::test]
async fn test_protected_routes_without_session() {
    for uri in ["/api/me", "/api/me/volunteering"] {
        let app = common::create_test_app();

        let response = app.router.oneshot(get_request(uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let json = common::body_json(response).await;
        assert_eq!(json["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_protected_route_with_bearer_token() {
    let app = common::create_test_app();
    let token = create_test_session("uid-bearer", &app.state.config.session_signing_key, 3600);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["uid"], "uid-bearer");
    assert!(json["email"].is_null());
}

#[tokio::test]
async fn test_protected_route_with_expired_session() {
    let app = common::create_test_app();
    let token = create_test_session("uid-old", &app.state.config.session_signing_key, -3600);

    let response = app
        .router
        .oneshot(get_request("/api/me", Some(&format!("__session={token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_without_session() {
    for uri in ["/health", "/api/alerts", "/api/alerts/map", "/api/options"] {
        let app = common::create_test_app();

        let response = app.router.oneshot(get_request(uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/alerts")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/alerts")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

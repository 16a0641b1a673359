// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.
//!
//! The page policy allows Mapbox origins for the alert map and Firebase
//! origins for the sign-in popup; everything else is same-origin.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Pages load the map library and the Firebase sign-in popup.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' https://apis.google.com https://api.mapbox.com; \
     style-src 'self' 'unsafe-inline' https://api.mapbox.com; \
     img-src 'self' data: blob: https:; \
     connect-src 'self' https://*.googleapis.com https://api.mapbox.com https://events.mapbox.com; \
     worker-src blob:; \
     frame-src https://*.firebaseapp.com; \
     frame-ancestors 'none'";

/// The create form reads the device location.
const PERMISSIONS_POLICY: &str = "accelerometer=(), camera=(), geolocation=(self), gyroscope=(), \
     magnetometer=(), microphone=(), payment=(), usb=()";

/// Add security headers to all responses.
pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static(PERMISSIONS_POLICY),
    );

    response
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page redirect rules.
//!
//! Only the presence of the session cookie matters here; the session
//! itself is checked by the API.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::auth::SESSION_COOKIE;

pub const ROOT_ROUTE: &str = "/";
pub const ALERTS_ROUTE: &str = "/alerts";
pub const CREATE_ALERT_ROUTE: &str = "/alert";
pub const MY_VOLUNTEERING_ROUTE: &str = "/my-volunteering";

/// Pages that need a signed-in identity.
pub const PROTECTED_ROUTES: [&str; 2] = [CREATE_ALERT_ROUTE, MY_VOLUNTEERING_ROUTE];

/// Redirect target for `path`, if any.
pub fn guard(path: &str, session_present: bool) -> Option<&'static str> {
    let path = match path.trim_end_matches('/') {
        "" => ROOT_ROUTE,
        trimmed => trimmed,
    };

    if !session_present && PROTECTED_ROUTES.contains(&path) {
        return Some(ROOT_ROUTE);
    }
    if session_present && path == ROOT_ROUTE {
        return Some(ROOT_ROUTE);
    }
    None
}

/// Apply [`guard`] before serving a page.
///
/// A redirect back to the requested path is skipped so the landing page
/// still loads for signed-in users.
pub async fn route_guard(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let session_present = CookieJar::from_headers(request.headers())
        .get(SESSION_COOKIE)
        .is_some_and(|c| !c.value().is_empty());

    if let Some(target) = guard(path, session_present) {
        if target != path {
            tracing::debug!(path, target, "Route guard redirect");
            return Redirect::temporary(target).into_response();
        }
    }

    next.run(request).await
}

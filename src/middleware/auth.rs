// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication.
//!
//! A session is an HS256 JWT issued after a Firebase ID token has been
//! verified. It travels in the `__session` cookie or as a Bearer token.

use crate::error::AppError;
use crate::models::Identity;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "__session";

/// Session lifetime (5 days).
pub const SESSION_TTL_SECS: u64 = 5 * 24 * 60 * 60;

/// Session JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Firebase uid)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Create a session token for a verified identity.
pub fn create_session_token(identity: &Identity, signing_key: &[u8]) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: identity.uid.clone(),
        name: identity.display_name.clone(),
        email: identity.email.clone(),
        picture: identity.photo_url.clone(),
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Map a session token to an identity. Invalid or expired means signed out.
pub fn resolve_session(token: &str, signing_key: &[u8]) -> Option<Identity> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = match decode::<Claims>(token, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            return None;
        }
    };

    if claims.sub.is_empty() {
        return None;
    }

    Some(Identity {
        uid: claims.sub,
        email: claims.email,
        display_name: claims.name,
        photo_url: claims.picture,
    })
}

/// Session token from the cookie, falling back to a Bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Identity for the request, or `None` when signed out.
pub fn identity_from_headers(headers: &HeaderMap, signing_key: &[u8]) -> Option<Identity> {
    session_token(headers).and_then(|token| resolve_session(&token, signing_key))
}

/// Middleware that requires a valid session.
///
/// Inserts the resolved [`Identity`] as a request extension.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = identity_from_headers(request.headers(), &state.config.session_signing_key)
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extractor for routes readable both signed in and signed out.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequestParts<Arc<AppState>> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(Self(Some(identity.clone())));
        }

        Ok(Self(identity_from_headers(
            &parts.headers,
            &state.config.session_signing_key,
        )))
    }
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Expired session cookie with the same attributes as [`session_cookie`].
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const KEY: &[u8] = b"test_session_key_32_bytes_long!!";

    fn dana() -> Identity {
        Identity {
            uid: "uid-dana".to_string(),
            email: Some("dana@example.com".to_string()),
            display_name: Some("Dana".to_string()),
            photo_url: None,
        }
    }

    #[test]
    fn test_session_round_trip_keeps_identity() {
        let token = create_session_token(&dana(), KEY).unwrap();
        assert_eq!(resolve_session(&token, KEY), Some(dana()));
    }

    #[test]
    fn test_invalid_sessions_resolve_to_none() {
        let token = create_session_token(&dana(), KEY).unwrap();
        assert_eq!(resolve_session(&token, b"some_other_key_that_is_32_bytes!"), None);
        assert_eq!(resolve_session("garbage", KEY), None);
        assert_eq!(resolve_session("", KEY), None);
    }

    #[test]
    fn test_expired_session_resolves_to_none() {
        let claims = Claims {
            sub: "uid-dana".to_string(),
            name: None,
            email: None,
            picture: None,
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();
        assert_eq!(resolve_session(&token, KEY), None);
    }

    #[test]
    fn test_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::COOKIE, HeaderValue::from_static("__session=xyz; other=1"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), true).to_string();
        assert!(cookie.starts_with("__session=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=432000"));

        let expired = expired_session_cookie(false).to_string();
        assert!(expired.contains("Max-Age=0"));
        assert!(!expired.contains("Secure"));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, route guard, security headers).

pub mod auth;
pub mod route_guard;
pub mod security;

pub use auth::{require_auth, MaybeIdentity};
pub use route_guard::route_guard;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "sumanize_session";

/// Build the session cookie set at login.
///
/// `HttpOnly`, `Path=/`, `Secure` outside development, `Max-Age` matching
/// the session TTL.
pub fn session_cookie(
    credential: &str,
    max_age: std::time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, credential.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age.as_secs() as i64))
        .build()
}

/// Build the removal cookie set at logout: empty value, already expired.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

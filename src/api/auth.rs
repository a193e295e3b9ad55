// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Login and logout routes.
//!
//! Login finishes the external OAuth flow: the provider's code is exchanged
//! for a verified profile, a session credential is issued, the session is
//! recorded live, and the cookie is set. The profile record is persisted
//! through the sync queue rather than inline.
//!
//! Logout revokes the cache entry and overwrites the cookie with an empty,
//! already-expired value. The credential itself stays cryptographically
//! valid until it expires; revocation is what ends the session.

use axum::{
    extract::{Query, State},
    response::{Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::cookies::{clear_session_cookie, session_cookie, SESSION_COOKIE};
use crate::auth::middleware::SIGN_IN_PATH;
use crate::models::UserProfile;
use crate::state::AppState;
use crate::sync::SyncJob;

/// Where a fresh session lands.
const LOGIN_REDIRECT: &str = "/dashboard";

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn login_error(code: &str) -> Response {
    use axum::response::IntoResponse;
    Redirect::to(&format!("{SIGN_IN_PATH}?error={code}")).into_response()
}

/// OAuth callback: complete the login.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), Response> {
    if let Some(error) = &params.error {
        let description = params.error_description.as_deref().unwrap_or("unknown");
        tracing::warn!(error = %error, description = %description, "provider returned an error");
        return Err(login_error("provider_error"));
    }

    let code = params.code.ok_or_else(|| login_error("missing_code"))?;

    let profile = state.provider.exchange(&code).await.map_err(|err| {
        tracing::warn!(error = %err, "code exchange failed");
        login_error("exchange_failed")
    })?;

    let ttl = state.config.session_ttl;

    let credential = state
        .codec
        .issue(&profile.sub, &profile.email, ttl)
        .map_err(|err| {
            tracing::error!(error = %err, "credential issuance failed");
            login_error("session_failed")
        })?;

    // Without the cache entry the credential is worthless, so a cache
    // failure here fails the whole login.
    state
        .sessions
        .mark_live(&profile.sub, ttl)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "session cache write failed during login");
            login_error("session_failed")
        })?;

    state
        .sync
        .enqueue(SyncJob::UpsertProfile(UserProfile {
            user_id: profile.sub.clone(),
            email: profile.email,
            display_name: profile.name,
            updated_at: Utc::now(),
        }))
        .await;

    tracing::info!(user_id = %profile.sub, "login completed");

    let cookie = session_cookie(&credential, ttl, state.config.secure_cookies);
    Ok((jar.add(cookie), Redirect::to(LOGIN_REDIRECT)))
}

/// Logout: revoke the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(claims) = state.codec.verify(cookie.value()) {
            if let Err(err) = state.sessions.revoke(&claims.sub).await {
                tracing::warn!(error = %err, "session revocation failed during logout");
            } else {
                tracing::info!(user_id = %claims.sub, "logout completed");
            }
        }
    }

    (jar.add(clear_session_cookie()), Redirect::to("/"))
}

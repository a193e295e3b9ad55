// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Axum extractors for authenticated identities.
//!
//! Use the `Auth` extractor in handlers that require a session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is the authenticated Identity
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::Identity;
use super::error::AuthError;
use super::gate::Verdict;
use crate::state::AppState;

/// Extractor requiring an authenticated identity.
///
/// Reads the verdict the gate middleware stored on the request; when the
/// extractor is used without the middleware it runs the gate directly.
/// Rejection is always the uniform unauthenticated response.
pub struct Auth(pub Identity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(verdict) = parts.extensions.get::<Verdict>() {
            return match verdict {
                Verdict::Authenticated(identity) => Ok(Auth(identity.clone())),
                // The gate already logged the real failure kind.
                Verdict::Anonymous => Err(AuthError::MissingCredential),
            };
        }

        state.gate.authorize(parts).await.map(Auth)
    }
}

/// Optional variant: `None` instead of a rejection when no valid session is
/// present. For endpoints serving both signed-in and anonymous users.
pub struct OptionalAuth(pub Option<Identity>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(identity)) => Ok(OptionalAuth(Some(identity))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Authentication failure taxonomy.
//!
//! Five internal failure kinds, one external outcome. Every variant renders
//! as the same `401 Unauthorized` body so a caller probing credentials
//! cannot learn which check rejected them. The kind is only recorded in
//! operator logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::session::CacheError;

/// Why a request failed to authenticate.
///
/// Callers treat every variant identically (session invalid). The
/// distinction exists for diagnostics only.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No cookie and no bearer header were presented.
    #[error("no credential presented")]
    MissingCredential,
    /// The token signature did not verify, or the token was malformed.
    #[error("credential signature rejected")]
    InvalidSignature,
    /// The token's embedded expiration is in the past.
    #[error("credential expired")]
    Expired,
    /// The token verified but the session cache has no live entry.
    #[error("session revoked or not live")]
    RevokedOrNotLive,
    /// The session cache could not be reached. Fails closed.
    #[error("session cache unavailable: {0}")]
    CacheUnavailable(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Map a cache failure into the taxonomy.
    pub fn cache(err: CacheError) -> Self {
        AuthError::CacheUnavailable(err.to_string())
    }

    /// Record the failure for operators.
    ///
    /// `CacheUnavailable` signals infrastructure degradation rather than a
    /// bad credential and is the only kind worth a warning.
    pub fn log(&self) {
        match self {
            AuthError::CacheUnavailable(reason) => {
                tracing::warn!(%reason, "session cache unavailable, failing closed");
            }
            other => {
                tracing::debug!(kind = %other, "request not authenticated");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        // One uniform body for every kind.
        let body = Json(AuthErrorBody {
            error: "unauthenticated",
            error_code: "unauthenticated",
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

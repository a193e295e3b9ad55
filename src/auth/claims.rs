// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Session token claims and the identity they decode to.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a Sumanize session token.
///
/// Deliberately minimal: the token proves identity and carries an
/// expiration. Everything else about the user lives in the profile store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: opaque user id assigned by the identity provider.
    pub sub: String,
    /// Email recorded at login.
    pub email: String,
    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,
    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

/// The authenticated identity attached to a request.
///
/// Produced by the authorization gate after the token has verified and the
/// session is confirmed live. This is the type handlers consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Canonical user id (the token `sub` claim).
    pub user_id: String,
    /// Email recorded at login.
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

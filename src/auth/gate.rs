// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Authorization gate: the per-request authentication decision.
//!
//! Given the parts of an incoming request, the gate extracts a candidate
//! credential, verifies it with the token codec, confirms liveness against
//! the session cache, slides the cache TTL, and produces a [`Verdict`].
//!
//! Precedence is fixed: the session cookie is checked first and the bearer
//! header is the fallback when no cookie is present. The two sources are
//! never merged; a present-but-bad cookie is not rescued by a valid header.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, request::Parts};
use axum_extra::extract::cookie::CookieJar;

use super::claims::Identity;
use super::cookies::SESSION_COOKIE;
use super::error::AuthError;
use super::session::SessionCache;
use super::token::TokenCodec;

/// Path prefixes reachable without a session (sign-in pages and the
/// authentication API namespace).
const ALLOWED_PREFIXES: [&str; 2] = ["/auth/", "/api/auth/"];

/// Path prefixes that require an authenticated session.
const PROTECTED_PREFIXES: [&str; 5] =
    ["/dashboard", "/account", "/chat", "/premium", "/settings"];

/// Classify a request path: does it require an authenticated session?
///
/// Unlisted paths default to allowed. Only the protected prefixes fail
/// closed; everything else is navigable and handlers enforce their own
/// authentication.
pub fn route_requires_auth(path: &str) -> bool {
    if ALLOWED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return false;
    }
    PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// The per-request authentication decision. Derived for each request,
/// never cached.
#[derive(Debug, Clone)]
pub enum Verdict {
    Authenticated(Identity),
    Anonymous,
}

impl Verdict {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Verdict::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Verdict::Authenticated(identity) => Some(identity),
            Verdict::Anonymous => None,
        }
    }
}

/// Validates credentials against the codec and the session cache.
#[derive(Clone)]
pub struct AuthGate {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionCache>,
    session_ttl: Duration,
}

impl AuthGate {
    pub fn new(
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionCache>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            sessions,
            session_ttl,
        }
    }

    /// Authorize a request, returning the authenticated identity or the
    /// failure kind.
    ///
    /// Without a candidate credential the cache is never touched. A valid
    /// signature does not outrank revocation: a missing cache entry denies
    /// the request. On success the cache TTL is slid forward.
    pub async fn authorize(&self, parts: &Parts) -> Result<Identity, AuthError> {
        let credential =
            Self::extract_credential(parts).ok_or(AuthError::MissingCredential)?;

        let claims = self.codec.verify(&credential)?;

        let live = self
            .sessions
            .is_live(&claims.sub)
            .await
            .map_err(AuthError::cache)?;
        if !live {
            return Err(AuthError::RevokedOrNotLive);
        }

        self.sessions
            .extend(&claims.sub, self.session_ttl)
            .await
            .map_err(AuthError::cache)?;

        Ok(Identity::from(claims))
    }

    /// [`authorize`](Self::authorize) collapsed to the externally visible
    /// outcome, with the failure kind logged for operators.
    pub async fn verdict(&self, parts: &Parts) -> Verdict {
        match self.authorize(parts).await {
            Ok(identity) => Verdict::Authenticated(identity),
            Err(err) => {
                err.log();
                Verdict::Anonymous
            }
        }
    }

    /// Extract the candidate credential: named cookie first, bearer header
    /// as the fallback.
    fn extract_credential(parts: &Parts) -> Option<String> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            // An empty value is the logout overwrite, not a credential.
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }

        parts
            .headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
    }
}

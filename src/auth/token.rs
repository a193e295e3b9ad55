// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Token codec: issues and verifies signed session credentials.
//!
//! Credentials are HS256 JWTs signed with a single process-wide secret.
//! The secret is injected at construction and read-only thereafter.

use std::time::Duration;

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::Claims;
use super::error::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Creates and verifies signed, time-limited session credentials.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the process-wide signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a signed credential for `identity`, expiring `ttl` from now.
    ///
    /// Serialization only. Recording the session as live is the caller's
    /// responsibility.
    pub fn issue(
        &self,
        identity: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: identity.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a credential and return its claims.
    ///
    /// An expired token fails with [`AuthError::Expired`]; every other
    /// decode failure collapses to [`AuthError::InvalidSignature`]. Callers
    /// treat both identically.
    pub fn verify(&self, credential: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(credential, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            })
    }
}

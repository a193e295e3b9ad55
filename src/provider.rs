// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Identity provider collaborator.
//!
//! The OAuth dance happens elsewhere; this module only exchanges the
//! authorization code the provider handed the browser for a verified
//! profile, in one opaque call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider rejected the authorization code")]
    Rejected,
}

/// The verified profile returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Stable subject identifier; becomes the session identity.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<Profile, ProviderError>;
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    code: &'a str,
}

/// HTTP [`IdentityProvider`] against the configured token endpoint.
pub struct HttpIdentityProvider {
    token_url: Url,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(token_url: Url) -> Self {
        Self {
            token_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange(&self, code: &str) -> Result<Profile, ProviderError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .timeout(REQUEST_TIMEOUT)
            .json(&ExchangeRequest { code })
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "code exchange rejected");
            return Err(ProviderError::Rejected);
        }

        response.json().await.map_err(|_| ProviderError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_without_a_name() {
        let profile: Profile =
            serde_json::from_str(r#"{"sub":"user_123","email":"user@example.com"}"#).unwrap();
        assert_eq!(profile.sub, "user_123");
        assert!(profile.name.is_none());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

use std::sync::Arc;

use crate::auth::{AuthGate, SessionCache, TokenCodec};
use crate::config::AppConfig;
use crate::provider::IdentityProvider;
use crate::store::SharedStore;
use crate::summarizer::Summarizer;
use crate::sync::SyncHandle;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: AuthGate,
    pub codec: Arc<TokenCodec>,
    pub sessions: Arc<dyn SessionCache>,
    pub store: SharedStore,
    pub summarizer: Arc<dyn Summarizer>,
    pub provider: Arc<dyn IdentityProvider>,
    pub sync: SyncHandle,
}

impl AppState {
    /// Assemble the state. The token codec and gate are derived here from
    /// the injected configuration; the signing secret never lives anywhere
    /// else.
    pub fn new(
        config: AppConfig,
        sessions: Arc<dyn SessionCache>,
        summarizer: Arc<dyn Summarizer>,
        provider: Arc<dyn IdentityProvider>,
        store: SharedStore,
        sync: SyncHandle,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(config.jwt_secret.as_bytes()));
        let gate = AuthGate::new(codec.clone(), sessions.clone(), config.session_ttl);

        Self {
            config: Arc::new(config),
            gate,
            codec,
            sessions,
            store,
            summarizer,
            provider,
            sync,
        }
    }
}

#[cfg(test)]
mod test_support {
    use super::*;
    use crate::auth::MemorySessionCache;
    use crate::models::SummarySource;
    use crate::provider::{Profile, ProviderError};
    use crate::summarizer::SummarizeError;
    use async_trait::async_trait;

    /// Summarizer double returning a fixed markdown body.
    pub struct FixedSummarizer;

    #[async_trait]
    impl crate::summarizer::Summarizer for FixedSummarizer {
        async fn summarize(
            &self,
            _: SummarySource,
            content: &str,
        ) -> Result<String, SummarizeError> {
            Ok(format!("## Summary\n\n{content}"))
        }
    }

    /// Provider double accepting any code for a fixed user.
    pub struct FixedProvider;

    #[async_trait]
    impl IdentityProvider for FixedProvider {
        async fn exchange(&self, code: &str) -> Result<Profile, ProviderError> {
            if code == "bad-code" {
                return Err(ProviderError::Rejected);
            }
            Ok(Profile {
                sub: "user_123".to_string(),
                email: "user@example.com".to_string(),
                name: Some("Test User".to_string()),
            })
        }
    }

    impl AppState {
        /// State wired to in-memory doubles; the sync queue has no worker,
        /// its receiver is dropped.
        pub fn for_tests() -> Self {
            let (sync, _rx) = crate::sync::test_handle();
            AppState::new(
                AppConfig::for_tests(),
                Arc::new(MemorySessionCache::default()),
                Arc::new(FixedSummarizer),
                Arc::new(FixedProvider),
                crate::store::shared(),
                sync,
            )
        }

        /// Like [`for_tests`](Self::for_tests) but keeps the queue receiver
        /// so tests can assert on enqueued jobs.
        pub fn for_tests_with_sync() -> (Self, tokio::sync::mpsc::Receiver<crate::sync::SyncJob>) {
            let (sync, rx) = crate::sync::test_handle();
            let state = AppState::new(
                AppConfig::for_tests(),
                Arc::new(MemorySessionCache::default()),
                Arc::new(FixedSummarizer),
                Arc::new(FixedProvider),
                crate::store::shared(),
                sync,
            );
            (state, rx)
        }
    }
}

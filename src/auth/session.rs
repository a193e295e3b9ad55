// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Session cache: the key-value liveness record behind every session.
//!
//! A signed token alone is not enough to be authenticated. The cache holds
//! one entry per identity meaning "this identity currently has a live
//! session"; deleting the entry revokes the session regardless of token
//! validity. Entries carry a sliding TTL refreshed on every successful
//! validation.
//!
//! The same store also tracks the per-identity summarization usage counter,
//! reset by natural key expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Default session lifetime: 7 days.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A session cache operation could not reach the store.
///
/// Callers never propagate this as a fatal fault: the gate maps it to an
/// unauthenticated verdict (fail closed) and quota checks deny the request.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("session cache unreachable: {0}")]
    Unavailable(String),
}

/// Key-value store recording which identities have a live session.
///
/// Every operation is single-key and idempotent, so concurrent requests for
/// the same identity may race with last-write-wins semantics and no
/// cross-key transaction is ever required.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Record that `identity` has a live session, valid for `ttl`.
    /// Overwrites any prior TTL.
    async fn mark_live(&self, identity: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Whether `identity` currently has a live session. A missing entry is
    /// `false`; existence reveals no payload.
    async fn is_live(&self, identity: &str) -> Result<bool, CacheError>;

    /// Reset the TTL without altering existence. A missing entry stays
    /// missing.
    async fn extend(&self, identity: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete the entry. Revoking a non-existent entry is not an error.
    async fn revoke(&self, identity: &str) -> Result<(), CacheError>;

    /// Increment the usage counter for `identity` and return the new count.
    /// The counter expires `window` after its first increment.
    async fn incr_usage(&self, identity: &str, window: Duration) -> Result<u32, CacheError>;
}

struct UsageWindow {
    count: u32,
    resets_at: Instant,
}

/// In-process [`SessionCache`] over `tokio` locks.
///
/// Entries past their deadline read as absent; stale map slots are dropped
/// lazily on the next touch of the same key.
#[derive(Default)]
pub struct MemorySessionCache {
    live: RwLock<HashMap<String, Instant>>,
    usage: RwLock<HashMap<String, UsageWindow>>,
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn mark_live(&self, identity: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut live = self.live.write().await;
        live.insert(identity.to_string(), Instant::now() + ttl);
        Ok(())
    }

    async fn is_live(&self, identity: &str) -> Result<bool, CacheError> {
        let mut live = self.live.write().await;
        match live.get(identity) {
            Some(deadline) if *deadline > Instant::now() => Ok(true),
            Some(_) => {
                live.remove(identity);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn extend(&self, identity: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut live = self.live.write().await;
        let now = Instant::now();
        match live.get_mut(identity) {
            Some(deadline) if *deadline > now => *deadline = now + ttl,
            Some(_) => {
                live.remove(identity);
            }
            None => {}
        }
        Ok(())
    }

    async fn revoke(&self, identity: &str) -> Result<(), CacheError> {
        self.live.write().await.remove(identity);
        Ok(())
    }

    async fn incr_usage(&self, identity: &str, window: Duration) -> Result<u32, CacheError> {
        let mut usage = self.usage.write().await;
        let now = Instant::now();
        let entry = usage.entry(identity.to_string()).or_insert(UsageWindow {
            count: 0,
            resets_at: now + window,
        });
        if entry.resets_at <= now {
            entry.count = 0;
            entry.resets_at = now + window;
        }
        entry.count += 1;
        Ok(entry.count)
    }
}

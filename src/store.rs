// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! In-process store for summary history and user profiles.
//!
//! Writes arrive through the sync queue; reads are served directly from
//! request handlers. Both paths are upserts keyed by id with last-write-wins
//! semantics, so replaying a queued job is harmless.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::models::{Summary, UserProfile};

/// Shared handle to the store.
pub type SharedStore = Arc<RwLock<InMemoryStore>>;

pub fn shared() -> SharedStore {
    Arc::new(RwLock::new(InMemoryStore::new()))
}

#[derive(Default)]
pub struct InMemoryStore {
    summaries: HashMap<String, Summary>,
    profiles: HashMap<String, UserProfile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a summary record.
    pub fn upsert_summary(&mut self, summary: Summary) {
        self.summaries.insert(summary.id.clone(), summary);
    }

    /// All summaries owned by `user_id`, newest first.
    pub fn list_summaries(&self, user_id: &str) -> Vec<Summary> {
        let mut summaries: Vec<Summary> = self
            .summaries
            .values()
            .filter(|summary| summary.user_id == user_id)
            .cloned()
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Delete a summary owned by `user_id`.
    ///
    /// A summary owned by someone else reads as not found, so ids cannot be
    /// probed across accounts.
    pub fn delete_summary(&mut self, user_id: &str, summary_id: &str) -> Result<(), ApiError> {
        match self.summaries.get(summary_id) {
            Some(summary) if summary.user_id == user_id => {
                self.summaries.remove(summary_id);
                Ok(())
            }
            _ => Err(ApiError::not_found("Summary not found")),
        }
    }

    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).cloned()
    }

    /// Insert or replace a profile record (last write wins).
    pub fn upsert_profile(&mut self, profile: UserProfile) {
        self.profiles.insert(profile.user_id.clone(), profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummarySource;
    use chrono::{TimeZone, Utc};

    fn summary(id: &str, user_id: &str, minute: u32) -> Summary {
        Summary {
            id: id.to_string(),
            user_id: user_id.to_string(),
            source: SummarySource::Text,
            markdown: "## Summary".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn list_filters_by_owner_and_sorts_newest_first() {
        let mut store = InMemoryStore::new();
        store.upsert_summary(summary("a", "user_1", 0));
        store.upsert_summary(summary("b", "user_1", 5));
        store.upsert_summary(summary("c", "user_2", 3));

        let listed = store.list_summaries("user_1");
        assert_eq!(
            listed.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
    }

    #[test]
    fn delete_requires_ownership() {
        let mut store = InMemoryStore::new();
        store.upsert_summary(summary("a", "user_1", 0));

        let err = store.delete_summary("user_2", "a").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);

        store.delete_summary("user_1", "a").unwrap();
        assert!(store.list_summaries("user_1").is_empty());
    }

    #[test]
    fn delete_missing_summary_is_not_found() {
        let mut store = InMemoryStore::new();
        let err = store.delete_summary("user_1", "missing").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn profile_upsert_replaces_the_record() {
        let mut store = InMemoryStore::new();
        let first = UserProfile {
            user_id: "user_1".to_string(),
            email: "old@example.com".to_string(),
            display_name: None,
            updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        let second = UserProfile {
            email: "new@example.com".to_string(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
            ..first.clone()
        };

        store.upsert_profile(first);
        store.upsert_profile(second.clone());

        assert_eq!(store.profile("user_1"), Some(second));
    }
}

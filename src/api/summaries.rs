// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Summarization and history routes.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{SummarizeRequest, Summary};
use crate::state::AppState;
use crate::sync::SyncJob;

/// Usage counters expire a day after their first increment.
const USAGE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = SummarizeRequest,
    tag = "Summaries",
    responses(
        (status = 201, body = Summary),
        (status = 400, description = "Invalid submission"),
        (status = 401, description = "Not authenticated"),
        (status = 429, description = "Daily quota exhausted"),
        (status = 502, description = "Summarizer unavailable")
    )
)]
pub async fn summarize(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<SummarizeRequest>,
) -> Result<(StatusCode, Json<Summary>), ApiError> {
    request.validate()?;

    // Count the attempt before spending a summarizer call. A cache outage
    // denies the request rather than granting unmetered usage.
    let used = state
        .sessions
        .incr_usage(&identity.user_id, USAGE_WINDOW)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "usage tracking unavailable");
            ApiError::unavailable("usage tracking unavailable, try again later")
        })?;

    if used > state.config.daily_quota {
        return Err(ApiError::too_many_requests("daily summary limit reached"));
    }

    let markdown = state
        .summarizer
        .summarize(request.source, &request.content)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "summarizer call failed");
            ApiError::bad_gateway("summarizer unavailable")
        })?;

    let summary = Summary {
        id: Uuid::new_v4().to_string(),
        user_id: identity.user_id,
        source: request.source,
        markdown,
        created_at: Utc::now(),
    };

    state
        .sync
        .enqueue(SyncJob::RecordSummary(summary.clone()))
        .await;

    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/summaries",
    tag = "Summaries",
    responses((status = 200, body = [Summary]), (status = 401, description = "Not authenticated"))
)]
pub async fn list_summaries(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Json<Vec<Summary>> {
    let store = state.store.read().await;
    Json(store.list_summaries(&identity.user_id))
}

#[utoipa::path(
    delete,
    path = "/api/summaries/{summary_id}",
    params(
        ("summary_id" = String, Path, description = "Identifier of the summary to delete")
    ),
    tag = "Summaries",
    responses((status = 204), (status = 404), (status = 401, description = "Not authenticated"))
)]
pub async fn delete_summary(
    Path(summary_id): Path<String>,
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_summary(&identity.user_id, &summary_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::models::SummarySource;

    fn identity() -> Identity {
        Identity {
            user_id: "user_123".to_string(),
            email: "user@example.com".to_string(),
        }
    }

    fn request(content: &str) -> Json<SummarizeRequest> {
        Json(SummarizeRequest {
            source: SummarySource::Text,
            content: content.to_string(),
        })
    }

    #[tokio::test]
    async fn summarize_returns_markdown_and_enqueues_history() {
        let (state, mut sync_rx) = AppState::for_tests_with_sync();

        let (status, Json(summary)) = summarize(
            State(state),
            Auth(identity()),
            request("a long article about rust"),
        )
        .await
        .expect("summarization succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(summary.user_id, "user_123");
        assert!(summary.markdown.starts_with("## Summary"));

        let job = sync_rx.try_recv().expect("history job enqueued");
        assert!(matches!(job, SyncJob::RecordSummary(s) if s.id == summary.id));
    }

    #[tokio::test]
    async fn summarize_rejects_empty_content() {
        let state = AppState::for_tests();
        let err = summarize(State(state), Auth(identity()), request("  "))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summarize_enforces_the_daily_quota() {
        let mut state = AppState::for_tests();
        {
            let config = std::sync::Arc::get_mut(&mut state.config).unwrap();
            config.daily_quota = 1;
        }

        summarize(State(state.clone()), Auth(identity()), request("first"))
            .await
            .expect("first call within quota");

        let err = summarize(State(state), Auth(identity()), request("second"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn quota_is_per_identity() {
        let mut state = AppState::for_tests();
        {
            let config = std::sync::Arc::get_mut(&mut state.config).unwrap();
            config.daily_quota = 1;
        }

        summarize(State(state.clone()), Auth(identity()), request("first"))
            .await
            .unwrap();

        let other = Identity {
            user_id: "user_456".to_string(),
            email: "other@example.com".to_string(),
        };
        summarize(State(state), Auth(other), request("first"))
            .await
            .expect("fresh identity has its own quota");
    }

    #[tokio::test]
    async fn list_returns_only_own_summaries() {
        let state = AppState::for_tests();
        {
            let mut store = state.store.write().await;
            store.upsert_summary(Summary {
                id: "a".to_string(),
                user_id: "user_123".to_string(),
                source: SummarySource::Text,
                markdown: "## Mine".to_string(),
                created_at: Utc::now(),
            });
            store.upsert_summary(Summary {
                id: "b".to_string(),
                user_id: "user_456".to_string(),
                source: SummarySource::Text,
                markdown: "## Not mine".to_string(),
                created_at: Utc::now(),
            });
        }

        let Json(summaries) = list_summaries(State(state), Auth(identity())).await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "a");
    }

    #[tokio::test]
    async fn delete_is_owner_scoped() {
        let state = AppState::for_tests();
        {
            let mut store = state.store.write().await;
            store.upsert_summary(Summary {
                id: "a".to_string(),
                user_id: "user_456".to_string(),
                source: SummarySource::Text,
                markdown: "## Not mine".to_string(),
                created_at: Utc::now(),
            });
        }

        let err = delete_summary(Path("a".to_string()), State(state), Auth(identity()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Account profile routes.
//!
//! The store is authoritative for profile data. Until the login sync job
//! lands, a fresh account has no stored record yet; reads fall back to a
//! minimal profile derived from the session identity. Updates merge only
//! the fields named in the request and persist through the sync queue with
//! last-write-wins semantics.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::auth::{Auth, Identity};
use crate::error::ApiError;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::state::AppState;
use crate::sync::SyncJob;

fn profile_or_default(stored: Option<UserProfile>, identity: &Identity) -> UserProfile {
    stored.unwrap_or_else(|| UserProfile {
        user_id: identity.user_id.clone(),
        email: identity.email.clone(),
        display_name: None,
        updated_at: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/api/account/profile",
    tag = "Account",
    responses((status = 200, body = UserProfile), (status = 401, description = "Not authenticated"))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Json<UserProfile> {
    let stored = state.store.read().await.profile(&identity.user_id);
    Json(profile_or_default(stored, &identity))
}

#[utoipa::path(
    put,
    path = "/api/account/profile",
    request_body = UpdateProfileRequest,
    tag = "Account",
    responses(
        (status = 200, body = UserProfile),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    request.validate()?;

    let stored = state.store.read().await.profile(&identity.user_id);
    let mut profile = profile_or_default(stored, &identity);

    if let Some(email) = request.email {
        profile.email = email;
    }
    if let Some(display_name) = request.display_name {
        profile.display_name = Some(display_name);
    }
    profile.updated_at = Utc::now();

    state
        .sync
        .enqueue(SyncJob::UpsertProfile(profile.clone()))
        .await;

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: "user_123".to_string(),
            email: "user@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn get_falls_back_to_the_session_identity() {
        let state = AppState::for_tests();
        let Json(profile) = get_profile(State(state), Auth(identity())).await;

        assert_eq!(profile.user_id, "user_123");
        assert_eq!(profile.email, "user@example.com");
        assert!(profile.display_name.is_none());
    }

    #[tokio::test]
    async fn get_prefers_the_stored_record() {
        let state = AppState::for_tests();
        state.store.write().await.upsert_profile(UserProfile {
            user_id: "user_123".to_string(),
            email: "stored@example.com".to_string(),
            display_name: Some("Stored".to_string()),
            updated_at: Utc::now(),
        });

        let Json(profile) = get_profile(State(state), Auth(identity())).await;
        assert_eq!(profile.email, "stored@example.com");
    }

    #[tokio::test]
    async fn update_merges_only_named_fields() {
        let (state, mut sync_rx) = AppState::for_tests_with_sync();
        state.store.write().await.upsert_profile(UserProfile {
            user_id: "user_123".to_string(),
            email: "stored@example.com".to_string(),
            display_name: Some("Stored".to_string()),
            updated_at: Utc::now(),
        });

        let Json(profile) = update_profile(
            State(state),
            Auth(identity()),
            Json(UpdateProfileRequest {
                display_name: Some("Renamed".to_string()),
                email: None,
            }),
        )
        .await
        .expect("update succeeds");

        // The unnamed field keeps its stored value.
        assert_eq!(profile.email, "stored@example.com");
        assert_eq!(profile.display_name.as_deref(), Some("Renamed"));

        let job = sync_rx.try_recv().expect("profile job enqueued");
        assert!(
            matches!(job, SyncJob::UpsertProfile(p) if p.display_name.as_deref() == Some("Renamed"))
        );
    }

    #[tokio::test]
    async fn update_rejects_a_bad_email() {
        let state = AppState::for_tests();
        let err = update_profile(
            State(state),
            Auth(identity()),
            Json(UpdateProfileRequest {
                email: Some("not-an-email".to_string()),
                display_name: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}

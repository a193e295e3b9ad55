// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::require_auth,
    models::{SummarizeRequest, Summary, SummarySource, UpdateProfileRequest, UserProfile},
    state::AppState,
};

pub mod account;
pub mod auth;
pub mod health;
pub mod summaries;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout).post(auth::logout))
        .route("/summarize", post(summaries::summarize))
        .route("/summaries", get(summaries::list_summaries))
        .route("/summaries/{summary_id}", delete(summaries::delete_summary))
        .route(
            "/account/profile",
            get(account::get_profile).put(account::update_profile),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn_with_state(state, require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        summaries::summarize,
        summaries::list_summaries,
        summaries::delete_summary,
        account::get_profile,
        account::update_profile,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Summary,
            SummarySource,
            SummarizeRequest,
            UserProfile,
            UpdateProfileRequest
        )
    ),
    tags(
        (name = "Summaries", description = "Summarization and history"),
        (name = "Account", description = "Profile management"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Gate middleware.
//!
//! Runs once per request, before any handler logic: classifies the path,
//! computes the authorization verdict, and short-circuits protected paths
//! to the sign-in redirect when the verdict is anonymous. The verdict is
//! stored in request extensions so extractors never re-run the gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::gate::route_requires_auth;
use crate::state::AppState;

/// Where anonymous visitors of protected pages are sent.
pub const SIGN_IN_PATH: &str = "/auth/sign-in";

/// Authorization middleware applied to the whole router.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let verdict = state.gate.verdict(&parts).await;

    if route_requires_auth(parts.uri.path()) && !verdict.is_authenticated() {
        return Redirect::to(SIGN_IN_PATH).into_response();
    }

    parts.extensions.insert(verdict);
    next.run(Request::from_parts(parts, body)).await
}

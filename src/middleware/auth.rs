// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gate for application pages.

use crate::auth::Freshness;
use crate::routes::Route;
use crate::views::login;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Route to the requested page when a usable session exists; otherwise
/// render the login view in its place.
///
/// An expired session whose refresh failed restarts sign-in directly.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    match state.bridge.ensure_fresh().await {
        Freshness::Fresh | Freshness::Refreshed => next.run(request).await,
        Freshness::Expired => {
            tracing::info!("Session expired, restarting sign-in");
            Redirect::to("/login").into_response()
        }
        Freshness::Missing => {
            tracing::debug!(
                route = ?Route::parse(request.uri().path()),
                "No session, showing login"
            );
            let phase = state.bridge.phase().await;
            let last_error = state.bridge.last_error().await;
            Html(login::render(phase, last_error.as_deref())).into_response()
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers and the routing shell.

pub mod activities;
pub mod auth;

use crate::middleware::auth::require_session;
use crate::AppState;
use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Application pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Activities,
    ActivityDetail(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Route::Root,
            "/activities" => Route::Activities,
            other => match other.strip_prefix("/activities/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::ActivityDetail(
                    urlencoding::decode(id)
                        .map(|id| id.into_owned())
                        .unwrap_or_else(|_| id.to_string()),
                ),
                _ => Route::NotFound,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Activities => "/activities".to_string(),
            Route::ActivityDetail(id) => format!("/activities/{}", urlencoding::encode(id)),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// The detail page deliberately hides the logout control.
    pub fn shows_logout(&self) -> bool {
        !matches!(self, Route::ActivityDetail(_))
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
    pub backend_reachable: bool,
}

/// Local liveness plus backend connectivity.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
        backend_reachable: state.activities.test_connection().await,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes());

    // Session-gated pages; unauthenticated visits get the login view,
    // including unknown paths.
    let protected_routes = activities::routes().layer(middleware::from_fn_with_state(
        state.clone(),
        require_session,
    ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

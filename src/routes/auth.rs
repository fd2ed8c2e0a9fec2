// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, provider callback and logout routes.

use crate::error::{AppError, Result};
use crate::routes::Route;
use crate::views::ActivitiesPage;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", post(logout))
}

/// Start the sign-in flow - redirect to the identity provider.
async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    if state.sessions.is_authenticated() {
        return Ok(Redirect::to(&Route::Activities.path()));
    }

    let auth_url = state.bridge.begin_login().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to start sign-in");
        AppError::Internal(anyhow::anyhow!("Failed to start sign-in: {}", e))
    })?;

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Provider redirect - exchange the code and publish the session.
///
/// Failures land on the login view, which shows the reason.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    if let Some(error) = params.error {
        state
            .bridge
            .fail_login(&error, params.error_description.as_deref())
            .await;
        return Redirect::to(&Route::Root.path());
    }

    let (Some(code), Some(oauth_state)) = (params.code, params.state) else {
        state
            .bridge
            .fail_login("invalid_request", Some("missing code or state"))
            .await;
        return Redirect::to(&Route::Root.path());
    };

    match state.bridge.complete_login(&code, &oauth_state).await {
        Ok(()) => Redirect::to(&Route::Activities.path()),
        Err(e) => {
            tracing::warn!(error = %e, "Authorization callback rejected");
            Redirect::to(&Route::Root.path())
        }
    }
}

/// Clear the session and drop page state belonging to it.
async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    state.bridge.logout().await;
    *state.activities_page.lock().await = ActivitiesPage::new();
    Redirect::to(&Route::Root.path())
}

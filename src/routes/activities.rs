// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity pages (require a session).
//! The session gate is applied in routes/mod.rs for these routes.

use super::Route;
use crate::error::{AppError, Result};
use crate::models::ActivityType;
use crate::views::{layout, ActivityDetailView, LoadState};
use crate::AppState;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/activities", get(activities_page).post(submit_activity))
        .route("/activities/{id}", get(activity_detail))
        .fallback(not_found)
}

fn signed_in_name(state: &AppState) -> Option<String> {
    state
        .sessions
        .current()
        .and_then(|s| s.display_name().map(str::to_string))
}

async fn root() -> Redirect {
    Redirect::to(&Route::Activities.path())
}

// ─── Activities (form + list) ────────────────────────────────

/// Render the form and a freshly loaded list.
async fn activities_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let ticket = {
        let mut page = state.activities_page.lock().await;
        page.enter();
        page.list.begin_load()
    };

    // The page lock is released while the backend call is outstanding.
    let result = match ticket {
        Some(ticket) => Some((ticket, state.activities.list_activities().await)),
        None => None,
    };

    let content = {
        let mut page = state.activities_page.lock().await;
        match result {
            None => page.render(),
            Some((ticket, result)) => {
                let own = LoadState::from(result.clone());
                if page.list.finish_load(ticket, result) {
                    page.render()
                } else {
                    // A newer load owns the list; answer with this one's result.
                    page.render_with_list(&own)
                }
            }
        }
    };
    Html(layout::shell(
        &Route::Activities,
        signed_in_name(&state).as_deref(),
        "Activities",
        &content,
    ))
}

/// Form fields as posted by the browser.
#[derive(Debug, Deserialize)]
pub struct ActivityFormInput {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, rename = "caloriesBurned")]
    pub calories_burned: String,
}

/// Submit the draft, then send the browser back to the page.
async fn submit_activity(
    State(state): State<Arc<AppState>>,
    Form(input): Form<ActivityFormInput>,
) -> Result<Redirect> {
    let activity_type: ActivityType = input
        .activity_type
        .parse()
        .map_err(|e: crate::error::ApiError| AppError::BadRequest(e.to_string()))?;

    let submission = {
        let mut page = state.activities_page.lock().await;
        page.form.set_type(activity_type);
        page.form.set_duration(&input.duration);
        page.form.set_calories_burned(&input.calories_burned);
        page.form.begin_submit()
    };

    match submission {
        Ok((ticket, request)) => {
            let result = state.activities.create_activity(&request).await;
            state
                .activities_page
                .lock()
                .await
                .form
                .finish_submit(ticket, result);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Activity not submitted");
        }
    }

    Ok(Redirect::to(&Route::Activities.path()))
}

// ─── Activity Detail ─────────────────────────────────────────

async fn activity_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Html<String> {
    state.activities_page.lock().await.leave();

    let mut view = ActivityDetailView::mount(&id);
    if let Some(ticket) = view.begin_load() {
        let result = state.activities.get_activity_detail(view.id()).await;
        view.finish_load(ticket, result);
    }

    Html(layout::shell(
        &Route::ActivityDetail(id),
        signed_in_name(&state).as_deref(),
        "Activity",
        &view.render(),
    ))
}

async fn not_found(State(state): State<Arc<AppState>>) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(layout::shell(
            &Route::NotFound,
            signed_in_name(&state).as_deref(),
            "Not found",
            "<div class=\"alert alert-info\">Page not found. \
             <a href=\"/activities\">Go to your activities</a></div>",
        )),
    )
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity list: one summary card per activity.

use super::layout::escape_html;
use super::theme::theme_for;
use super::{Lifecycle, LoadState, LoadTicket};
use crate::error::ApiError;
use crate::models::Activity;
use crate::routes::Route;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counter bumped whenever the list should reload.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal(Arc<AtomicU64>);

impl RefreshSignal {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct ActivityListView {
    lifecycle: Lifecycle,
    state: LoadState<Vec<Activity>>,
    refresh: RefreshSignal,
    /// Signal value the current content was requested for
    loaded_for: Option<u64>,
}

impl ActivityListView {
    pub fn new(refresh: RefreshSignal) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            state: LoadState::Loading,
            refresh,
            loaded_for: None,
        }
    }

    pub fn mount(&mut self) {
        if !self.lifecycle.is_mounted() {
            self.lifecycle.mount();
            self.state = LoadState::Loading;
            self.loaded_for = None;
        }
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn state(&self) -> &LoadState<Vec<Activity>> {
        &self.state
    }

    /// A ticket when a fetch is due: first load after mount, or the
    /// refresh signal moved since the last request.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.lifecycle.is_mounted() {
            return None;
        }
        let signal = self.refresh.current();
        if self.loaded_for == Some(signal) {
            return None;
        }
        self.loaded_for = Some(signal);
        self.state = LoadState::Loading;
        Some(self.lifecycle.begin())
    }

    /// Apply a fetch result. Returns false if it arrived too late.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Activity>, ApiError>,
    ) -> bool {
        if !self.lifecycle.accepts(&ticket) {
            tracing::debug!("Discarding stale activity list result");
            return false;
        }
        self.state = match result {
            Ok(activities) => {
                tracing::debug!(count = activities.len(), "Activities loaded");
                LoadState::Ready(activities)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching activities");
                LoadState::Failed(e.user_message())
            }
        };
        true
    }

    pub fn render(&self) -> String {
        render_state(&self.state)
    }
}

/// HTML for a list state, whether or not a view holds it.
pub fn render_state(state: &LoadState<Vec<Activity>>) -> String {
    match state {
        LoadState::Loading => {
            "<div class=\"placeholder\" id=\"activities-loading\">Loading activities...</div>"
                .to_string()
        }
        LoadState::Failed(message) => format!(
            "<div class=\"alert alert-error\" id=\"activities-error\">\
             Error loading activities: {}</div>",
            escape_html(message)
        ),
        LoadState::Ready(activities) if activities.is_empty() => {
            "<div class=\"alert alert-info\" id=\"activities-empty\">No activities found</div>"
                .to_string()
        }
        LoadState::Ready(activities) => {
            let cards: String = activities.iter().map(render_card).collect();
            format!("<section class=\"grid\" id=\"activities\">{}</section>", cards)
        }
    }
}

fn render_card(activity: &Activity) -> String {
    let theme = theme_for(activity.activity_type);
    let calories = match activity.calories_burned {
        Some(c) => format!("{} cal", c),
        None => "– cal".to_string(),
    };
    let duration = match activity.duration {
        Some(d) => format!("{} min", d),
        None => "– min".to_string(),
    };
    format!(
        "<a class=\"card activity-card\" style=\"--accent:{color}\" href=\"{href}\">\
         <h3>{icon} {label}</h3>\
         <p>{duration}</p><p>{calories}</p></a>",
        color = theme.color,
        href = escape_html(&Route::ActivityDetail(activity.id.clone()).path()),
        icon = theme.icon,
        label = escape_html(&activity.activity_type.label()),
        duration = duration,
        calories = calories,
    )
}

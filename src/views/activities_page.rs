// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `/activities`: the form and the list composed, sharing a refresh signal.

use super::activity_list::render_state;
use super::{ActivityFormView, ActivityListView, LoadState, RefreshSignal};
use crate::models::Activity;

pub struct ActivitiesPage {
    pub form: ActivityFormView,
    pub list: ActivityListView,
}

impl ActivitiesPage {
    pub fn new() -> Self {
        let refresh = RefreshSignal::default();
        let on_added = refresh.clone();
        Self {
            form: ActivityFormView::new(move |activity| {
                tracing::debug!(activity_id = %activity.id, "Activity added, refreshing list");
                on_added.bump();
            }),
            list: ActivityListView::new(refresh),
        }
    }

    /// Navigating to the page mounts the list afresh.
    pub fn enter(&mut self) {
        self.list.unmount();
        self.list.mount();
    }

    /// Navigating away; outstanding list loads are dropped on arrival.
    pub fn leave(&mut self) {
        self.list.unmount();
    }

    pub fn render(&mut self) -> String {
        let list = self.list.render();
        self.compose(list)
    }

    /// Render with a list state the view itself no longer holds, such as
    /// a result superseded by a newer load.
    pub fn render_with_list(&mut self, list: &LoadState<Vec<Activity>>) -> String {
        self.compose(render_state(list))
    }

    fn compose(&mut self, list: String) -> String {
        format!("<h1>Activities</h1>{}{}", self.form.render(), list)
    }
}

impl Default for ActivitiesPage {
    fn default() -> Self {
        Self::new()
    }
}

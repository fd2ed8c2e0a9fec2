// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity creation form.

use super::layout::escape_html;
use super::{Lifecycle, LoadTicket};
use crate::error::ApiError;
use crate::models::{Activity, ActivityDraft, ActivityType, CreateActivityRequest};

/// Types offered first in the picker; the rest follow in backend order.
const FEATURED_TYPES: [ActivityType; 4] = [
    ActivityType::Running,
    ActivityType::Cycling,
    ActivityType::Swimming,
    ActivityType::Weightlifting,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    Success(String),
    Error(String),
}

type ActivityAdded = Box<dyn Fn(&Activity) + Send + Sync>;

pub struct ActivityFormView {
    lifecycle: Lifecycle,
    draft: ActivityDraft,
    submitting: bool,
    notice: Option<FormNotice>,
    on_activity_added: ActivityAdded,
}

impl ActivityFormView {
    /// `on_activity_added` runs after a successful create.
    pub fn new(on_activity_added: impl Fn(&Activity) + Send + Sync + 'static) -> Self {
        let mut lifecycle = Lifecycle::default();
        lifecycle.mount();
        Self {
            lifecycle,
            draft: ActivityDraft::default(),
            submitting: false,
            notice: None,
            on_activity_added: Box::new(on_activity_added),
        }
    }

    pub fn draft(&self) -> &ActivityDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    /// Ignored while a submit is outstanding.
    pub fn set_type(&mut self, activity_type: ActivityType) {
        if !self.submitting {
            self.draft.activity_type = activity_type;
        }
    }

    pub fn set_duration(&mut self, value: &str) {
        if !self.submitting {
            self.draft.duration = value.to_string();
        }
    }

    pub fn set_calories_burned(&mut self, value: &str) {
        if !self.submitting {
            self.draft.calories_burned = value.to_string();
        }
    }

    /// Validate the draft and lock the form for the create call.
    ///
    /// Validation failures are recorded as the form's error notice and no
    /// ticket is issued, so nothing reaches the backend.
    pub fn begin_submit(&mut self) -> Result<(LoadTicket, CreateActivityRequest), ApiError> {
        if self.submitting {
            return Err(ApiError::Validation(
                "A submission is already in progress".to_string(),
            ));
        }

        let request = self.draft.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "Activity draft rejected");
            self.notice = Some(FormNotice::Error(e.user_message()));
        })?;

        self.submitting = true;
        self.notice = None;
        Ok((self.lifecycle.begin(), request))
    }

    /// Apply the create result. Returns false if it arrived too late.
    pub fn finish_submit(&mut self, ticket: LoadTicket, result: Result<Activity, ApiError>) -> bool {
        if !self.lifecycle.accepts(&ticket) {
            tracing::debug!("Discarding stale create result");
            return false;
        }
        self.submitting = false;

        match result {
            Ok(activity) => {
                self.notice = Some(FormNotice::Success(match activity.duration {
                    Some(minutes) => format!(
                        "Added {} ({} min)",
                        activity.activity_type.label(),
                        minutes
                    ),
                    None => format!("Added {}", activity.activity_type.label()),
                }));
                self.draft = ActivityDraft::default();
                (self.on_activity_added)(&activity);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error adding activity");
                self.notice = Some(FormNotice::Error(format!(
                    "Could not add activity: {}",
                    e.user_message()
                )));
            }
        }
        true
    }

    /// Render the form. The notice is shown once and then cleared.
    pub fn render(&mut self) -> String {
        let notice = match self.notice.take() {
            Some(FormNotice::Success(msg)) => format!(
                "<div class=\"alert alert-success\" id=\"form-success\">{}</div>",
                escape_html(&msg)
            ),
            Some(FormNotice::Error(msg)) => format!(
                "<div class=\"alert alert-error\" id=\"form-error\">{}</div>",
                escape_html(&msg)
            ),
            None => String::new(),
        };

        let options: String = FEATURED_TYPES
            .into_iter()
            .chain(
                ActivityType::ALL
                    .into_iter()
                    .filter(|t| !FEATURED_TYPES.contains(t)),
            )
            .map(|t| {
                format!(
                    "<option value=\"{}\"{}>{}</option>",
                    t.as_str(),
                    if t == self.draft.activity_type { " selected" } else { "" },
                    escape_html(&t.label())
                )
            })
            .collect();

        let disabled = if self.submitting { " disabled" } else { "" };

        format!(
            "<form class=\"card\" method=\"post\" action=\"/activities\" id=\"activity-form\">\
             {notice}\
             <fieldset{disabled} style=\"border:0;padding:0\">\
             <label>Activity Type<select name=\"type\">{options}</select></label>\
             <label>Duration (minutes)<input type=\"number\" min=\"1\" name=\"duration\" value=\"{duration}\"></label>\
             <label>Calories Burned<input type=\"number\" min=\"0\" name=\"caloriesBurned\" value=\"{calories}\"></label>\
             <button type=\"submit\"{disabled}>{button}</button>\
             </fieldset></form>",
            notice = notice,
            disabled = disabled,
            options = options,
            duration = escape_html(&self.draft.duration),
            calories = escape_html(&self.draft.calories_burned),
            button = if self.submitting { "Adding..." } else { "Add Activity" },
        )
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity detail with optional recommendation sections.

use super::layout::escape_html;
use super::theme::theme_for;
use super::{Lifecycle, LoadTicket};
use crate::error::ApiError;
use crate::models::Activity;
use crate::time_utils::format_timestamp;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Failed(String),
    NotFound,
    Ready(Box<Activity>),
}

pub struct ActivityDetailView {
    id: String,
    lifecycle: Lifecycle,
    state: DetailState,
}

impl ActivityDetailView {
    pub fn mount(id: &str) -> Self {
        let mut lifecycle = Lifecycle::default();
        lifecycle.mount();
        Self {
            id: id.trim().to_string(),
            lifecycle,
            state: DetailState::Loading,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    /// No ticket (and an error state) when there is no id to load.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.id.is_empty() {
            self.state = DetailState::Failed("Activity ID is required".to_string());
            return None;
        }
        self.state = DetailState::Loading;
        Some(self.lifecycle.begin())
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Activity, ApiError>) -> bool {
        if !self.lifecycle.accepts(&ticket) {
            tracing::debug!(activity_id = %self.id, "Discarding stale activity detail");
            return false;
        }
        self.state = match result {
            Ok(activity) => DetailState::Ready(Box::new(activity)),
            Err(e) if e.is_not_found() => DetailState::NotFound,
            Err(e) => DetailState::Failed(e.user_message()),
        };
        true
    }

    pub fn render(&self) -> String {
        match &self.state {
            DetailState::Loading => {
                "<div class=\"card placeholder\" id=\"detail-loading\">Loading activity details...</div>"
                    .to_string()
            }
            DetailState::Failed(message) => format!(
                "<div class=\"alert alert-error\" id=\"detail-error\">\
                 Error loading activity details: {}</div>",
                escape_html(message)
            ),
            DetailState::NotFound => format!(
                "<div class=\"alert alert-info\" id=\"detail-not-found\">\
                 No activity found with ID: {}</div>",
                escape_html(&self.id)
            ),
            DetailState::Ready(activity) => {
                let mut html = render_summary(activity);
                if let Some(rec) = render_recommendation(activity) {
                    html.push_str(&rec);
                }
                html.push_str("<p><a href=\"/activities\">&larr; Back to activities</a></p>");
                html
            }
        }
    }
}

fn render_summary(activity: &Activity) -> String {
    let theme = theme_for(activity.activity_type);
    let label = escape_html(&activity.activity_type.label());
    let calories = activity
        .calories_burned
        .map(|c| c.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let duration = activity
        .duration
        .map(|d| format!("{} minutes", d))
        .unwrap_or_else(|| "N/A".to_string());
    let date = activity
        .created_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "N/A".to_string());

    let metrics = if activity.additional_metrics.is_empty() {
        String::new()
    } else {
        let rows: String = activity
            .additional_metrics
            .iter()
            .map(|(key, value)| {
                format!(
                    "<li><strong>{}:</strong> {}</li>",
                    escape_html(&capitalize(key)),
                    escape_html(&display_value(value))
                )
            })
            .collect();
        format!("<h3>Additional Metrics</h3><ul id=\"metrics\">{}</ul>", rows)
    };

    format!(
        "<section class=\"card\" id=\"activity-detail\" style=\"--accent:{color}\">\
         <h2>{icon} Activity Details <span class=\"chip\">{label}</span></h2>\
         <p><strong>Type:</strong> {label}</p>\
         <p><strong>Duration:</strong> {duration}</p>\
         <p><strong>Calories Burned:</strong> {calories}</p>\
         <p><strong>Date:</strong> {date}</p>\
         {metrics}</section>",
        color = theme.color,
        icon = theme.icon,
        label = label,
        duration = duration,
        calories = calories,
        date = escape_html(&date),
        metrics = metrics,
    )
}

/// The card exists only with analysis text; each list section only when
/// it has entries.
fn render_recommendation(activity: &Activity) -> Option<String> {
    let analysis = activity.recommendation.as_deref().filter(|t| !t.trim().is_empty())?;

    let mut html = format!(
        "<section class=\"card\" id=\"recommendation\"><h2>AI Recommendation</h2>\
         <h3>Analysis</h3><p>{}</p>",
        escape_html(analysis)
    );
    for (id, title, items) in [
        ("improvements", "Improvements", &activity.improvements),
        ("suggestions", "Suggestions", &activity.suggestions),
        ("safety", "Safety Guidelines", &activity.safety),
    ] {
        if let Some(items) = items.as_ref().filter(|items| !items.is_empty()) {
            let list: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            html.push_str(&format!(
                "<hr><h3>{}</h3><ul class=\"{}\" id=\"{}\">{}</ul>",
                title, id, id, list
            ));
        }
    }
    html.push_str("</section>");
    Some(html)
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activity(extra: Value) -> Activity {
        let mut base = json!({
            "id": "a1", "type": "RUNNING", "duration": 30, "caloriesBurned": 250
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    fn ready(activity: Activity) -> ActivityDetailView {
        let mut view = ActivityDetailView::mount("a1");
        let ticket = view.begin_load().unwrap();
        assert!(view.finish_load(ticket, Ok(activity)));
        view
    }

    #[test]
    fn test_base_activity_without_recommendation() {
        let html = ready(activity(json!({}))).render();
        assert!(html.contains("30 minutes"));
        assert!(html.contains("<strong>Calories Burned:</strong> 250"));
        assert!(html.contains("<strong>Date:</strong> N/A"));
        assert!(!html.contains("id=\"recommendation\""));
        assert!(!html.contains("Additional Metrics"));
    }

    #[test]
    fn test_recommendation_sections_are_independent() {
        let html = ready(activity(json!({
            "recommendation": "Good pacing",
            "improvements": [],
            "suggestions": ["Try intervals"],
            "additionalMetrics": {"distance": 5.2, "route": "river"}
        })))
        .render();

        assert!(html.contains("Good pacing"));
        assert!(html.contains("id=\"suggestions\""));
        assert!(!html.contains("id=\"improvements\""));
        assert!(!html.contains("id=\"safety\""));
        assert!(html.contains("<strong>Distance:</strong> 5.2"));
        assert!(html.contains("<strong>Route:</strong> river"));
    }

    #[test]
    fn test_lists_without_analysis_render_nothing() {
        let html = ready(activity(json!({"safety": ["Hydrate"]}))).render();
        assert!(!html.contains("id=\"recommendation\""));
        assert!(!html.contains("Hydrate"));
    }

    #[test]
    fn test_error_and_not_found_states_differ() {
        let mut view = ActivityDetailView::mount("missing");
        let ticket = view.begin_load().unwrap();
        view.finish_load(ticket, Err(ApiError::ClientError(404)));
        assert_eq!(view.state(), &DetailState::NotFound);
        assert!(view.render().contains("No activity found with ID: missing"));

        let mut view = ActivityDetailView::mount("a1");
        let ticket = view.begin_load().unwrap();
        view.finish_load(ticket, Err(ApiError::Timeout));
        assert!(view.render().contains("id=\"detail-error\""));

        let mut view = ActivityDetailView::mount("  ");
        assert!(view.begin_load().is_none());
        assert!(view.render().contains("Activity ID is required"));
    }

    #[test]
    fn test_escapes_backend_text() {
        let html = ready(activity(json!({"recommendation": "<b>bold</b>"}))).render();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}

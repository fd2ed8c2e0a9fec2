// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity access functions over the backend API.

use crate::error::ApiError;
use crate::models::{Activity, CreateActivityRequest, Recommendation};
use crate::services::http::ApiClient;

/// Typed calls for the activity and recommendation endpoints.
#[derive(Clone)]
pub struct ActivityService {
    api: ApiClient,
}

impl ActivityService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All activities of the signed-in user, in server order.
    pub async fn list_activities(&self) -> Result<Vec<Activity>, ApiError> {
        tracing::debug!("Listing activities");
        let activities: Option<Vec<Activity>> = self.api.get("/activities").await?.json_opt()?;
        Ok(activities.unwrap_or_default())
    }

    /// Create an activity. The request must already be validated.
    pub async fn create_activity(
        &self,
        request: &CreateActivityRequest,
    ) -> Result<Activity, ApiError> {
        tracing::info!(
            activity_type = %request.activity_type,
            duration = request.duration,
            calories_burned = request.calories_burned,
            "Creating activity"
        );
        let created: Activity = self.api.post_json("/activities", request).await?;
        tracing::info!(activity_id = %created.id, "Activity created");
        Ok(created)
    }

    /// Base activity merged with its recommendation, if one can be had.
    ///
    /// Only the base fetch can fail this call.
    pub async fn get_activity_detail(&self, id: &str) -> Result<Activity, ApiError> {
        let encoded = urlencoding::encode(id);
        let base_path = format!("/activities/{}", encoded);

        let (base, recommendation) = tokio::join!(
            self.api.get_json::<Activity>(&base_path),
            self.fetch_recommendation(&encoded),
        );

        let mut activity = base.inspect_err(|e| {
            tracing::error!(activity_id = %id, error = %e, "Failed to fetch activity detail");
        })?;

        if let Some(rec) = recommendation {
            activity.apply_recommendation(rec);
        }
        Ok(activity)
    }

    async fn fetch_recommendation(&self, encoded_id: &str) -> Option<Recommendation> {
        let path = format!("/recommendations/activity/{}", encoded_id);
        let result = match self.api.get(&path).await {
            Ok(response) => response.json_opt::<Recommendation>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(rec) => rec,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch recommendation, showing activity without it");
                None
            }
        }
    }

    /// Connectivity check against `/health`.
    pub async fn test_connection(&self) -> bool {
        tracing::debug!(base_url = %self.api.base_url(), "Testing API connection");
        match self.api.get("/health").await {
            Ok(_) => {
                tracing::info!("API connection successful");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "API connection failed");
                false
            }
        }
    }
}

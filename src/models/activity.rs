// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model as served by the backend, plus the client-side draft.

use crate::error::ApiError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of exercise. Serialized the way the backend enum is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Running,
    Walking,
    Swimming,
    Cycling,
    Hiking,
    Jogging,
    Skating,
    Skiing,
    Surfing,
    Rowing,
    Dancing,
    Climbing,
    Jumping,
    Yoga,
    Boxing,
    Kickboxing,
    Skipping,
    Pushups,
    Situps,
    Weightlifting,
    MartialArts,
    Tennis,
    Badminton,
    Basketball,
    Football,
    Volleyball,
    Baseball,
    Cricket,
    Golf,
    TableTennis,
    Paragliding,
    /// Also absorbs kinds this client does not know yet.
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 32] = [
        ActivityType::Running,
        ActivityType::Walking,
        ActivityType::Swimming,
        ActivityType::Cycling,
        ActivityType::Hiking,
        ActivityType::Jogging,
        ActivityType::Skating,
        ActivityType::Skiing,
        ActivityType::Surfing,
        ActivityType::Rowing,
        ActivityType::Dancing,
        ActivityType::Climbing,
        ActivityType::Jumping,
        ActivityType::Yoga,
        ActivityType::Boxing,
        ActivityType::Kickboxing,
        ActivityType::Skipping,
        ActivityType::Pushups,
        ActivityType::Situps,
        ActivityType::Weightlifting,
        ActivityType::MartialArts,
        ActivityType::Tennis,
        ActivityType::Badminton,
        ActivityType::Basketball,
        ActivityType::Football,
        ActivityType::Volleyball,
        ActivityType::Baseball,
        ActivityType::Cricket,
        ActivityType::Golf,
        ActivityType::TableTennis,
        ActivityType::Paragliding,
        ActivityType::Other,
    ];

    /// Wire name, e.g. `MARTIAL_ARTS`.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Running => "RUNNING",
            ActivityType::Walking => "WALKING",
            ActivityType::Swimming => "SWIMMING",
            ActivityType::Cycling => "CYCLING",
            ActivityType::Hiking => "HIKING",
            ActivityType::Jogging => "JOGGING",
            ActivityType::Skating => "SKATING",
            ActivityType::Skiing => "SKIING",
            ActivityType::Surfing => "SURFING",
            ActivityType::Rowing => "ROWING",
            ActivityType::Dancing => "DANCING",
            ActivityType::Climbing => "CLIMBING",
            ActivityType::Jumping => "JUMPING",
            ActivityType::Yoga => "YOGA",
            ActivityType::Boxing => "BOXING",
            ActivityType::Kickboxing => "KICKBOXING",
            ActivityType::Skipping => "SKIPPING",
            ActivityType::Pushups => "PUSHUPS",
            ActivityType::Situps => "SITUPS",
            ActivityType::Weightlifting => "WEIGHTLIFTING",
            ActivityType::MartialArts => "MARTIAL_ARTS",
            ActivityType::Tennis => "TENNIS",
            ActivityType::Badminton => "BADMINTON",
            ActivityType::Basketball => "BASKETBALL",
            ActivityType::Football => "FOOTBALL",
            ActivityType::Volleyball => "VOLLEYBALL",
            ActivityType::Baseball => "BASEBALL",
            ActivityType::Cricket => "CRICKET",
            ActivityType::Golf => "GOLF",
            ActivityType::TableTennis => "TABLE_TENNIS",
            ActivityType::Paragliding => "PARAGLIDING",
            ActivityType::Other => "OTHER",
        }
    }

    /// Human label, e.g. `Martial Arts`.
    pub fn label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ApiError::Validation(format!("Unknown activity type: {}", wanted)))
    }
}

/// Activity record as returned by `/activities`, optionally merged with
/// its recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Backend-assigned, immutable
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Minutes. Older records may lack it.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub calories_burned: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Free-form; no fixed schema
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_metrics: BTreeMap<String, Value>,

    // --- Recommendation fields (merged in by the detail fetch) ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<Vec<String>>,
}

impl Activity {
    /// Overlay recommendation fields that are present. Identity and
    /// measurement fields are never touched.
    pub fn apply_recommendation(&mut self, rec: Recommendation) {
        if let Some(activity_id) = rec.activity_id.as_deref() {
            if activity_id != self.id {
                tracing::warn!(
                    activity_id = %self.id,
                    recommendation_for = %activity_id,
                    "Recommendation belongs to a different activity, ignoring"
                );
                return;
            }
        }

        if rec.recommendation.is_some() {
            self.recommendation = rec.recommendation;
        }
        if rec.improvements.is_some() {
            self.improvements = rec.improvements;
        }
        if rec.suggestions.is_some() {
            self.suggestions = rec.suggestions;
        }
        if rec.safety.is_some() {
            self.safety = rec.safety;
        }
    }
}

/// Externally computed feedback from `/recommendations/activity/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub improvements: Option<Vec<String>>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub safety: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /activities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration: u32,
    pub calories_burned: u32,
    pub additional_metrics: BTreeMap<String, Value>,
}

/// Unsaved form state. Numeric fields hold the raw input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub activity_type: ActivityType,
    pub duration: String,
    pub calories_burned: String,
}

impl Default for ActivityDraft {
    fn default() -> Self {
        Self {
            activity_type: ActivityType::Running,
            duration: String::new(),
            calories_burned: String::new(),
        }
    }
}

impl ActivityDraft {
    /// Check required fields and build the create request.
    pub fn validate(&self) -> Result<CreateActivityRequest, ApiError> {
        let duration = parse_required(&self.duration, "Duration")?;
        if duration == 0 {
            return Err(ApiError::Validation(
                "Duration must be greater than zero".to_string(),
            ));
        }
        let calories_burned = parse_required(&self.calories_burned, "Calories burned")?;

        Ok(CreateActivityRequest {
            activity_type: self.activity_type,
            duration,
            calories_burned,
            additional_metrics: BTreeMap::new(),
        })
    }
}

fn parse_required(raw: &str, field: &str) -> Result<u32, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    raw.parse::<u32>().map_err(|_| {
        ApiError::Validation(format!("{} must be a whole number of zero or more", field))
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

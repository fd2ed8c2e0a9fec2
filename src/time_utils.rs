// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDateTime, Utc};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a backend timestamp for display.
///
/// Accepts RFC3339 (converted to UTC) and zone-less ISO 8601 local date
/// times with optional fractional seconds. Anything else is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string();
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return date.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return date.format(DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}

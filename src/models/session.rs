// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session published by the auth bridge.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Tokens and claims for the signed-in user.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    /// Access token expiry (absent when the provider did not say)
    pub expires_at: Option<DateTime<Utc>>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
    /// Decoded token claims
    pub claims: Map<String, Value>,
}

impl Session {
    /// Subject claim; sent as the user-identity header.
    pub fn user_id(&self) -> Option<&str> {
        self.claim_str("sub")
    }

    pub fn display_name(&self) -> Option<&str> {
        ["name", "preferred_username", "email"]
            .into_iter()
            .find_map(|key| self.claim_str(key))
    }

    fn claim_str(&self, key: &str) -> Option<&str> {
        self.claims
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// True when the access token is expired or will be within `margin`.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now + margin)
    }

    /// True when the refresh token is known to have expired.
    pub fn refresh_expired(&self, now: DateTime<Utc>) -> bool {
        self.refresh_expires_at.is_some_and(|at| at <= now)
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

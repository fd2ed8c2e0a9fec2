// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend HTTP client.
//!
//! Handles:
//! - Bearer token and user-identity headers from the current session
//! - A fixed per-call timeout
//! - Status classification into [`ApiError`]
//! - Request/response/error diagnostics

use crate::auth::SessionStore;
use crate::error::ApiError;
use anyhow::Context;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Header carrying the signed-in user's subject claim.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Successful (2xx) response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Like [`HttpResponse::json`], but an empty or `null` body is `None`.
    pub fn json_opt<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        if self.body.trim().is_empty() {
            return Ok(None);
        }
        self.json()
    }
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    sessions: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, sessions: SessionStore) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building backend HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sessions,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("Request body not serializable: {}", e)))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path).await?.json()
    }

    /// POST and decode a JSON body.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.post(path, body).await?.json()
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        // Snapshot the session once so both headers come from the same login.
        let session = self.sessions.current();
        let has_token = session.is_some();
        let user_id = session.as_ref().and_then(|s| s.user_id().map(str::to_string));
        if let Some(session) = &session {
            request = request.bearer_auth(&session.access_token);
        }
        if let Some(user_id) = &user_id {
            request = request.header(USER_ID_HEADER, user_id);
        }
        if let Some(body) = &body {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        tracing::debug!(
            method = %method,
            url = %url,
            has_token,
            has_user_id = user_id.is_some(),
            "API request"
        );

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from_transport(&e);
                log_transport_error(&method, &url, &e, started.elapsed());
                return Err(err);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let err = ApiError::from_transport(&e);
                log_transport_error(&method, &url, &e, started.elapsed());
                return Err(err);
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Some(err) = ApiError::from_status(status) {
            tracing::error!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                elapsed_ms,
                body = %truncate(&body, 512),
                "API error response"
            );
            match err {
                ApiError::Unauthorized => tracing::warn!("Unauthorized - check the access token"),
                ApiError::Forbidden => tracing::warn!("Forbidden - check the user's permissions"),
                _ => {}
            }
            return Err(err);
        }

        tracing::info!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            elapsed_ms,
            "API response"
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn log_transport_error(method: &Method, url: &str, err: &reqwest::Error, elapsed: Duration) {
    tracing::error!(
        method = %method,
        url = %url,
        elapsed_ms = elapsed.as_millis() as u64,
        timeout = err.is_timeout(),
        connect = err.is_connect(),
        error = %err,
        "API request failed"
    );
    if err.is_connect() {
        tracing::error!("Server connection refused - is the backend running?");
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

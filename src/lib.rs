// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! FitIQ Tracker: a single-user fitness tracking web client.
//!
//! This crate signs the user in with an external identity provider,
//! records and lists workout activities through the backend REST API, and
//! serves the resulting pages from a local process.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use auth::{session_store, AuthBridge, OidcProvider, SessionStore};
use config::Config;
use services::{ActivityService, ApiClient};
use tokio::sync::Mutex;
use views::ActivitiesPage;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Sole writer of the session
    pub bridge: AuthBridge,
    pub sessions: SessionStore,
    pub activities: ActivityService,
    /// In-memory state of the `/activities` page
    pub activities_page: Mutex<ActivitiesPage>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (writer, sessions) = session_store();
        let provider = OidcProvider::new(config.oidc.clone(), config.api_timeout)?;
        let bridge = AuthBridge::new(provider, writer);
        let api = ApiClient::new(&config.api_base_url, config.api_timeout, bridge.sessions())?;

        Ok(Self {
            config,
            bridge,
            sessions,
            activities: ActivityService::new(api),
            activities_page: Mutex::new(ActivitiesPage::new()),
        })
    }
}

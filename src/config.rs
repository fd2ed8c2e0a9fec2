// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Every value has a local-development default matching the stock
//! Keycloak realm and backend gateway, so an empty environment works
//! out of the box.

use std::env;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5173";
const DEFAULT_CLIENT_ID: &str = "oauth2-pkce-client";
const DEFAULT_AUTHORIZATION_ENDPOINT: &str =
    "http://localhost:8181/realms/fitness-oauth2/protocol/openid-connect/auth";
const DEFAULT_TOKEN_ENDPOINT: &str =
    "http://localhost:8181/realms/fitness-oauth2/protocol/openid-connect/token";
const DEFAULT_END_SESSION_ENDPOINT: &str =
    "http://localhost:8181/realms/fitness-oauth2/protocol/openid-connect/logout";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:5173/callback";
const DEFAULT_SCOPES: &str = "openid profile email";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the activity backend (gateway), without trailing slash
    pub api_base_url: String,
    /// Address the local page server binds to
    pub listen_addr: String,
    /// Upper bound for every backend and identity provider call
    pub api_timeout: Duration,
    /// Identity provider settings
    pub oidc: OidcConfig,
}

/// Authorization-code-with-PKCE client settings.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Public client ID registered with the provider
    pub client_id: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    /// Where refresh tokens are invalidated on logout (disabled when unset)
    pub end_session_endpoint: Option<String>,
    /// Callback URL on this server that receives the authorization code
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            oidc: OidcConfig {
                client_id: DEFAULT_CLIENT_ID.to_string(),
                authorization_endpoint: DEFAULT_AUTHORIZATION_ENDPOINT.to_string(),
                token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
                end_session_endpoint: Some(DEFAULT_END_SESSION_ENDPOINT.to_string()),
                redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
                scopes: split_scopes(DEFAULT_SCOPES),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables. `main` loads `.env`
    /// before calling this.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_timeout_secs = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "API_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_API_TIMEOUT_SECS,
        };
        if api_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "API_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        // An explicitly empty value disables provider-side logout.
        let end_session_endpoint = match env::var("OIDC_END_SESSION_ENDPOINT") {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(v.trim().to_string()),
            Err(_) => Some(DEFAULT_END_SESSION_ENDPOINT.to_string()),
        };

        let scopes = split_scopes(&var_or("OIDC_SCOPES", DEFAULT_SCOPES));
        if scopes.is_empty() {
            return Err(ConfigError::Invalid {
                var: "OIDC_SCOPES",
                reason: "at least one scope is required".to_string(),
            });
        }

        Ok(Self {
            api_base_url: var_or("API_BASE_URL", DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            listen_addr: var_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            api_timeout: Duration::from_secs(api_timeout_secs),
            oidc: OidcConfig {
                client_id: var_or("OIDC_CLIENT_ID", DEFAULT_CLIENT_ID),
                authorization_endpoint: var_or(
                    "OIDC_AUTHORIZATION_ENDPOINT",
                    DEFAULT_AUTHORIZATION_ENDPOINT,
                ),
                token_endpoint: var_or("OIDC_TOKEN_ENDPOINT", DEFAULT_TOKEN_ENDPOINT),
                end_session_endpoint,
                redirect_uri: var_or("OIDC_REDIRECT_URI", DEFAULT_REDIRECT_URI),
                scopes,
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

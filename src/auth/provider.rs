// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (authorization code + PKCE).
//!
//! Handles:
//! - Authorization URL construction
//! - Code exchange and refresh at the token endpoint
//! - Refresh token invalidation at the end-session endpoint

use super::pkce::PkceChallenge;
use super::AuthError;
use crate::config::OidcConfig;
use crate::models::Session;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds (Keycloak extension)
    #[serde(default)]
    pub refresh_expires_in: Option<i64>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Build a session, decoding claims from the access token and falling
    /// back to the ID token for opaque access tokens.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let claims = match decode_claims(&self.access_token) {
            Ok(claims) => claims,
            Err(access_err) => match self.id_token.as_deref() {
                Some(id_token) => decode_claims(id_token)?,
                None => return Err(access_err),
            },
        };

        Ok(Session {
            expires_at: self.expires_in.map(|s| now + Duration::seconds(s)),
            // Keycloak reports 0 for offline tokens that never expire.
            refresh_expires_at: self
                .refresh_expires_in
                .filter(|s| *s > 0)
                .map(|s| now + Duration::seconds(s)),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            id_token: self.id_token,
            claims,
        })
    }
}

/// Read JWT claims without checking the signature. The backend verifies
/// tokens; the client only needs the subject and profile claims.
pub fn decode_claims(token: &str) -> Result<Map<String, Value>, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Provider error body (`{"error": ..., "error_description": ...}`).
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth client for the configured identity provider.
#[derive(Clone)]
pub struct OidcProvider {
    http: reqwest::Client,
    config: OidcConfig,
}

impl OidcProvider {
    pub fn new(config: OidcConfig, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building identity provider HTTP client")?;

        tracing::info!(
            client_id = %config.client_id,
            authorization_endpoint = %config.authorization_endpoint,
            redirect_uri = %config.redirect_uri,
            "Initialized identity provider client"
        );

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    /// Where the browser is sent to sign in.
    pub fn authorization_url(&self, state: &str, pkce: &PkceChallenge) -> String {
        let separator = if self.config.authorization_endpoint.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{}response_type=code&\
             client_id={}&\
             redirect_uri={}&\
             scope={}&\
             state={}&\
             code_challenge={}&\
             code_challenge_method={}",
            self.config.authorization_endpoint,
            separator,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scopes.join(" ")),
            urlencoding::encode(state),
            pkce.challenge,
            PkceChallenge::METHOD,
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        tracing::info!("Exchanging authorization code for tokens");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .await
    }

    /// Trade a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        tracing::info!("Refreshing access token");
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// Invalidate the refresh token with the provider. No-op when no
    /// end-session endpoint is configured or there is no refresh token.
    pub async fn end_session(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let (Some(endpoint), Some(refresh_token)) =
            (self.config.end_session_endpoint.as_deref(), refresh_token)
        else {
            tracing::debug!("Skipping provider logout");
            return Ok(());
        };

        let response = self
            .http
            .post(endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Request(format!("Logout request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status, &body));
        }

        tracing::info!("Provider session ended");
        Ok(())
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::Request(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Request(format!("Token response parse error: {}", e)))
    }
}

fn provider_error(status: reqwest::StatusCode, body: &str) -> AuthError {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(err) => AuthError::Provider(match err.error_description {
            Some(desc) => format!("{}: {}", err.error, desc),
            None => err.error,
        }),
        Err(_) => AuthError::Provider(format!("HTTP {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_with(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"provider-signing-key"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_claims_ignores_signature_and_audience() {
        let token = token_with(json!({"sub": "kc-1", "aud": "account", "exp": 1}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.get("sub"), Some(&json!("kc-1")));
    }

    #[test]
    fn test_decode_claims_rejects_garbage() {
        assert!(matches!(
            decode_claims("not-a-jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_into_session_falls_back_to_id_token() {
        let now = Utc::now();
        let response = TokenResponse {
            access_token: "opaque".into(),
            token_type: Some("Bearer".into()),
            expires_in: Some(300),
            refresh_token: Some("r".into()),
            refresh_expires_in: Some(0),
            id_token: Some(token_with(json!({"sub": "kc-2", "email": "a@b.c"}))),
            scope: None,
        };
        let session = response.into_session(now).unwrap();
        assert_eq!(session.user_id(), Some("kc-2"));
        assert_eq!(session.expires_at, Some(now + Duration::seconds(300)));
        assert!(session.refresh_expires_at.is_none());
    }

    #[test]
    fn test_authorization_url_parameters() {
        let provider =
            OidcProvider::new(Config::default().oidc, std::time::Duration::from_secs(1)).unwrap();
        let pkce = PkceChallenge::from_verifier("verifier".into());
        let url = provider.authorization_url("st@te", &pkce);

        assert!(url.starts_with("http://localhost:8181/realms/fitness-oauth2/"));
        assert!(url.contains("?response_type=code&"));
        assert!(url.contains("client_id=oauth2-pkce-client"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5173%2Fcallback"));
        assert!(url.contains("scope=openid%20profile%20email"));
        assert!(url.contains("state=st%40te"));
        assert!(url.contains(&format!("code_challenge={}", pkce.challenge)));
        assert!(url.ends_with("code_challenge_method=S256"));
    }

    #[test]
    fn test_provider_error_parsing() {
        let err = provider_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Code not valid"}"#,
        );
        assert!(matches!(err, AuthError::Provider(m) if m == "invalid_grant: Code not valid"));

        let err = provider_error(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(err, AuthError::Provider(m) if m.contains("502")));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth session bridge.
//!
//! Reconciles the identity provider's redirect flow into the session
//! store. This is the only code that writes the session.
//!
//! ```text
//! Unauthenticated --begin_login--> Authenticating --complete_login--> Authenticated
//!        ^                               |                                  |
//!        +------- fail_login / error ----+                                  |
//!        +------------------ logout / refresh expired ---------------------+
//! ```

use super::pkce::{random_token, PkceChallenge};
use super::provider::OidcProvider;
use super::session_store::{SessionStore, SessionWriter};
use super::AuthError;
use crate::models::Session;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

/// Refresh the access token this long before it expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 30;

/// Externally visible login phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Outcome of [`AuthBridge::ensure_fresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Session present and not close to expiry
    Fresh,
    /// Access token was renewed
    Refreshed,
    /// Session was dropped; the user has to sign in again
    Expired,
    /// No session
    Missing,
}

struct PendingLogin {
    state: String,
    pkce: PkceChallenge,
    started_at: DateTime<Utc>,
    /// Why the previous session or attempt ended
    notice: Option<String>,
}

enum BridgeState {
    Unauthenticated { last_error: Option<String> },
    Authenticating(PendingLogin),
    Authenticated,
}

/// Owns the session writer and the login state machine.
pub struct AuthBridge {
    provider: OidcProvider,
    writer: SessionWriter,
    state: Mutex<BridgeState>,
    /// Serializes refreshes so one expiry triggers one token request.
    refresh_lock: Mutex<()>,
}

impl AuthBridge {
    pub fn new(provider: OidcProvider, writer: SessionWriter) -> Self {
        let state = if writer.current().is_some() {
            BridgeState::Authenticated
        } else {
            BridgeState::Unauthenticated { last_error: None }
        };

        Self {
            provider,
            writer,
            state: Mutex::new(state),
            refresh_lock: Mutex::new(()),
        }
    }

    /// A new read handle on the session this bridge publishes.
    pub fn sessions(&self) -> SessionStore {
        self.writer.reader()
    }

    pub async fn phase(&self) -> AuthPhase {
        match &*self.state.lock().await {
            BridgeState::Unauthenticated { .. } => AuthPhase::Unauthenticated,
            BridgeState::Authenticating(_) => AuthPhase::Authenticating,
            BridgeState::Authenticated => AuthPhase::Authenticated,
        }
    }

    /// Why the last sign-in attempt or session ended, if it wasn't a
    /// plain logout. Kept while the next sign-in is pending.
    pub async fn last_error(&self) -> Option<String> {
        match &*self.state.lock().await {
            BridgeState::Unauthenticated { last_error } => last_error.clone(),
            BridgeState::Authenticating(pending) => pending.notice.clone(),
            BridgeState::Authenticated => None,
        }
    }

    /// Start (or restart) a login. Returns the authorization URL the
    /// browser must be sent to.
    pub async fn begin_login(&self) -> Result<String, AuthError> {
        let mut pending = PendingLogin {
            state: random_token()?,
            pkce: PkceChallenge::generate()?,
            started_at: Utc::now(),
            notice: None,
        };
        let url = self.provider.authorization_url(&pending.state, &pending.pkce);

        let mut state = self.state.lock().await;
        pending.notice = match &mut *state {
            BridgeState::Unauthenticated { last_error } => last_error.take(),
            BridgeState::Authenticating(previous) => {
                tracing::info!("Restarting sign-in; previous attempt abandoned");
                previous.notice.take()
            }
            BridgeState::Authenticated => None,
        };
        *state = BridgeState::Authenticating(pending);
        tracing::info!("Sign-in started, redirecting to identity provider");

        Ok(url)
    }

    /// Finish a login from the provider's redirect.
    pub async fn complete_login(&self, code: &str, returned_state: &str) -> Result<(), AuthError> {
        // Copy what the exchange needs so the state lock is not held while
        // the token endpoint is called.
        let (expected_state, verifier) = {
            let mut state = self.state.lock().await;
            let BridgeState::Authenticating(pending) = &*state else {
                tracing::warn!("Authorization callback without a sign-in in progress");
                return Err(AuthError::NotAuthenticating);
            };

            if !bool::from(pending.state.as_bytes().ct_eq(returned_state.as_bytes())) {
                tracing::error!("OAuth state mismatch! Potential tampering.");
                *state = BridgeState::Unauthenticated {
                    last_error: Some(AuthError::StateMismatch.to_string()),
                };
                return Err(AuthError::StateMismatch);
            }

            tracing::debug!(
                waited_secs = (Utc::now() - pending.started_at).num_seconds(),
                "Authorization callback received"
            );
            (pending.state.clone(), pending.pkce.verifier.clone())
        };

        let result = match self.provider.exchange_code(code, &verifier).await {
            Ok(tokens) => tokens.into_session(Utc::now()),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock().await;
        // A newer begin_login supersedes this callback.
        let still_current = matches!(
            &*state,
            BridgeState::Authenticating(pending) if pending.state == expected_state
        );
        if !still_current {
            tracing::warn!("Sign-in superseded while exchanging code, discarding tokens");
            return Err(AuthError::StateMismatch);
        }

        match result {
            Ok(session) => {
                tracing::info!(user_id = session.user_id(), "Sign-in complete");
                self.writer.publish(session);
                *state = BridgeState::Authenticated;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign-in failed");
                *state = BridgeState::Unauthenticated {
                    last_error: Some(e.to_string()),
                };
                Err(e)
            }
        }
    }

    /// The provider redirected back with an error instead of a code.
    pub async fn fail_login(&self, error: &str, description: Option<&str>) {
        tracing::warn!(error = %error, description, "OAuth error from identity provider");
        let message = match description {
            Some(desc) => format!("Sign-in failed: {}", desc),
            None => format!("Sign-in failed: {}", error),
        };

        let mut state = self.state.lock().await;
        if matches!(*state, BridgeState::Authenticated) {
            return;
        }
        *state = BridgeState::Unauthenticated {
            last_error: Some(message),
        };
    }

    /// Clear the session, then invalidate it with the provider.
    ///
    /// The local session is gone even if the provider call fails.
    pub async fn logout(&self) {
        // Cleared under the state lock so an in-flight refresh sees it.
        let previous = {
            let mut state = self.state.lock().await;
            *state = BridgeState::Unauthenticated { last_error: None };
            self.writer.clear()
        };

        let Some(session) = previous else {
            tracing::debug!("Logout without a session");
            return;
        };
        tracing::info!(user_id = session.user_id(), "Signed out");

        if let Err(e) = self.provider.end_session(session.refresh_token.as_deref()).await {
            tracing::warn!(error = %e, "Provider logout failed, local session already cleared");
        }
    }

    /// Make sure the session's access token is usable, refreshing it when
    /// it is about to expire.
    pub async fn ensure_fresh(&self) -> Freshness {
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        match self.writer.current() {
            None => return Freshness::Missing,
            Some(session) if !session.expires_within(margin, Utc::now()) => {
                return Freshness::Fresh
            }
            Some(_) => {}
        }

        let _guard = self.refresh_lock.lock().await;

        // Re-check: another request may have refreshed while we waited.
        let now = Utc::now();
        let Some(session) = self.writer.current() else {
            return Freshness::Missing;
        };
        if !session.expires_within(margin, now) {
            return Freshness::Fresh;
        }

        let refresh_token = match session.refresh_token.as_deref() {
            Some(token) if !session.refresh_expired(now) => token,
            _ => {
                tracing::info!("Access token expired and cannot be refreshed");
                return self.expire(&session).await;
            }
        };

        match self.provider.refresh(refresh_token).await {
            Ok(tokens) => match tokens.into_session(Utc::now()) {
                Ok(mut renewed) => {
                    // Providers may omit tokens they did not rotate.
                    if renewed.refresh_token.is_none() {
                        renewed.refresh_token = session.refresh_token.clone();
                        renewed.refresh_expires_at = session.refresh_expires_at;
                    }
                    if renewed.id_token.is_none() {
                        renewed.id_token = session.id_token.clone();
                    }
                    // Publish only if no logout or new login happened while
                    // the refresh was in flight.
                    let state = self.state.lock().await;
                    if !matches!(*state, BridgeState::Authenticated) || !self.is_current(&session)
                    {
                        tracing::info!("Session ended during refresh, discarding renewed tokens");
                        return self.settled();
                    }
                    self.writer.publish(renewed);
                    tracing::info!("Access token refreshed");
                    Freshness::Refreshed
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Refreshed token unreadable");
                    self.expire(&session).await
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                self.expire(&session).await
            }
        }
    }

    /// Drop `session` unless a logout or new login already replaced it.
    async fn expire(&self, session: &Arc<Session>) -> Freshness {
        let mut state = self.state.lock().await;
        if !self.is_current(session) {
            return self.settled();
        }
        self.writer.clear();
        *state = BridgeState::Unauthenticated {
            last_error: Some("Your session expired. Please sign in again.".to_string()),
        };
        Freshness::Expired
    }

    fn is_current(&self, session: &Arc<Session>) -> bool {
        self.writer
            .current()
            .is_some_and(|current| Arc::ptr_eq(&current, session))
    }

    /// Outcome when the session changed hands during a refresh.
    fn settled(&self) -> Freshness {
        if self.writer.current().is_some() {
            Freshness::Fresh
        } else {
            Freshness::Missing
        }
    }
}

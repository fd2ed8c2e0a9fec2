// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication: the bridge between the identity provider's token flow
//! and the application-visible session.

pub mod bridge;
pub mod pkce;
pub mod provider;
pub mod session_store;

pub use bridge::{AuthBridge, AuthPhase, Freshness};
pub use provider::{OidcProvider, TokenResponse};
pub use session_store::{session_store, SessionStore, SessionWriter};

/// Login flow failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No sign-in is in progress")]
    NotAuthenticating,

    #[error("Sign-in state did not match; please try again")]
    StateMismatch,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Identity provider unreachable: {0}")]
    Request(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Secure random number generator unavailable")]
    Random,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, refresh and logout tests through the router.

mod common;

use axum::http::StatusCode;
use common::{
    create_test_env, create_test_jwt, get, location, post_form, query_param, sign_in,
    sign_in_with, token_response,
};
use fitiq_tracker::auth::{AuthPhase, Freshness};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_redirects_with_pkce_challenge() {
    let env = create_test_env().await;

    let (status, headers, _) = get(&env.app, "/login").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);

    let url = location(&headers);
    assert!(url.starts_with(&format!("{}/auth?", env.idp.uri())));
    assert_eq!(query_param(&url, "response_type").as_deref(), Some("code"));
    assert_eq!(
        query_param(&url, "client_id").as_deref(),
        Some("oauth2-pkce-client")
    );
    assert_eq!(
        query_param(&url, "redirect_uri").as_deref(),
        Some("http://localhost:5173/callback")
    );
    assert_eq!(
        query_param(&url, "scope").as_deref(),
        Some("openid profile email")
    );
    assert_eq!(
        query_param(&url, "code_challenge_method").as_deref(),
        Some("S256")
    );
    assert_eq!(query_param(&url, "code_challenge").unwrap().len(), 43);
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Authenticating);
}

#[tokio::test]
async fn test_each_login_uses_fresh_state() {
    let env = create_test_env().await;

    let (_, first, _) = get(&env.app, "/login").await;
    let (_, second, _) = get(&env.app, "/login").await;
    assert_ne!(
        query_param(&location(&first), "state"),
        query_param(&location(&second), "state")
    );
}

#[tokio::test]
async fn test_callback_publishes_session() {
    let env = create_test_env().await;
    sign_in(&env).await;

    let session = env.state.sessions.current().expect("session published");
    assert_eq!(session.user_id(), Some("kc-user-1"));
    assert_eq!(session.display_name(), Some("Ada Lovelace"));
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Authenticated);

    // The code exchange carries the PKCE verifier.
    let requests = env.idp.received_requests().await.unwrap();
    let form = String::from_utf8_lossy(&requests[0].body);
    assert!(form.contains("grant_type=authorization_code"));
    assert!(form.contains("code=test-code"));
    assert!(form.contains("code_verifier="));
}

#[tokio::test]
async fn test_login_when_signed_in_goes_to_activities() {
    let env = create_test_env().await;
    sign_in(&env).await;

    let (status, headers, _) = get(&env.app, "/login").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/activities");
}

#[tokio::test]
async fn test_callback_state_mismatch_rejected() {
    let env = create_test_env().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("kc-user-1", 300)))
        .expect(0)
        .mount(&env.idp)
        .await;

    get(&env.app, "/login").await;
    let (status, headers, _) = get(&env.app, "/callback?code=abc&state=forged").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
    assert!(env.state.sessions.current().is_none());

    let (status, _, body) = get(&env.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"login-error\""));
    assert!(body.contains("state did not match"));
}

#[tokio::test]
async fn test_callback_without_login_rejected() {
    let env = create_test_env().await;

    let (status, headers, _) = get(&env.app, "/callback?code=abc&state=xyz").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn test_provider_error_shown_on_login_view() {
    let env = create_test_env().await;
    get(&env.app, "/login").await;

    let (status, _, _) = get(
        &env.app,
        "/callback?error=access_denied&error_description=User%20cancelled",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Unauthenticated);

    let (_, _, body) = get(&env.app, "/activities").await;
    assert!(body.contains("Sign-in failed: User cancelled"));
}

#[tokio::test]
async fn test_token_endpoint_error_shown_on_login_view() {
    let env = create_test_env().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Code not valid"
        })))
        .mount(&env.idp)
        .await;

    let (_, headers, _) = get(&env.app, "/login").await;
    let state = query_param(&location(&headers), "state").unwrap();
    let (_, headers, _) = get(
        &env.app,
        &format!("/callback?code=stale&state={}", urlencoding::encode(&state)),
    )
    .await;
    assert_eq!(location(&headers), "/");
    assert!(env.state.sessions.current().is_none());

    let (_, _, body) = get(&env.app, "/").await;
    assert!(body.contains("id=\"login-error\""));
    assert!(body.contains("Code not valid"));
}

#[tokio::test]
async fn test_pending_login_shown_while_authenticating() {
    let env = create_test_env().await;
    get(&env.app, "/login").await;

    let (_, _, body) = get(&env.app, "/activities").await;
    assert!(body.contains("Welcome to FitIQ"));
    assert!(body.contains("id=\"login-pending\""));
}

#[tokio::test]
async fn test_logout_clears_session_and_ends_provider_session() {
    let env = create_test_env().await;
    sign_in(&env).await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&env.idp)
        .await;

    let (status, headers, _) = post_form(&env.app, "/logout", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
    assert!(env.state.sessions.current().is_none());
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Unauthenticated);

    let (_, _, body) = get(&env.app, "/activities").await;
    assert!(body.contains("Welcome to FitIQ"));
    assert!(!body.contains("id=\"login-error\""));
}

#[tokio::test]
async fn test_logout_survives_provider_failure() {
    let env = create_test_env().await;
    sign_in(&env).await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&env.idp)
        .await;

    post_form(&env.app, "/logout", "").await;
    assert!(env.state.sessions.current().is_none());
}

#[tokio::test]
async fn test_backend_calls_after_logout_carry_no_identity() {
    let env = create_test_env().await;
    sign_in(&env).await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&env.idp)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&env.backend)
        .await;

    env.state.activities.list_activities().await.unwrap();
    post_form(&env.app, "/logout", "").await;
    env.state.activities.list_activities().await.unwrap();

    let requests = env.backend.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].headers["x-user-id"], "kc-user-1");
    assert!(!requests[1].headers.contains_key("authorization"));
    assert!(!requests[1].headers.contains_key("x-user-id"));
}

#[tokio::test]
async fn test_expiring_token_is_refreshed() {
    let env = create_test_env().await;
    // Expires inside the refresh margin.
    sign_in_with(&env, token_response("kc-user-1", 5)).await;

    let renewed = create_test_jwt("kc-user-1", "Ada Renewed");
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": renewed,
            "token_type": "Bearer",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&env.idp)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .and(header("authorization", format!("Bearer {}", renewed).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&env.backend)
        .await;

    let (status, _, body) = get(&env.app, "/activities").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"activities-empty\""));

    // Refresh responses without a refresh token keep the old one.
    let session = env.state.sessions.current().unwrap();
    assert_eq!(session.access_token, renewed);
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(env.state.bridge.ensure_fresh().await, Freshness::Fresh);
}

#[tokio::test]
async fn test_failed_refresh_restarts_sign_in() {
    let env = create_test_env().await;
    sign_in_with(&env, token_response("kc-user-1", 5)).await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token is not active"
        })))
        .mount(&env.idp)
        .await;

    let (status, headers, _) = get(&env.app, "/activities").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/login");
    assert!(env.state.sessions.current().is_none());
    assert_eq!(
        env.state.bridge.last_error().await.as_deref(),
        Some("Your session expired. Please sign in again.")
    );
}

#[tokio::test]
async fn test_expired_session_notice_survives_sign_in_restart() {
    let env = create_test_env().await;
    sign_in_with(&env, token_response("kc-user-1", 5)).await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&env.idp)
        .await;

    let (_, headers, _) = get(&env.app, "/activities").await;
    assert_eq!(location(&headers), "/login");
    let (status, _, _) = get(&env.app, "/login").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Authenticating);

    let (_, _, body) = get(&env.app, "/activities").await;
    assert!(body.contains("id=\"login-pending\""));
    assert!(body.contains("Your session expired. Please sign in again."));
}

#[tokio::test]
async fn test_logout_during_refresh_stays_signed_out() {
    let env = create_test_env().await;
    sign_in_with(&env, token_response("kc-user-1", 5)).await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_response("kc-user-1", 300))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&env.idp)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&env.idp)
        .await;

    let app = env.app.clone();
    let visit = tokio::spawn(async move { get(&app, "/activities").await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    env.state.bridge.logout().await;

    let (_, _, body) = visit.await.unwrap();
    assert!(body.contains("Welcome to FitIQ"));
    assert!(env.state.sessions.current().is_none());
    assert_eq!(env.state.bridge.phase().await, AuthPhase::Unauthenticated);
    assert_eq!(env.state.bridge.ensure_fresh().await, Freshness::Missing);
}

#[tokio::test]
async fn test_expired_token_without_refresh_token() {
    let env = create_test_env().await;
    let mut tokens = token_response("kc-user-1", 5);
    tokens.as_object_mut().unwrap().remove("refresh_token");
    sign_in_with(&env, tokens).await;

    assert_eq!(env.state.bridge.ensure_fresh().await, Freshness::Expired);
    assert_eq!(env.state.bridge.ensure_fresh().await, Freshness::Missing);
}

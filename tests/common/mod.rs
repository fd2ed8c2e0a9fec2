// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use fitiq_tracker::config::Config;
use fitiq_tracker::routes::create_router;
use fitiq_tracker::AppState;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Router wired to a mock backend and a mock identity provider.
#[allow(dead_code)]
pub struct TestEnv {
    pub app: Router,
    pub state: Arc<AppState>,
    pub backend: MockServer,
    pub idp: MockServer,
}

/// Test configuration pointing at the given mock servers.
#[allow(dead_code)]
pub fn test_config(backend: &MockServer, idp: &MockServer) -> Config {
    let mut config = Config::default();
    config.api_base_url = backend.uri();
    config.api_timeout = Duration::from_secs(2);
    config.oidc.authorization_endpoint = format!("{}/auth", idp.uri());
    config.oidc.token_endpoint = format!("{}/token", idp.uri());
    config.oidc.end_session_endpoint = Some(format!("{}/logout", idp.uri()));
    config
}

/// Create a test app with mock backend and identity provider.
#[allow(dead_code)]
pub async fn create_test_env() -> TestEnv {
    let backend = MockServer::start().await;
    let idp = MockServer::start().await;
    let state = Arc::new(
        AppState::new(test_config(&backend, &idp)).expect("Failed to build app state"),
    );

    TestEnv {
        app: create_router(state.clone()),
        state,
        backend,
        idp,
    }
}

/// Create a provider-style access token for testing.
#[allow(dead_code)]
pub fn create_test_jwt(sub: &str, name: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    encode(
        &Header::default(),
        &json!({
            "sub": sub,
            "name": name,
            "email": format!("{}@example.com", sub),
            "aud": "account",
            "iat": now,
            "exp": now + 3600,
        }),
        &EncodingKey::from_secret(b"idp-test-signing-key"),
    )
    .unwrap()
}

/// Token endpoint response for a freshly signed-in user.
#[allow(dead_code)]
pub fn token_response(sub: &str, expires_in: i64) -> Value {
    json!({
        "access_token": create_test_jwt(sub, "Ada Lovelace"),
        "token_type": "Bearer",
        "expires_in": expires_in,
        "refresh_token": "refresh-1",
        "refresh_expires_in": 1800,
        "scope": "openid profile email"
    })
}

/// Sign in through /login and /callback with the given token response.
#[allow(dead_code)]
pub async fn sign_in_with(env: &TestEnv, tokens: Value) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens))
        .mount(&env.idp)
        .await;

    let (status, headers, _) = get(&env.app, "/login").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    let auth_url = location(&headers);
    let state = query_param(&auth_url, "state").expect("state in authorization URL");

    let (status, headers, _) = get(
        &env.app,
        &format!(
            "/callback?code=test-code&state={}",
            urlencoding::encode(&state)
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/activities");
}

/// Sign in as user `kc-user-1` with a long-lived token.
#[allow(dead_code)]
pub async fn sign_in(env: &TestEnv) {
    sign_in_with(env, token_response("kc-user-1", 300)).await;
}

#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

#[allow(dead_code)]
pub async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, HeaderMap, String) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
}

#[allow(dead_code)]
pub fn location(headers: &HeaderMap) -> String {
    headers
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Decoded query parameter from a URL.
#[allow(dead_code)]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| urlencoding::decode(value).unwrap().into_owned())
    })
}

/// Backend activity JSON as the activity service returns it.
#[allow(dead_code)]
pub fn activity_json(id: &str, activity_type: &str, duration: u32, calories: u32) -> Value {
    json!({
        "id": id,
        "userId": "kc-user-1",
        "type": activity_type,
        "duration": duration,
        "caloriesBurned": calories,
        "startTime": null,
        "additionalMetrics": {},
        "createdAt": "2025-03-01T07:30:00.123",
        "updatedAt": "2025-03-01T07:30:00.123"
    })
}

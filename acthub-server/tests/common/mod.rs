//! Shared scaffolding for the integration suites
#![allow(dead_code)]

use acthub_server::{router, AppState, CrmConfig, HubConfig};
use acthub_store::SessionStore;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const HUB_SECRET: &str = "integration-secret";
pub const BASE_URL: &str = "https://hub.example.com";
pub const FORM_REDIRECT_URL: &str = "https://hub.example.com/campaign-form";

pub fn state_key() -> String {
    "01".repeat(32)
}

pub fn test_config(crm_base: &str) -> HubConfig {
    HubConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        hub_secret: HUB_SECRET.to_string(),
        state_key: state_key(),
        base_url: BASE_URL.to_string(),
        form_redirect_url: FORM_REDIRECT_URL.to_string(),
        crm: CrmConfig {
            token_url: format!("{crm_base}/services/oauth2/token"),
            authorize_url: format!("{crm_base}/services/oauth2/authorize"),
            api_base: crm_base.to_string(),
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            username: "svc@example.com".to_string(),
            password: "pw".to_string(),
        },
    }
}

pub fn app(crm_base: &str, sessions: Arc<dyn SessionStore>) -> (Router, AppState) {
    let state = AppState::new(test_config(crm_base), sessions).expect("state wiring");
    (router(state.clone()), state)
}

pub fn auth_header() -> String {
    format!("Token token=\"{HUB_SECRET}\"")
}

/// POST a JSON body and collect status plus parsed response body.
pub async fn post_json(
    app: &Router,
    path: &str,
    authorization: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).expect("body")))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, json)
}

/// GET a path (used for the OAuth callback and health probe).
pub async fn get(app: &Router, path_and_query: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("GET")
        .uri(path_and_query)
        .body(Body::empty())
        .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

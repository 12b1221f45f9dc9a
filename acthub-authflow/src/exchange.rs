//! OAuth2 token exchange against the CRM
//!
//! Two grant shapes are supported: authorization-code (the browser
//! redirect dance) and resource-owner password (service-account actions
//! with no browser in the loop). Upstream rejections are passed through
//! verbatim; only the hub client can decide how to present them.

use acthub_core::HubError;
use anyhow::anyhow;
use serde_json::Value;
use std::time::Duration;

/// Outbound calls share one fixed timeout so a hung CRM converts into an
/// explicit failure inside the hub client's own timeout budget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub token_url: String,
    pub authorize_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// One token exchange. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum GrantRequest {
    AuthorizationCode { code: String },
    Password { username: String, password: String },
}

/// Successful exchange result.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Tenant-specific API host some CRMs return alongside the token.
    pub instance_url: Option<String>,
}

pub struct OAuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, http })
    }

    /// Browser-facing authorization URL with the sealed continuation
    /// token as the `state` parameter.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&state={}",
            self.config.authorize_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// POST the grant to the token endpoint and classify the result.
    pub async fn exchange(&self, grant: &GrantRequest) -> Result<TokenGrant, HubError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        match grant {
            GrantRequest::AuthorizationCode { code } => {
                form.push(("grant_type", "authorization_code"));
                form.push(("code", code.as_str()));
                form.push(("redirect_uri", self.config.redirect_uri.as_str()));
            }
            GrantRequest::Password { username, password } => {
                form.push(("grant_type", "password"));
                form.push(("username", username.as_str()));
                form.push(("password", password.as_str()));
            }
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| HubError::Network(e.to_string()))?;

        let status = response.status();
        if !(status.is_success()) {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(target: "oauth_exchange", status = %status, "token endpoint rejected grant");
            return Err(HubError::Upstream { status: status.as_u16(), body });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| HubError::Network(e.to_string()))?;
        let access_token = json
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| HubError::Internal(anyhow!("missing access_token in token response")))?
            .to_string();
        tracing::debug!(target: "oauth_exchange", "token exchange succeeded");

        Ok(TokenGrant {
            access_token,
            token_type: json.get("token_type").and_then(Value::as_str).map(str::to_string),
            instance_url: json.get("instance_url").and_then(Value::as_str).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(token_url: String) -> OAuthConfig {
        OAuthConfig {
            token_url,
            authorize_url: "https://crm.example.com/services/oauth2/authorize".into(),
            client_id: "cid".into(),
            client_secret: "csecret".into(),
            redirect_uri: "https://hub.example.com/campaign-oauth".into(),
        }
    }

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let client = OAuthClient::new(config("https://crm.example.com/token".into())).unwrap();
        let url = client.authorize_url("tok/en+value");
        assert!(url.starts_with("https://crm.example.com/services/oauth2/authorize?response_type=code"));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fhub.example.com%2Fcampaign-oauth"));
        assert!(url.contains("state=tok%2Fen%2Bvalue"));
    }

    #[tokio::test]
    async fn test_password_grant_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .body_contains("grant_type=password")
                .body_contains("username=svc%40example.com")
                .body_contains("client_id=cid");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "access_token": "T1",
                    "token_type": "Bearer",
                    "instance_url": "https://tenant.example.com"
                }));
        });

        let client = OAuthClient::new(config(server.url("/token"))).unwrap();
        let grant = GrantRequest::Password {
            username: "svc@example.com".into(),
            password: "pw".into(),
        };
        let token = client.exchange(&grant).await.unwrap();
        mock.assert();
        assert_eq!(token.access_token, "T1");
        assert_eq!(token.instance_url.as_deref(), Some("https://tenant.example.com"));
    }

    #[tokio::test]
    async fn test_authorization_code_grant_sends_code_and_redirect() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .body_contains("grant_type=authorization_code")
                .body_contains("code=aPrx.code")
                .body_contains("redirect_uri=");
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"access_token": "T2"}));
        });

        let client = OAuthClient::new(config(server.url("/token"))).unwrap();
        let grant = GrantRequest::AuthorizationCode { code: "aPrx.code".into() };
        let token = client.exchange(&grant).await.unwrap();
        mock.assert();
        assert_eq!(token.access_token, "T2");
    }

    #[tokio::test]
    async fn test_upstream_rejection_passes_status_and_body_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/token");
            then.status(400)
                .header("Content-Type", "application/json")
                .body(r#"{"error":"invalid_grant","error_description":"expired authorization code"}"#);
        });

        let client = OAuthClient::new(config(server.url("/token"))).unwrap();
        let grant = GrantRequest::AuthorizationCode { code: "stale".into() };
        match client.exchange(&grant).await {
            Err(HubError::Upstream { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("expected upstream pass-through, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_not_upstream() {
        // Nothing listens here; the failure must not masquerade as a CRM
        // verdict.
        let client = OAuthClient::new(config("http://127.0.0.1:1/token".into())).unwrap();
        let grant = GrantRequest::Password { username: "u".into(), password: "p".into() };
        match client.exchange(&grant).await {
            Err(HubError::Network(_)) => {}
            other => panic!("expected network failure, got {other:?}"),
        }
    }
}

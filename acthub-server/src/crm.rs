//! CRM REST client
//!
//! One consolidated client for every resource call the actions make.
//! Error semantics mirror the token exchange: a non-2xx verdict is passed
//! through with its status and body; transport failures surface as 502.

use acthub_authflow::exchange::REQUEST_TIMEOUT;
use acthub_core::HubError;
use serde_json::Value;

/// CRM REST API version all resource paths are pinned to.
pub const API_VERSION: &str = "v63.0";

pub struct CrmClient {
    http: reqwest::Client,
    api_base: String,
}

impl CrmClient {
    pub fn new(api_base: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, api_base: api_base.into() })
    }

    fn data_url(&self, path: &str) -> String {
        format!("{}/services/data/{}/{}", self.api_base.trim_end_matches('/'), API_VERSION, path)
    }

    async fn handle(response: Result<reqwest::Response, reqwest::Error>) -> Result<(u16, String), HubError> {
        let response = response.map_err(|e| HubError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HubError::Network(e.to_string()))?;
        if status.is_success() {
            Ok((status.as_u16(), body))
        } else {
            tracing::warn!(target: "crm", status = %status, "resource call rejected");
            Err(HubError::Upstream { status: status.as_u16(), body })
        }
    }

    /// Create records through the composite sobjects endpoint. The
    /// composite API reports per-record failure inside an HTTP 200, so
    /// the first record's `success` flag is part of the verdict.
    pub async fn create_records(&self, token: &str, records: Vec<Value>) -> Result<(), HubError> {
        let payload = serde_json::json!({ "allOrNone": false, "records": records });
        let response = self
            .http
            .post(self.data_url("composite/sobjects"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await;
        let (status, body) = Self::handle(response).await?;

        let accepted = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get(0).and_then(|r| r.get("success")).and_then(Value::as_bool))
            .unwrap_or(false);
        if accepted {
            Ok(())
        } else {
            Err(HubError::Upstream { status, body })
        }
    }

    /// Post a chatter feed element (plain text, poll or question shapes
    /// are built by the caller).
    pub async fn post_feed_element(&self, token: &str, element: Value) -> Result<(), HubError> {
        let response = self
            .http
            .post(self.data_url("chatter/feed-elements/"))
            .bearer_auth(token)
            .json(&element)
            .send()
            .await;
        Self::handle(response).await.map(|_| ())
    }

    /// Run a SOQL query and return the parsed response document.
    pub async fn query(&self, token: &str, soql: &str) -> Result<Value, HubError> {
        let url = format!("{}?q={}", self.data_url("query/"), urlencoding::encode(soql));
        let response = self.http.get(url).bearer_auth(token).send().await;
        let (_, body) = Self::handle(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| HubError::Internal(anyhow::anyhow!("malformed query response: {}", e)))
    }

    /// Identity of the token's user.
    pub async fn userinfo(&self, token: &str) -> Result<Value, HubError> {
        let url = format!("{}/services/oauth2/userinfo", self.api_base.trim_end_matches('/'));
        let response = self.http.get(url).bearer_auth(token).send().await;
        let (_, body) = Self::handle(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| HubError::Internal(anyhow::anyhow!("malformed userinfo response: {}", e)))
    }
}

//! Process configuration, loaded once at startup
//!
//! Secrets and endpoints come from the environment and are passed into
//! component constructors explicitly; nothing reads the environment
//! after boot.

use anyhow::{anyhow, Result};

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Bind address for the HTTP listener.
    pub listen_addr: String,
    /// Shared secret the hub client presents on every request.
    pub hub_secret: String,
    /// 64 hex characters keying the state token codec.
    pub state_key: String,
    /// Public base URL of this deployment, used to build the form and
    /// execute URLs advertised in the integration list.
    pub base_url: String,
    /// Where the browser is sent after a completed OAuth callback.
    /// Explicit rather than derived from `base_url`; some deployments
    /// point it at a different host.
    pub form_redirect_url: String,
    pub crm: CrmConfig,
}

#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub token_url: String,
    pub authorize_url: String,
    /// Root of the CRM REST API, e.g. `https://tenant.my.crm.example.com`.
    pub api_base: String,
    pub client_id: String,
    pub client_secret: String,
    /// Service account for the password-grant actions.
    pub username: String,
    pub password: String,
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("{} environment variable not set", name))
}

impl HubConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            listen_addr: std::env::var("ACTHUB_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            hub_secret: required("ACTHUB_SECRET")?,
            state_key: required("ACTHUB_STATE_KEY")?,
            base_url: required("ACTHUB_BASE_URL")?,
            form_redirect_url: required("ACTHUB_FORM_REDIRECT_URL")?,
            crm: CrmConfig {
                token_url: required("CRM_TOKEN_URL")?,
                authorize_url: required("CRM_AUTHORIZE_URL")?,
                api_base: required("CRM_API_BASE")?,
                client_id: required("CRM_CLIENT_ID")?,
                client_secret: required("CRM_CLIENT_SECRET")?,
                username: required("CRM_USERNAME")?,
                password: required("CRM_PASSWORD")?,
            },
        })
    }

    /// `{base_url}/{path}` with exactly one separating slash.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

//! Application state shared by all handlers

use crate::config::HubConfig;
use crate::crm::CrmClient;
use acthub_authflow::{Authenticator, OAuthClient, OAuthConfig, StateTokenCodec};
use acthub_store::{DatabaseConfig, FieldEncryption, SessionStore, SqliteSessionStore};
use anyhow::Result;
use std::sync::Arc;

/// Everything a handler needs, built once at startup and cloned per
/// request. Components receive their secrets at construction; there are
/// no ambient lookups on the request path.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HubConfig>,
    pub authenticator: Arc<Authenticator>,
    pub codec: Arc<StateTokenCodec>,
    pub sessions: Arc<dyn SessionStore>,
    pub oauth: Arc<OAuthClient>,
    pub crm: Arc<CrmClient>,
}

impl AppState {
    /// Wire the components from a config and a session store.
    pub fn new(config: HubConfig, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        let authenticator = Authenticator::new(config.hub_secret.clone());
        let codec = StateTokenCodec::from_hex(&config.state_key)?;
        let oauth = OAuthClient::new(OAuthConfig {
            token_url: config.crm.token_url.clone(),
            authorize_url: config.crm.authorize_url.clone(),
            client_id: config.crm.client_id.clone(),
            client_secret: config.crm.client_secret.clone(),
            redirect_uri: config.public_url("campaign-oauth"),
        })?;
        let crm = CrmClient::new(config.crm.api_base.clone())?;

        Ok(Self {
            config: Arc::new(config),
            authenticator: Arc::new(authenticator),
            codec: Arc::new(codec),
            sessions,
            oauth: Arc::new(oauth),
            crm: Arc::new(crm),
        })
    }

    /// Production wiring: durable SQLite store from the environment,
    /// schema migrated, tokens encrypted at rest when a key is set.
    pub async fn from_config(config: HubConfig) -> Result<Self> {
        let db_cfg = DatabaseConfig::from_env();
        let pool = acthub_store::get_pool(&db_cfg).await?;
        acthub_store::migrate::run(&pool).await?;
        let encryption = match FieldEncryption::from_env() {
            Ok(enc) => Some(enc),
            Err(e) => {
                tracing::warn!("session tokens stored without encryption: {}", e);
                None
            }
        };
        let sessions: Arc<dyn SessionStore> = Arc::new(SqliteSessionStore::new(pool, encryption));
        Self::new(config, sessions)
    }
}

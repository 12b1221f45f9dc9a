use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let dsn = std::env::var("ACTHUB_DB_URL")
            .unwrap_or_else(|_| "sqlite:./data/acthub.db".to_string());
        let max_connections = std::env::var("ACTHUB_DB_MAX_CONN")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);
        Self { dsn, max_connections }
    }
}

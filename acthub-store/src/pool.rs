use crate::config::DatabaseConfig;
use crate::error::{Result, StoreError};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

pub type DbPool = Pool<Sqlite>;

pub async fn get_pool(cfg: &DatabaseConfig) -> Result<DbPool> {
    if cfg.dsn.starts_with("sqlite:") && !cfg.dsn.contains(":memory:") {
        let path = cfg.dsn.strip_prefix("sqlite:").unwrap_or(&cfg.dsn);
        let path = path.strip_prefix("//").unwrap_or(path);
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Other(anyhow::anyhow!(e)))?;
        }
        if !std::path::Path::new(path).exists() {
            if let Err(e) = std::fs::File::create(path) {
                // sqlx may still create it; the directory is what matters
                tracing::warn!("Failed to pre-create sqlite file {}: {}", path, e);
            }
        }
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.dsn)
        .await
        .map_err(StoreError::Db)?;
    Ok(pool)
}

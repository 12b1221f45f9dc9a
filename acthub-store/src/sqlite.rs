//! SQLite-backed session store

use crate::encryption::{EncryptedField, FieldEncryption};
use crate::error::StoreError;
use crate::pool::DbPool;
use crate::session::{SessionRecord, SessionStore};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use sqlx::Row;

/// Durable session store. Tokens are encrypted at rest when an encryption
/// key is configured; without one they are stored base64-encoded with a
/// marker nonce (development setups only).
pub struct SqliteSessionStore {
    pool: DbPool,
    encryption: Option<FieldEncryption>,
}

impl SqliteSessionStore {
    pub fn new(pool: DbPool, encryption: Option<FieldEncryption>) -> Self {
        Self { pool, encryption }
    }

    fn encrypt(&self, plaintext: &str) -> Result<EncryptedField> {
        if let Some(enc) = &self.encryption {
            enc.encrypt_field(plaintext)
        } else {
            Ok(EncryptedField {
                data: STANDARD.encode(plaintext),
                nonce: STANDARD.encode("no-encryption"),
            })
        }
    }

    fn decrypt(&self, ef: &EncryptedField) -> Result<String> {
        let nonce_bytes = STANDARD.decode(&ef.nonce)?;
        if nonce_bytes.as_slice() == b"no-encryption" {
            let bytes = STANDARD.decode(&ef.data)?;
            return Ok(String::from_utf8(bytes)?);
        }
        match &self.encryption {
            Some(enc) => enc.decrypt_field(ef),
            None => Err(anyhow!("record is encrypted but no encryption key is configured")),
        }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn store(&self, state_url: &str, token: &str) -> Result<()> {
        let ef = self.encrypt(token)?;
        let now = Utc::now();

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM sessions WHERE state_url = ?")
            .bind(state_url)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Db)?;
        if existing > 0 {
            sqlx::query(
                "UPDATE sessions SET token_encrypted = ?, token_nonce = ?, created_at = ? WHERE state_url = ?",
            )
            .bind(&ef.data)
            .bind(&ef.nonce)
            .bind(now)
            .bind(state_url)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Db)?;
        } else {
            sqlx::query(
                "INSERT INTO sessions (state_url, token_encrypted, token_nonce, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(state_url)
            .bind(&ef.data)
            .bind(&ef.nonce)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Db)?;
        }
        tracing::debug!(target: "session_store", key = %state_url, "stored session record");
        Ok(())
    }

    async fn consume(&self, state_url: &str) -> Result<Option<SessionRecord>> {
        // Single-statement read-and-delete: racing consumers for one key
        // cannot both receive the record.
        let row = sqlx::query(
            "DELETE FROM sessions WHERE state_url = ? RETURNING token_encrypted, token_nonce, created_at",
        )
        .bind(state_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::Db)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let ef = EncryptedField {
            data: row.try_get("token_encrypted").map_err(StoreError::Db)?,
            nonce: row.try_get("token_nonce").map_err(StoreError::Db)?,
        };
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(StoreError::Db)?;
        let token = self.decrypt(&ef)?;
        tracing::debug!(target: "session_store", key = %state_url, "consumed session record");
        Ok(Some(SessionRecord {
            state_url: state_url.to_string(),
            token,
            created_at,
        }))
    }

    async fn clear(&self, state_url: &str) -> Result<bool> {
        let res = sqlx::query("DELETE FROM sessions WHERE state_url = ?")
            .bind(state_url)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Db)?;
        Ok(res.rows_affected() > 0)
    }

    async fn cleanup_stale(&self, max_age: Duration) -> Result<usize> {
        let cutoff = Utc::now() - max_age;
        let res = sqlx::query("DELETE FROM sessions WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Db)?;
        Ok(res.rows_affected() as usize)
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Db)?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::pool::get_pool;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir, encryption: Option<FieldEncryption>) -> SqliteSessionStore {
        let cfg = DatabaseConfig {
            dsn: format!("sqlite:{}/sessions.db", dir.path().display()),
            max_connections: 5,
        };
        let pool = get_pool(&cfg).await.unwrap();
        crate::migrate::run(&pool).await.unwrap();
        SqliteSessionStore::new(pool, encryption)
    }

    #[tokio::test]
    async fn test_consume_returns_record_exactly_once() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, None).await;

        store.store("https://hub/callback", "abc").await.unwrap();
        let record = store.consume("https://hub/callback").await.unwrap().unwrap();
        assert_eq!(record.token, "abc");
        assert!(store.consume("https://hub/callback").await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_overwrites_existing_key() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, None).await;

        store.store("k", "first").await.unwrap();
        store.store("k", "second").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.consume("k").await.unwrap().unwrap().token, "second");
    }

    #[tokio::test]
    async fn test_token_is_encrypted_at_rest() {
        let dir = TempDir::new().unwrap();
        let enc = FieldEncryption::new(FieldEncryption::generate_key());
        let store = open_store(&dir, Some(enc)).await;

        store.store("k", "super-secret-token").await.unwrap();
        let raw: String = sqlx::query_scalar("SELECT token_encrypted FROM sessions WHERE state_url = 'k'")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_ne!(raw, "super-secret-token");
        assert_ne!(raw, STANDARD.encode("super-secret-token"));

        assert_eq!(store.consume("k").await.unwrap().unwrap().token, "super-secret-token");
    }

    #[tokio::test]
    async fn test_survives_pool_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir, None).await;
            store.store("k", "persisted").await.unwrap();
        }
        // New pool over the same file, as after a process restart
        let store = open_store(&dir, None).await;
        assert_eq!(store.consume("k").await.unwrap().unwrap().token, "persisted");
    }

    #[tokio::test]
    async fn test_cleanup_stale() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, None).await;

        store.store("old", "t1").await.unwrap();
        store.store("fresh", "t2").await.unwrap();
        let old_stamp = Utc::now() - Duration::hours(48);
        sqlx::query("UPDATE sessions SET created_at = ? WHERE state_url = 'old'")
            .bind(old_stamp)
            .execute(&store.pool)
            .await
            .unwrap();

        let removed = store.cleanup_stale(Duration::hours(24)).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.consume("old").await.unwrap().is_none());
        assert!(store.consume("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_missing_key_is_false() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, None).await;
        assert!(!store.clear("nothing-here").await.unwrap());
    }
}

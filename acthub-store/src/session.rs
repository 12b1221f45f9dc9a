//! Session store contract and in-memory implementation

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One-time session record bridging an OAuth callback and the form
/// request that follows it. Keyed by the hub client's callback URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub state_url: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(state_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            state_url: state_url.into(),
            token: token.into(),
            created_at: Utc::now(),
        }
    }
}

/// Abstract interface for session persistence.
///
/// Absence of a record is a normal condition (the user has not finished
/// the OAuth dance yet), never an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Upsert a record; overwrites any prior record for the same key.
    async fn store(&self, state_url: &str, token: &str) -> Result<()>;

    /// Atomically read and delete the record if present. Two racing
    /// consumers for the same key must not both receive it.
    async fn consume(&self, state_url: &str) -> Result<Option<SessionRecord>>;

    /// Explicit delete for records a handler decided are stale.
    async fn clear(&self, state_url: &str) -> Result<bool>;

    /// Drop records older than `max_age`, returning how many were
    /// removed. Bounds leakage from abandoned logins.
    async fn cleanup_stale(&self, max_age: Duration) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

/// In-memory implementation, for tests and single-process setups.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn store(&self, state_url: &str, token: &str) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(state_url.to_string(), SessionRecord::new(state_url, token));
        Ok(())
    }

    async fn consume(&self, state_url: &str) -> Result<Option<SessionRecord>> {
        let mut sessions = self.sessions.write().unwrap();
        Ok(sessions.remove(state_url))
    }

    async fn clear(&self, state_url: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().unwrap();
        Ok(sessions.remove(state_url).is_some())
    }

    async fn cleanup_stale(&self, max_age: Duration) -> Result<usize> {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.write().unwrap();
        let stale: Vec<String> = sessions
            .iter()
            .filter(|(_, record)| record.created_at < cutoff)
            .map(|(k, _)| k.clone())
            .collect();
        let count = stale.len();
        for key in stale {
            sessions.remove(&key);
        }
        Ok(count)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.sessions.read().unwrap().len())
    }
}

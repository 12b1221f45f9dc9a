//! Durable session persistence for the OAuth relay.
//!
//! An OAuth callback and the form request that follows it are handled by
//! independent stateless invocations; this crate is the only state that
//! crosses that boundary. Records are one-time: written by the callback
//! handler, consumed (read-and-deleted) by the next form render.

pub mod config;
pub mod encryption;
pub mod error;
pub mod migrate;
pub mod pool;
pub mod session;
pub mod sqlite;

// Convenient re-exports
pub use config::DatabaseConfig;
pub use encryption::{EncryptedField, FieldEncryption};
pub use error::{Result, StoreError};
pub use pool::{get_pool, DbPool};
pub use session::{MemorySessionStore, SessionRecord, SessionStore};
pub use sqlite::SqliteSessionStore;

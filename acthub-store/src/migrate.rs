use crate::error::Result;
use crate::pool::DbPool;

/// Create the session schema if it does not exist yet. Safe to run on
/// every startup.
pub async fn run(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            state_url TEXT PRIMARY KEY,
            token_encrypted TEXT NOT NULL,
            token_nonce TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_created_at ON sessions(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

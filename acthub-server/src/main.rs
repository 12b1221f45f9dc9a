use acthub_server::{router, AppState, HubConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("acthub=info,tower_http=info")),
        )
        .init();

    let config = HubConfig::from_env()?;
    let listen_addr = config.listen_addr.clone();
    let state = AppState::from_config(config).await?;

    // Opportunistic garbage collection of abandoned logins; there is no
    // background work, so this runs once per process start.
    let removed = state.sessions.cleanup_stale(chrono::Duration::hours(24)).await?;
    if removed > 0 {
        tracing::info!(removed, "removed stale session records");
    }

    let app = router(state);
    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "acthub listening");
    axum::serve(listener, app).await?;

    Ok(())
}

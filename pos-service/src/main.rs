use anyhow::Context;
use pos_service::{app, AppState, ServiceConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env().context("invalid pos-service configuration")?;
    if config.demo_mode {
        tracing::warn!("demo mode enabled: built-in admin credentials are accepted");
    }
    let addr = config.addr();
    let state = AppState::with_demo_data(config);
    let router = app(state);

    let listener = TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "starting pos-service");
    axum::serve(listener, router).await?;
    Ok(())
}

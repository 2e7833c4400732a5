use anyhow::Result;
use sitewatch_server::app;
use sitewatch_server::config::ServerConfig;
use sitewatch_server::scheduler::TickScheduler;
use sitewatch_server::state::AppState;
use sitewatch_store::RuleStore;
use std::net::SocketAddr;
use std::path::Path;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sitewatch=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("config/server.toml");

    let config = if Path::new(config_path).exists() {
        ServerConfig::load(config_path)?
    } else {
        tracing::info!(path = config_path, "no config file, using defaults");
        ServerConfig::default()
    };

    tracing::info!(
        http_port = config.http_port,
        data_dir = %config.data_dir,
        tick_secs = config.tick_secs,
        retention = %config.retention_range,
        "sitewatch-server starting"
    );

    let store = RuleStore::open(Path::new(&config.data_dir))?;
    let state = AppState::new(config.clone(), store);

    let scheduler = TickScheduler::new(state.clone());
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run().await;
    });

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let app = app::build_http_app(state);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(http = %http_addr, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("shutting down gracefully");
        })
        .await?;

    scheduler_handle.abort();
    tracing::info!("server stopped");

    Ok(())
}

//! Demo binary: start the server, announce it, wait for Ctrl+C, stop.

use std::path::PathBuf;

use axum::{routing::get, Router};
use clap::Parser;

use portico::config::ServiceConfig;
use portico::http::ServerHandle;
use portico::observability::logging;
use portico::registry;

#[derive(Parser)]
#[command(name = "portico", about = "HTTP service lifecycle manager")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    logging::init(config.server.mode);

    tracing::info!(
        listen_address = %config.server.listen_address,
        mode = ?config.server.mode,
        "configuration loaded"
    );

    let app = Router::new().route("/health", get(|| async { "ok" }));
    let server = ServerHandle::start(app, config.server.clone()).await;

    // Register after start so the announced address is the one actually
    // bound (matters when listening on port 0).
    if let Some(reg) = &config.registry {
        registry::report(
            &reg.url,
            &server.local_addr().to_string(),
            &reg.username,
            &reg.password,
        )
        .await;
    }

    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");

    server.stop().await;
    Ok(())
}

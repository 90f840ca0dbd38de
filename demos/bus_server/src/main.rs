//! bus_server: WebSocket server streaming simulated bus positions.
//!
//! Run with the sample configuration from the workspace root:
//!
//! ```text
//! cargo run -p bus_server -- --config demos/bus_server/config.example.json
//! ```
//!
//! then connect a client to `ws://127.0.0.1:8080/ws` and send
//! `{"type":"start","location":{"lat":40.4168,"lon":-3.7038}}`.
//! Set `BT_DIRECTIONS_KEY` to follow real streets instead of straight lines.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bt_push::{AppState, ServerConfig, router};

#[derive(Debug, Parser)]
#[command(name = "bus_server", about = "Streams simulated bus positions over WebSocket")]
struct Args {
    /// JSON configuration file.  Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address; overrides the file and BT_BIND.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config.apply_env();
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let bind = config.bind.clone();
    let state = AppState::from_config(config).context("building server state")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!("listening on ws://{bind}/ws");

    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("shutdown signal received"); }
    }

    Ok(())
}

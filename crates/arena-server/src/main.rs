//! Streme Arena Server
//!
//! Public JSON API where agents register, submit launched tokens and compete
//! on a metrics leaderboard.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use arena_core::Store;
use arena_core::config::load_config;
use arena_core::tracing_init::{LogFormat, default_filter, init_tracing};
use clap::Parser;
use tracing::info;

use arena_server::upstream::{DexScreenerMetrics, StremeVerifier, build_http_client};
use arena_server::{AppState, build_router};

#[derive(Parser, Debug)]
#[command(name = "arena-server")]
#[command(version, about = "Streme Arena API - agent token launch competition")]
struct Args {
    /// Address to listen on.
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Directory holding the arena document.
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Optional JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Streme API base URL.
    #[arg(long)]
    verifier_url: Option<String>,

    /// DexScreener API base URL.
    #[arg(long)]
    metrics_url: Option<String>,

    /// Chain whose pairs are ranked.
    #[arg(long)]
    chain: Option<String>,

    /// Outbound request timeout in seconds.
    #[arg(long)]
    http_timeout: Option<u64>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(addr) = args.addr {
        config.listen_addr = addr;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(url) = args.verifier_url {
        config.verifier_base_url = url;
    }
    if let Some(url) = args.metrics_url {
        config.metrics_base_url = url;
    }
    if let Some(chain) = args.chain {
        config.target_chain = chain;
    }
    if let Some(secs) = args.http_timeout {
        config.http_timeout_secs = secs;
    }

    init_tracing(
        &default_filter(&config.log_level),
        LogFormat::from_json_flag(args.log_json),
    );

    info!(
        addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        chain = %config.target_chain,
        "Starting arena-server"
    );

    let store = Arc::new(Store::open(&config.data_dir).await?);
    let http = build_http_client(config.http_timeout())?;
    let verifier = StremeVerifier::new(http.clone(), &config.verifier_base_url)?;
    let metrics = DexScreenerMetrics::new(http, &config.metrics_base_url, &config.target_chain)?;

    let state = AppState::new(
        store,
        Arc::new(verifier),
        Arc::new(metrics),
        config.metrics_ttl()?,
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("Arena server stopped");
    Ok(())
}

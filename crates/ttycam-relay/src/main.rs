//! ttycam relay server entry point.
//!
//! Binds one UDP socket, spawns the bandwidth decay tick and the Ctrl-C
//! handler, then hands the socket to the dispatch loop.
//!
//! Usage: `ttycam-relay [config.toml]` — without an argument the built-in
//! defaults (127.0.0.1:6969) apply.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::net::UdpSocket;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ttycam_relay::config::load_config;
use ttycam_relay::stats::{spawn_decay_tick, BandwidthStats};
use ttycam_relay::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref()).context("loading relay config")?;
    let addr = config.socket_addr().context("validating relay config")?;

    let socket = UdpSocket::bind(addr)
        .await
        .with_context(|| format!("binding UDP socket on {addr}"))?;
    info!("listening on {} ...", socket.local_addr()?);

    let stats = Arc::new(BandwidthStats::new(Duration::from_secs(
        config.stats_interval_secs,
    )));
    let running = Arc::new(AtomicBool::new(true));

    spawn_decay_tick(Arc::clone(&stats), Arc::clone(&running));

    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    server::run(socket, stats, running).await
}

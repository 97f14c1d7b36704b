//! ttycam client entry point.
//!
//! Wires capture, audio, and the terminal renderer into one session against
//! the configured relay.
//!
//! Usage: `ttycam <config.toml>` — the config must name the relay address
//! and a display name.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ttycam_client::audio::{spawn_audio_capture, spawn_playback, NullSink, SilenceSource};
use ttycam_client::capture::{spawn_capture, TestPatternSource};
use ttycam_client::config::load_config;
use ttycam_client::session;
use ttycam_client::terminal::AnsiTerminal;

/// Height of the captured test pattern, in rows.
const CAPTURE_HEIGHT: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())
        .context("loading client config")?
        .validate()
        .context("validating client config")?;

    let running = Arc::new(AtomicBool::new(true));

    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    let frames = spawn_capture(
        Box::new(TestPatternSource::new(config.width as usize, CAPTURE_HEIGHT)),
        Arc::clone(&running),
    );
    let audio = spawn_audio_capture(Box::new(SilenceSource), Arc::clone(&running));
    let playback = spawn_playback(Box::new(NullSink));
    let mut term = AnsiTerminal::new();

    session::run(&config, running, frames, audio, playback, &mut term).await
}

//! The client session: one connected UDP socket, capture in, rendering out.
//!
//! Datagram handling is a synchronous method on [`SessionState`] so the
//! receive path is testable without sockets; the async loop around it only
//! moves bytes.  The state (reassembler, last rendered frame) is owned by the
//! loop task and needs no lock.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use ttycam_core::protocol::envelope::{self, Envelope};
use ttycam_core::protocol::reassembly::DEFAULT_CHUNK_TTL;
use ttycam_core::{chunk_frame_data, encode_frame, CharFrame, Reassembler};

use crate::audio::PlaybackQueue;
use crate::config::ClientConfig;
use crate::terminal::{self, Terminal};

/// Receive buffer size; comfortably above the largest chunk plus envelope.
const RECV_BUFFER_SIZE: usize = 2048;

/// How often the blocked select is interrupted to re-check the running flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

/// How often stale partial frames are swept out of the reassembler.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Receive-side state of one session.
pub struct SessionState {
    reassembler: Reassembler,
    last_frame: Option<CharFrame>,
    hide: bool,
}

impl SessionState {
    pub fn new(hide: bool) -> Self {
        Self {
            reassembler: Reassembler::new(),
            last_frame: None,
            hide,
        }
    }

    /// Handles one datagram from the relay.
    ///
    /// A completed video frame is rendered against the previously rendered
    /// one (unless `hide` is set), audio goes to the playback queue, and
    /// everything else is logged.  Malformed input never aborts the session.
    pub fn handle_datagram<T: Terminal + ?Sized>(
        &mut self,
        datagram: &[u8],
        term: &mut T,
        playback: &PlaybackQueue,
    ) {
        let parsed = match Envelope::parse(datagram) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("dropping undecodable datagram: {e}");
                return;
            }
        };

        match parsed {
            Envelope::Frame(payload) => match self.reassembler.catch(payload) {
                Ok(Some(frame)) => {
                    if !self.hide {
                        terminal::display(&frame, self.last_frame.as_ref(), term);
                    }
                    self.last_frame = Some(frame);
                }
                Ok(None) => {}
                Err(e) => warn!("dropping bad frame chunk: {e}"),
            },
            Envelope::Audio(segment) => playback.enqueue(segment.to_vec()),
            Envelope::Info(msg) => {
                debug!(msg = %String::from_utf8_lossy(msg), "server info");
            }
            Envelope::Error(reason) => {
                warn!(reason = %String::from_utf8_lossy(reason), "server error");
            }
            Envelope::Unknown(data) => {
                warn!(tag = data[0], "received unknown message tag; skipping");
            }
        }
    }

    /// Drops partial frames that can no longer complete.
    pub fn sweep(&mut self) {
        self.reassembler.sweep_expired(DEFAULT_CHUNK_TTL);
    }
}

/// Runs the session until `running` clears or capture ends.
///
/// Binds an ephemeral UDP socket, announces the configured name, then
/// multiplexes captured frames out, captured audio out, and relay traffic in.
/// On exit the relay is told the peer is leaving, best effort.
pub async fn run(
    config: &ClientConfig,
    running: Arc<AtomicBool>,
    mut frames: mpsc::Receiver<CharFrame>,
    mut audio: mpsc::Receiver<Vec<u8>>,
    playback: PlaybackQueue,
    term: &mut dyn Terminal,
) -> anyhow::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("binding local UDP socket")?;
    socket
        .connect(&config.server_addr)
        .await
        .with_context(|| format!("connecting to relay at {}", config.server_addr))?;
    info!(server = %config.server_addr, "joining as {}", config.name);
    socket
        .send(&envelope::make_info(&config.name))
        .await
        .context("announcing to relay")?;

    let mut state = SessionState::new(config.hide);
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    let mut frame_id: u32 = 0;
    let mut sweep = tokio::time::interval(SWEEP_INTERVAL);

    while running.load(Ordering::Relaxed) {
        tokio::select! {
            received = socket.recv(&mut buf) => match received {
                Ok(len) => state.handle_datagram(&buf[..len], term, &playback),
                Err(e) => error!("receive error: {e}"),
            },
            frame = frames.recv() => {
                let Some(frame) = frame else {
                    info!("capture ended, leaving");
                    break;
                };
                let encoded = encode_frame(&frame);
                if encoded.is_empty() {
                    continue;
                }
                for chunk in chunk_frame_data(&encoded, config.chunk_size, frame_id) {
                    if let Err(e) = socket.send(&envelope::make_frame(&chunk.encode())).await {
                        warn!("send error: {e}");
                    }
                }
                frame_id = frame_id.wrapping_add(1);
            }
            segment = audio.recv() => {
                if let Some(segment) = segment {
                    if let Err(e) = socket.send(&envelope::make_audio(&segment)).await {
                        warn!("send error: {e}");
                    }
                }
            }
            _ = sweep.tick() => state.sweep(),
            // Wake up periodically so a shutdown signal is honored even
            // while nothing arrives.
            _ = tokio::time::sleep(SHUTDOWN_POLL) => {}
        }
    }

    if let Err(e) = socket.send(&envelope::make_error("leaving")).await {
        debug!("departure notice failed: {e}");
    }
    info!("session closed");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

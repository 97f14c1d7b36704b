//! The relay dispatch loop: read one datagram, classify it, route it.
//!
//! Routing is a pure function from (room state, source address, datagram) to
//! a list of outbound datagrams; the async loop only does socket I/O around
//! it.  The room is owned by the loop task, so it needs no lock.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

use ttycam_core::protocol::envelope::{self, Envelope};

use crate::room::Room;
use crate::stats::BandwidthStats;

/// Receive buffer size; comfortably above the largest chunk plus envelope.
const RECV_BUFFER_SIZE: usize = 2048;

/// How often the blocked receive is interrupted to re-check the running flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

/// Routes one inbound datagram, returning the datagrams to send in response.
///
/// Policy:
/// - a sender facing a full room gets `Error("full")`, nothing else happens;
/// - `Info` registers the sender and is acknowledged with `Info("ok")`;
/// - `Frame`/`Audio` are counted by `stats` and forwarded verbatim to the
///   counterpart, or answered with `Error("empty")` when there is none;
/// - `Error` removes the sender (departure signal);
/// - `Unknown` is logged and dropped.
pub fn route_datagram(
    room: &mut Room,
    stats: &BandwidthStats,
    src: SocketAddr,
    datagram: &[u8],
) -> Vec<(SocketAddr, Vec<u8>)> {
    if room.is_full(src) {
        return vec![(src, envelope::make_error("full"))];
    }

    let parsed = match Envelope::parse(datagram) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%src, "dropping undecodable datagram: {e}");
            return Vec::new();
        }
    };

    match parsed {
        Envelope::Info(name) => {
            let name = String::from_utf8_lossy(name).into_owned();
            info!(%src, name, "peer joined");
            room.add(src, name);
            vec![(src, envelope::make_info("ok"))]
        }
        Envelope::Frame(payload) => {
            stats.process_bytes(datagram.len());
            match room.other_peer(src) {
                Some(other) => vec![(other, envelope::make_frame(payload))],
                None => vec![(src, envelope::make_error("empty"))],
            }
        }
        Envelope::Audio(payload) => {
            stats.process_bytes(datagram.len());
            match room.other_peer(src) {
                Some(other) => vec![(other, envelope::make_audio(payload))],
                None => vec![(src, envelope::make_error("empty"))],
            }
        }
        Envelope::Error(reason) => {
            info!(%src, reason = %String::from_utf8_lossy(reason), "peer left");
            room.remove(src);
            Vec::new()
        }
        Envelope::Unknown(data) => {
            warn!(%src, tag = data[0], "received unknown message tag; skipping");
            Vec::new()
        }
    }
}

/// Runs the dispatch loop until `running` clears.
///
/// Transport errors are logged and skipped; the loop never gives up on a
/// malformed or partial remote message.
pub async fn run(
    socket: UdpSocket,
    stats: Arc<BandwidthStats>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let mut room = Room::new();
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    while running.load(Ordering::Relaxed) {
        let (len, src) = tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok(pair) => pair,
                Err(e) => {
                    error!("receive error: {e}");
                    continue;
                }
            },
            // Wake up periodically so a shutdown signal is honored even
            // while no traffic arrives.
            _ = tokio::time::sleep(SHUTDOWN_POLL) => continue,
        };

        debug!(%src, len, "datagram received");
        for (dest, payload) in route_datagram(&mut room, &stats, src, &buf[..len]) {
            if let Err(e) = socket.send_to(&payload, dest).await {
                warn!(%dest, "send error: {e}");
            }
        }
    }

    info!(
        total_bytes = stats.total_bytes(),
        uptime_secs = stats.uptime().as_secs(),
        "relay stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

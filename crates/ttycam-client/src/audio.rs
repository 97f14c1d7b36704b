//! Audio capture and playback plumbing.
//!
//! Audio segments are opaque byte blobs end to end: the relay forwards them
//! untouched and the session never inspects them.  Like video capture, the
//! device-facing work is blocking and lives on its own threads behind the
//! [`AudioSource`] and [`AudioSink`] traits; the built-in implementations are
//! silent no-ops for machines without sound hardware.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, trace};

/// Pacing of outbound audio segments from a live source.
pub const SEGMENT_INTERVAL: Duration = Duration::from_millis(100);

/// Capacity of the playback queue.  When playback cannot keep up, fresh
/// segments are dropped instead of accumulating latency.
const PLAYBACK_CHANNEL_CAPACITY: usize = 20;

/// Produces raw audio segments, blocking as needed.
pub trait AudioSource: Send {
    /// Returns the next captured segment, or `None` when the source is done.
    fn next_segment(&mut self) -> Option<Vec<u8>>;
}

/// Consumes raw audio segments, blocking as needed.
pub trait AudioSink: Send {
    fn play(&mut self, segment: &[u8]);
}

/// Source that never produces a segment; used when capture is unavailable.
pub struct SilenceSource;

impl AudioSource for SilenceSource {
    fn next_segment(&mut self) -> Option<Vec<u8>> {
        std::thread::sleep(SEGMENT_INTERVAL);
        Some(Vec::new())
    }
}

/// Sink that discards everything; used when playback is unavailable.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _segment: &[u8]) {}
}

/// Spawns the audio capture thread; empty segments are skipped so a
/// [`SilenceSource`] generates no traffic.
pub fn spawn_audio_capture(
    mut source: Box<dyn AudioSource>,
    running: Arc<AtomicBool>,
) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel(PLAYBACK_CHANNEL_CAPACITY);

    std::thread::spawn(move || {
        info!("audio capture thread started");
        while running.load(Ordering::Relaxed) {
            let Some(segment) = source.next_segment() else {
                break;
            };
            if segment.is_empty() {
                continue;
            }
            if tx.blocking_send(segment).is_err() {
                break;
            }
        }
        info!("audio capture thread stopped");
    });

    rx
}

/// Handle for queueing received segments toward the playback thread.
#[derive(Clone)]
pub struct PlaybackQueue {
    tx: mpsc::Sender<Vec<u8>>,
}

impl PlaybackQueue {
    /// Queues a segment, dropping it when the playback thread is behind.
    pub fn enqueue(&self, segment: Vec<u8>) {
        if self.tx.try_send(segment).is_err() {
            trace!("playback queue full, dropping audio segment");
        }
    }
}

/// Spawns the playback thread and returns its queue handle.
///
/// The thread exits when every [`PlaybackQueue`] clone is dropped.
pub fn spawn_playback(mut sink: Box<dyn AudioSink>) -> PlaybackQueue {
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(PLAYBACK_CHANNEL_CAPACITY);

    std::thread::spawn(move || {
        info!("audio playback thread started");
        while let Some(segment) = rx.blocking_recv() {
            sink.play(&segment);
        }
        info!("audio playback thread stopped");
    });

    PlaybackQueue { tx }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

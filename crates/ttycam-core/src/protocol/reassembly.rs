//! Reassembly of out-of-order frame chunks into complete frames.
//!
//! Chunks for the same `frame_id` may arrive in any order and interleaved
//! with chunks of other frames.  The reassembler keeps one pending entry per
//! frame identifier and releases the decoded frame the instant the last
//! missing chunk arrives.
//!
//! Two deliberate hardenings over a naive accumulate-and-count design:
//!
//! - chunks are keyed by sequence number, so a retransmitted duplicate is
//!   idempotent instead of inflating the arrival count;
//! - every pending entry carries its creation instant, and callers sweep
//!   entries that can no longer complete (peer crashed mid-frame, datagram
//!   lost) so the buffer cannot grow without bound.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::protocol::chunk::FrameChunk;
use crate::protocol::ProtocolError;
use crate::video::frame::CharFrame;
use crate::video::rle::decode_frame;

/// Default age after which an incomplete frame is considered lost.
pub const DEFAULT_CHUNK_TTL: Duration = Duration::from_secs(10);

/// Hard cap on simultaneously pending frames; the oldest entry is evicted
/// when a new frame would exceed it.
const MAX_PENDING_FRAMES: usize = 64;

/// Chunks received so far for one frame identifier.
#[derive(Debug)]
struct PendingFrame {
    total_chunks: u8,
    /// Fragment payloads keyed by sequence number.  The BTreeMap keeps them
    /// sorted, so completion is a straight concatenation.
    parts: BTreeMap<u8, Vec<u8>>,
    first_seen: Instant,
}

/// Accumulates [`FrameChunk`]s and emits a decoded [`CharFrame`] once all
/// chunks of a frame have arrived.
#[derive(Debug, Default)]
pub struct Reassembler {
    pending: HashMap<u32, PendingFrame>,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one `Frame` payload (an encoded chunk) into the reassembler.
    ///
    /// Returns `Ok(Some(frame))` when this chunk completed a frame,
    /// `Ok(None)` while the frame is still incomplete.
    ///
    /// A single-chunk frame (`total_chunks == 1`) is decoded immediately and
    /// never touches the pending map.
    ///
    /// # Errors
    ///
    /// Propagates [`ProtocolError`] from chunk decoding; the caller logs the
    /// error and drops the chunk without affecting other in-flight frames.
    pub fn catch(&mut self, data: &[u8]) -> Result<Option<CharFrame>, ProtocolError> {
        let chunk = FrameChunk::decode(data)?;

        if chunk.total_chunks == 1 {
            return Ok(Some(decode_frame(&chunk.data)));
        }

        let frame_id = chunk.frame_id;
        if !self.pending.contains_key(&frame_id) {
            self.evict_if_at_capacity();
        }

        let entry = self.pending.entry(frame_id).or_insert_with(|| PendingFrame {
            total_chunks: chunk.total_chunks,
            parts: BTreeMap::new(),
            first_seen: Instant::now(),
        });

        // Duplicate sequence numbers overwrite in place rather than counting twice.
        entry.parts.insert(chunk.sequence_number, chunk.data);

        if entry.parts.len() < entry.total_chunks as usize {
            return Ok(None);
        }

        let entry = self
            .pending
            .remove(&frame_id)
            .expect("entry was just inserted");
        let joined: Vec<u8> = entry.parts.into_values().flatten().collect();
        Ok(Some(decode_frame(&joined)))
    }

    /// Drops pending entries older than `max_age`, returning how many were
    /// evicted.  Intended to be driven by a periodic tick.
    pub fn sweep_expired(&mut self, max_age: Duration) -> usize {
        let before = self.pending.len();
        self.pending.retain(|frame_id, entry| {
            let keep = entry.first_seen.elapsed() <= max_age;
            if !keep {
                debug!(
                    frame_id,
                    received = entry.parts.len(),
                    expected = entry.total_chunks,
                    "evicting stale partial frame"
                );
            }
            keep
        });
        before - self.pending.len()
    }

    /// Number of frames currently awaiting more chunks.
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    fn evict_if_at_capacity(&mut self) {
        if self.pending.len() < MAX_PENDING_FRAMES {
            return;
        }
        if let Some((&oldest, _)) = self
            .pending
            .iter()
            .min_by_key(|(_, entry)| entry.first_seen)
        {
            debug!(frame_id = oldest, "pending frame cap reached, evicting oldest");
            self.pending.remove(&oldest);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Frame chunking: splitting an encoded frame into datagram-sized pieces.
//!
//! Binary layout of one chunk:
//! ```text
//! [frame_id:4 LE][sequence_number:1][total_chunks:1][data:N]
//! ```
//! Total header size: 6 bytes.

use crate::protocol::ProtocolError;

/// Size of the fixed chunk header in bytes.
pub const CHUNK_HEADER_SIZE: usize = 6;

/// One bounded-size fragment of an encoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameChunk {
    /// Identifier shared by every chunk of the same frame.
    pub frame_id: u32,
    /// 0-based position of this chunk within the frame.
    pub sequence_number: u8,
    /// How many chunks the frame was split into.  Always at least 1.
    pub total_chunks: u8,
    /// The fragment payload.
    pub data: Vec<u8>,
}

impl FrameChunk {
    /// Encodes the chunk into its binary wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(CHUNK_HEADER_SIZE + self.data.len());
        buf.extend_from_slice(&self.frame_id.to_le_bytes());
        buf.push(self.sequence_number);
        buf.push(self.total_chunks);
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Decodes one chunk from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ChunkTooShort`] when the input cannot hold the
    /// 6-byte header, and [`ProtocolError::MalformedChunk`] when the header
    /// values violate `sequence_number < total_chunks` or `total_chunks >= 1`.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < CHUNK_HEADER_SIZE {
            return Err(ProtocolError::ChunkTooShort {
                needed: CHUNK_HEADER_SIZE,
                available: bytes.len(),
            });
        }

        let frame_id = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let sequence_number = bytes[4];
        let total_chunks = bytes[5];

        if total_chunks == 0 {
            return Err(ProtocolError::MalformedChunk(
                "total_chunks must be at least 1".to_string(),
            ));
        }
        if sequence_number >= total_chunks {
            return Err(ProtocolError::MalformedChunk(format!(
                "sequence_number {sequence_number} out of range for {total_chunks} chunk(s)"
            )));
        }

        Ok(Self {
            frame_id,
            sequence_number,
            total_chunks,
            data: bytes[CHUNK_HEADER_SIZE..].to_vec(),
        })
    }
}

/// Splits `data` into consecutive chunks of at most `max_chunk_size` bytes.
///
/// The final chunk may be shorter; concatenating the chunk payloads in
/// sequence order reproduces `data` exactly.  Empty input yields no chunks.
///
/// `max_chunk_size` must be at least 1 (the caller's configuration layer
/// clamps it well above that).
pub fn chunk_frame_data(data: &[u8], max_chunk_size: usize, frame_id: u32) -> Vec<FrameChunk> {
    debug_assert!(max_chunk_size >= 1, "chunk size must be positive");

    let total = data.len().div_ceil(max_chunk_size);
    debug_assert!(total <= u8::MAX as usize, "frame too large for u8 chunk count");

    data.chunks(max_chunk_size)
        .enumerate()
        .map(|(idx, slice)| FrameChunk {
            frame_id,
            sequence_number: idx as u8,
            total_chunks: total as u8,
            data: slice.to_vec(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

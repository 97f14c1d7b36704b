//! Wire protocol: message envelope, frame chunking, and reassembly.

pub mod chunk;
pub mod envelope;
pub mod reassembly;

use thiserror::Error;

/// Errors that can occur while decoding wire data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A zero-length datagram carries no type tag and cannot be parsed.
    #[error("empty datagram")]
    EmptyDatagram,

    /// The byte slice is shorter than the fixed frame-chunk header.
    #[error("frame chunk too small: need at least {needed} bytes, got {available}")]
    ChunkTooShort { needed: usize, available: usize },

    /// A chunk header carried values that can never describe a valid chunk.
    #[error("malformed chunk: {0}")]
    MalformedChunk(String),
}

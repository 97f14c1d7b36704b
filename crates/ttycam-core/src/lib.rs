//! # ttycam-core
//!
//! Shared library for ttycam containing the datagram wire protocol,
//! the run-length frame codec, and the chunk reassembly logic.
//!
//! This crate is used by both the relay server and the client application.
//! It has zero dependencies on sockets, OS APIs, or terminal I/O.
//!
//! - **`protocol`** – How bytes travel over the wire.  Every datagram starts
//!   with a one-byte type tag ([`protocol::Envelope`]); oversized encoded
//!   frames are split into bounded [`protocol::FrameChunk`]s and put back
//!   together by a [`protocol::Reassembler`].
//!
//! - **`video`** – The character grid itself: a [`CharFrame`] is one rendered
//!   capture instant, run-length compressed for transmission and diffed
//!   against its predecessor for incremental terminal redraws.

pub mod protocol;
pub mod video;

// Re-export the most-used types at the crate root so callers can write
// `ttycam_core::CharFrame` instead of `ttycam_core::video::frame::CharFrame`.
pub use protocol::chunk::{chunk_frame_data, FrameChunk, CHUNK_HEADER_SIZE};
pub use protocol::envelope::Envelope;
pub use protocol::reassembly::Reassembler;
pub use protocol::ProtocolError;
pub use video::frame::{CellUpdate, CharFrame};
pub use video::rle::{decode_frame, encode_frame};

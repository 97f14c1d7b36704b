//! Character-grid frames: the frame type, run-length codec, and diffing.

pub mod frame;
pub mod rle;

pub use frame::{CellUpdate, CharFrame};
pub use rle::{decode_frame, encode_frame};

//! Run-length codec for character frames.
//!
//! Encoded layout: byte 0 is the column count (0–255), followed by repeated
//! `(run_length, character)` byte pairs.  The scan is row-major and a run may
//! span a row boundary; row boundaries are reconstructed purely from the
//! column count, never stored per row.  Encode and decode must agree on
//! exactly this row-folding rule for round trips to hold.

use crate::video::frame::CharFrame;

/// Run-length-encodes a frame.
///
/// Runs longer than 255 cells are split into multiple `(255, ch)` pairs plus
/// a remainder.  An empty frame (zero rows, or a zero-length first row)
/// encodes to an empty byte sequence.
pub fn encode_frame(frame: &CharFrame) -> Vec<u8> {
    if frame.is_empty() {
        return Vec::new();
    }

    let mut output = vec![frame.num_cols() as u8];
    let mut run: Option<(char, u8)> = None;

    for (_, _, ch) in frame.cells() {
        run = match run {
            Some((prev, count)) if prev == ch => {
                if count == u8::MAX {
                    output.push(u8::MAX);
                    output.push(prev as u8);
                    Some((ch, 1))
                } else {
                    Some((prev, count + 1))
                }
            }
            Some((prev, count)) => {
                output.push(count);
                output.push(prev as u8);
                Some((ch, 1))
            }
            None => Some((ch, 1)),
        };
    }

    if let Some((ch, count)) = run {
        output.push(count);
        output.push(ch as u8);
    }

    output
}

/// Decodes a run-length byte sequence back into a frame.
///
/// Empty input decodes to the empty frame.  The flat character stream is
/// reshaped into rows of the declared column count; a trailing partial run
/// pair or partial row in malformed input is dropped rather than padded.
pub fn decode_frame(data: &[u8]) -> CharFrame {
    let Some((&cols, pairs)) = data.split_first() else {
        return CharFrame::empty();
    };
    let cols = cols as usize;
    if cols == 0 {
        return CharFrame::empty();
    }

    let mut flat = Vec::new();
    for pair in pairs.chunks_exact(2) {
        let (count, ch) = (pair[0] as usize, pair[1] as char);
        flat.extend(std::iter::repeat(ch).take(count));
    }

    let rows = flat.chunks_exact(cols).map(<[char]>::to_vec).collect();
    CharFrame::new(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! One-byte message envelope for every datagram on the wire.
//!
//! Wire format: byte 0 is the type tag, the rest is the payload.
//!
//! | Tag | Meaning | Payload                              |
//! |-----|---------|--------------------------------------|
//! | 0   | Info    | UTF-8 display name or `"ok"`         |
//! | 1   | Frame   | frame chunk encoding (header + data) |
//! | 2   | Audio   | raw audio byte segment               |
//! | 99  | Error   | UTF-8 reason, e.g. `"full"`          |
//! | other | Unknown | entire datagram, tag not stripped  |

use crate::protocol::ProtocolError;

/// Tag byte for [`Envelope::Info`].
pub const TAG_INFO: u8 = 0;
/// Tag byte for [`Envelope::Frame`].
pub const TAG_FRAME: u8 = 1;
/// Tag byte for [`Envelope::Audio`].
pub const TAG_AUDIO: u8 = 2;
/// Tag byte for [`Envelope::Error`].
pub const TAG_ERROR: u8 = 99;

/// A parsed datagram, discriminated by its leading tag byte.
///
/// Borrows the payload from the receive buffer; callers copy out whatever
/// needs to outlive the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope<'a> {
    /// Join/acknowledge message carrying a display name or `"ok"`.
    Info(&'a [u8]),
    /// One frame chunk of a run-length-encoded video frame.
    Frame(&'a [u8]),
    /// A raw audio segment.
    Audio(&'a [u8]),
    /// Error or departure signal with a UTF-8 reason.
    Error(&'a [u8]),
    /// Unrecognized tag.  Carries the *whole* datagram, tag byte included.
    Unknown(&'a [u8]),
}

impl<'a> Envelope<'a> {
    /// Parses one datagram into its envelope.
    ///
    /// Any tag outside the known set falls through to [`Envelope::Unknown`],
    /// which keeps the full input so the caller can log the offending byte.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::EmptyDatagram`] for zero-length input.
    pub fn parse(data: &'a [u8]) -> Result<Self, ProtocolError> {
        let tag = *data.first().ok_or(ProtocolError::EmptyDatagram)?;
        let payload = &data[1..];
        Ok(match tag {
            TAG_INFO => Envelope::Info(payload),
            TAG_FRAME => Envelope::Frame(payload),
            TAG_AUDIO => Envelope::Audio(payload),
            TAG_ERROR => Envelope::Error(payload),
            _ => Envelope::Unknown(data),
        })
    }

    /// Returns the tag byte this envelope travels under.
    ///
    /// For [`Envelope::Unknown`] this is the original unrecognized first byte.
    pub fn tag(&self) -> u8 {
        match self {
            Envelope::Info(_) => TAG_INFO,
            Envelope::Frame(_) => TAG_FRAME,
            Envelope::Audio(_) => TAG_AUDIO,
            Envelope::Error(_) => TAG_ERROR,
            Envelope::Unknown(data) => data.first().copied().unwrap_or_default(),
        }
    }

    /// Returns the payload slice (full datagram for [`Envelope::Unknown`]).
    pub fn payload(&self) -> &'a [u8] {
        match self {
            Envelope::Info(p)
            | Envelope::Frame(p)
            | Envelope::Audio(p)
            | Envelope::Error(p)
            | Envelope::Unknown(p) => p,
        }
    }
}

fn tagged(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + payload.len());
    buf.push(tag);
    buf.extend_from_slice(payload);
    buf
}

/// Builds an `Info` datagram from a display name or acknowledgement.
pub fn make_info(msg: &str) -> Vec<u8> {
    tagged(TAG_INFO, msg.as_bytes())
}

/// Builds a `Frame` datagram around an encoded frame chunk.
pub fn make_frame(chunk: &[u8]) -> Vec<u8> {
    tagged(TAG_FRAME, chunk)
}

/// Builds an `Audio` datagram around a raw audio segment.
pub fn make_audio(segment: &[u8]) -> Vec<u8> {
    tagged(TAG_AUDIO, segment)
}

/// Builds an `Error` datagram with a UTF-8 reason string.
pub fn make_error(reason: &str) -> Vec<u8> {
    tagged(TAG_ERROR, reason.as_bytes())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_strips_tag() {
        let data = make_info("alice");
        assert_eq!(Envelope::parse(&data), Ok(Envelope::Info(b"alice")));
    }

    #[test]
    fn test_parse_frame_strips_tag() {
        let data = make_frame(&[1, 2, 3]);
        assert_eq!(Envelope::parse(&data), Ok(Envelope::Frame(&[1, 2, 3][..])));
    }

    #[test]
    fn test_parse_audio_strips_tag() {
        let data = make_audio(&[0xAA, 0xBB]);
        assert_eq!(Envelope::parse(&data), Ok(Envelope::Audio(&[0xAA, 0xBB][..])));
    }

    #[test]
    fn test_parse_error_strips_tag() {
        let data = make_error("full");
        assert_eq!(Envelope::parse(&data), Ok(Envelope::Error(b"full")));
    }

    #[test]
    fn test_parse_unknown_keeps_entire_datagram() {
        // Tag 7 is not a known type; the whole input comes back untouched.
        let data = [7u8, 1, 2, 3];
        let parsed = Envelope::parse(&data).unwrap();
        assert_eq!(parsed, Envelope::Unknown(&data[..]));
        assert_eq!(parsed.tag(), 7);
    }

    #[test]
    fn test_parse_empty_datagram_is_an_error() {
        assert_eq!(Envelope::parse(&[]), Err(ProtocolError::EmptyDatagram));
    }

    #[test]
    fn test_bare_error_tag_parses_with_empty_payload() {
        // A departing client sends just the tag byte.
        assert_eq!(Envelope::parse(&[TAG_ERROR]), Ok(Envelope::Error(&[][..])));
    }

    #[test]
    fn test_make_info_round_trips_payload() {
        let data = make_info("ok");
        let parsed = Envelope::parse(&data).unwrap();
        assert_eq!(parsed.payload(), b"ok");
        assert_eq!(parsed.tag(), TAG_INFO);
    }

    #[test]
    fn test_empty_payload_envelopes_are_one_byte() {
        assert_eq!(make_info(""), vec![TAG_INFO]);
        assert_eq!(make_error(""), vec![TAG_ERROR]);
        assert_eq!(make_frame(&[]), vec![TAG_FRAME]);
        assert_eq!(make_audio(&[]), vec![TAG_AUDIO]);
    }
}

//! Hex digit helpers and the binary body codec.
//!
//! Binary payloads travel on the wire as pairs of hex digits, most
//! significant nibble first. Decoding rewrites the receive buffer in place:
//! the write cursor starts at offset 0 while reading begins at offset 3
//! (behind the `<id><sep>#` header), so the write position can never
//! overtake the read position.

use bytes::{BufMut, BytesMut};

use crate::error::ProtocolError;

/// Offset of the first hex digit in a raw binary frame (`<id><sep>#`).
pub const BINARY_BODY_OFFSET: usize = 3;

/// Encode a nibble (0–15) as an uppercase ASCII hex digit.
pub fn to_hexit(v: u8) -> u8 {
    if v <= 9 {
        b'0' + v
    } else {
        b'A' + v - 10
    }
}

/// Decode an ASCII hex digit (either case), or `None` if the byte is not one.
pub fn from_hexit(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

/// Hex-encode `data` into `out`, two digits per byte, MSN first.
pub fn encode_into(out: &mut BytesMut, data: &[u8]) {
    for &b in data {
        out.put_u8(to_hexit(b >> 4));
        out.put_u8(to_hexit(b & 0xF));
    }
}

/// Decode the binary body of a raw frame in place.
///
/// `frame` is the full received line including the 3-byte header. Hex pairs
/// from [`BINARY_BODY_OFFSET`] onward are decoded and written starting at
/// offset 0. Returns the decoded length.
pub fn decode_frame_body(frame: &mut [u8]) -> Result<usize, ProtocolError> {
    if frame.len() < BINARY_BODY_OFFSET {
        return Err(ProtocolError::BinaryFrameTooShort(frame.len()));
    }
    let hex_len = frame.len() - BINARY_BODY_OFFSET;
    if hex_len % 2 != 0 {
        return Err(ProtocolError::OddHexLength(hex_len));
    }

    let mut wp = 0;
    for rp in (BINARY_BODY_OFFSET..frame.len()).step_by(2) {
        let high = from_hexit(frame[rp]).ok_or(ProtocolError::InvalidHexDigit(frame[rp]))?;
        let low = from_hexit(frame[rp + 1]).ok_or(ProtocolError::InvalidHexDigit(frame[rp + 1]))?;
        frame[wp] = (high << 4) | low;
        wp += 1;
    }
    Ok(wp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_body(hex: &[u8]) -> Vec<u8> {
        let mut raw = b"5<#".to_vec();
        raw.extend_from_slice(hex);
        raw
    }

    #[test]
    fn test_hexit_round_trip() {
        for v in 0..16u8 {
            assert_eq!(from_hexit(to_hexit(v)), Some(v));
        }
        assert_eq!(to_hexit(10), b'A');
        assert_eq!(from_hexit(b'a'), Some(10));
        assert_eq!(from_hexit(b'g'), None);
        assert_eq!(from_hexit(b' '), None);
    }

    #[test]
    fn test_binary_round_trip_all_values() {
        let data: Vec<u8> = (0..=255u8).collect();
        let mut encoded = BytesMut::new();
        encode_into(&mut encoded, &data);
        assert_eq!(encoded.len(), data.len() * 2);

        let mut raw = frame_with_body(&encoded);
        let len = decode_frame_body(&mut raw).expect("decode should succeed");
        assert_eq!(&raw[..len], &data[..]);
    }

    #[test]
    fn test_decode_empty_body() {
        let mut raw = frame_with_body(b"");
        assert_eq!(decode_frame_body(&mut raw), Ok(0));
    }

    #[test]
    fn test_decode_odd_length_fails() {
        let mut raw = frame_with_body(b"ABC");
        assert_eq!(decode_frame_body(&mut raw), Err(ProtocolError::OddHexLength(3)));
    }

    #[test]
    fn test_decode_invalid_digit_fails() {
        let mut raw = frame_with_body(b"4G");
        assert_eq!(
            decode_frame_body(&mut raw),
            Err(ProtocolError::InvalidHexDigit(b'G'))
        );
    }

    #[test]
    fn test_decode_accepts_mixed_case() {
        let mut raw = frame_with_body(b"deadBEEF");
        let len = decode_frame_body(&mut raw).expect("decode should succeed");
        assert_eq!(&raw[..len], &[0xDE, 0xAD, 0xBE, 0xEF]);
    }
}

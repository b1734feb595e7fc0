//! Incremental frame receiver.
//!
//! The receiver consumes one byte at a time, never blocks, and emits a
//! complete frame whenever a line terminator arrives. It accepts CR, LF and
//! CRLF terminators without double-firing on CRLF, and is insensitive to how
//! the input is chunked: feeding a byte sequence one byte at a time yields
//! the same frames as feeding it whole.

use bytes::{BufMut, BytesMut};
use log::warn;

use crate::constants::MAX_FRAME_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    /// Collecting body bytes.
    Normal,
    /// A CR just completed a frame; a following LF is consumed silently.
    SeenCr,
}

/// Byte-at-a-time line receiver.
#[derive(Debug)]
pub struct FrameReceiver {
    buf: BytesMut,
    state: RxState,
    /// The in-progress line exceeded [`MAX_FRAME_SIZE`] and will be dropped.
    poisoned: bool,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    /// Create a new receiver with an empty buffer.
    pub fn new() -> Self {
        FrameReceiver {
            buf: BytesMut::with_capacity(MAX_FRAME_SIZE),
            state: RxState::Normal,
            poisoned: false,
        }
    }

    /// Consume one received byte.
    ///
    /// Returns the completed frame (terminator stripped) when `byte` ends a
    /// line, otherwise `None`. Oversized lines are dropped in their entirety
    /// once their terminator arrives.
    pub fn feed(&mut self, byte: u8) -> Option<BytesMut> {
        match self.state {
            RxState::Normal => match byte {
                b'\r' => {
                    self.state = RxState::SeenCr;
                    self.complete()
                }
                b'\n' => self.complete(),
                _ => {
                    self.append(byte);
                    None
                }
            },
            RxState::SeenCr => {
                self.state = RxState::Normal;
                if byte != b'\n' {
                    self.append(byte);
                }
                None
            }
        }
    }

    /// Get the number of buffered bytes in the current partial line.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Discard any partial line and reset the terminator state.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.state = RxState::Normal;
        self.poisoned = false;
    }

    fn append(&mut self, byte: u8) {
        if self.buf.len() >= MAX_FRAME_SIZE {
            self.poisoned = true;
            return;
        }
        self.buf.put_u8(byte);
    }

    fn complete(&mut self) -> Option<BytesMut> {
        if self.poisoned {
            warn!(
                "dropping oversized frame ({} byte limit exceeded)",
                MAX_FRAME_SIZE
            );
            self.buf.clear();
            self.poisoned = false;
            return None;
        }
        Some(self.buf.split())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collect every frame emitted while feeding `data` byte by byte.
    fn collect(rx: &mut FrameReceiver, data: &[u8]) -> Vec<Vec<u8>> {
        data.iter()
            .filter_map(|&b| rx.feed(b).map(|f| f.to_vec()))
            .collect()
    }

    #[test]
    fn test_terminator_variants() {
        for input in [&b"01<hello\r\n"[..], b"01<hello\n", b"01<hello\r"] {
            let mut rx = FrameReceiver::new();
            let frames = collect(&mut rx, input);
            assert_eq!(frames, vec![b"01<hello".to_vec()], "input {input:?}");
        }
    }

    #[test]
    fn test_crlf_does_not_double_fire() {
        let mut rx = FrameReceiver::new();
        let frames = collect(&mut rx, b"0<a\r\n0<b\r\n");
        assert_eq!(frames, vec![b"0<a".to_vec(), b"0<b".to_vec()]);
    }

    #[test]
    fn test_bare_cr_separates_frames() {
        let mut rx = FrameReceiver::new();
        let frames = collect(&mut rx, b"0<a\r0<b\r");
        assert_eq!(frames, vec![b"0<a".to_vec(), b"0<b".to_vec()]);
    }

    #[test]
    fn test_blank_lines_emit_empty_frames() {
        let mut rx = FrameReceiver::new();
        let frames = collect(&mut rx, b"\n\n");
        assert_eq!(frames, vec![Vec::new(), Vec::new()]);
    }

    #[test]
    fn test_chunking_invariance() {
        let input = b"0<hello\r\n5<#AB01\r1<read\n\r\nx";
        let mut whole = FrameReceiver::new();
        let expected = collect(&mut whole, input);

        // Split at every possible point and compare.
        for split in 0..input.len() {
            let mut rx = FrameReceiver::new();
            let mut frames = collect(&mut rx, &input[..split]);
            frames.extend(collect(&mut rx, &input[split..]));
            assert_eq!(frames, expected, "split at {split}");
        }
    }

    #[test]
    fn test_oversized_line_dropped() {
        let mut rx = FrameReceiver::new();
        let mut input = vec![b'a'; MAX_FRAME_SIZE + 10];
        input.push(b'\n');
        input.extend_from_slice(b"0<ok\n");

        let frames = collect(&mut rx, &input);
        // The oversized line vanishes; the following frame is intact.
        assert_eq!(frames, vec![b"0<ok".to_vec()]);
    }

    #[test]
    fn test_max_size_line_survives() {
        let mut rx = FrameReceiver::new();
        let mut input = vec![b'a'; MAX_FRAME_SIZE];
        input.push(b'\n');
        let frames = collect(&mut rx, &input);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), MAX_FRAME_SIZE);
    }
}

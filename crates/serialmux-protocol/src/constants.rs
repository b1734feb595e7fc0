//! Protocol constants
//!
//! Marker bytes and limits shared by the framing, dispatch and reply-writing
//! layers.

/// Stream id reserved for the control channel.
pub const CONTROL_STREAM_ID: u8 = 0;

/// Number of addressable streams (ids 1–15; id 0 is the control channel).
pub const MAX_STREAMS: usize = 15;

/// Maximum accepted frame length in bytes, terminator excluded.
///
/// Lines that grow beyond this are poisoned and dropped when their
/// terminator arrives; they are never truncated and dispatched.
pub const MAX_FRAME_SIZE: usize = 256;

/// Separator byte conventionally sent after the id in requests (`<`).
/// The dispatcher accepts any byte in this position.
pub const REQUEST_SEPARATOR: u8 = b'<';

/// Marker byte written after the id in replies (`>`).
pub const REPLY_MARKER: u8 = b'>';

/// Marker byte written after the id in unsolicited notifications (`!`).
pub const NOTIFY_MARKER: u8 = b'!';

/// Marker byte that introduces a hex-encoded binary body (`#`).
pub const BINARY_MARKER: u8 = b'#';

/// Bitmask covering every stream id (bit N-1 = stream id N).
pub const ALL_STREAMS_MASK: u16 = (1 << MAX_STREAMS) - 1;

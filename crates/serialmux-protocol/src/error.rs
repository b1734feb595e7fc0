//! Error types for the protocol engine.

use thiserror::Error;

/// Errors that can occur while decoding incoming frames.
///
/// None of these are fatal: the engine drops the offending frame, logs the
/// reason, and returns to the tick loop ready for the next one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// A binary body contained an odd number of hex digits.
    #[error("binary body has odd hex length ({0} digits)")]
    OddHexLength(usize),

    /// A binary body contained a byte that is not a hex digit.
    #[error("invalid hex digit 0x{0:02X} in binary body")]
    InvalidHexDigit(u8),

    /// A binary frame was shorter than its 3-byte header.
    #[error("binary frame too short: expected at least 3 bytes, got {0}")]
    BinaryFrameTooShort(usize),
}

/// Wire identifiers for protocol-level errors.
///
/// These appear on the wire as `error:<identifier>` in reply bodies. Stream
/// implementations can extend the vocabulary through [`ErrorId::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorId {
    /// The leading command word was not recognized.
    UnknownCommand,
    /// An argument was missing, mistyped, or left over after the command.
    InvalidArgument,
    /// The named entity (e.g. a stream id passed to `desc`) does not exist.
    UnknownEntity,
    /// A stream id was out of range or not registered.
    InvalidStreamId,
    /// A value was requested from a source that has none to give.
    NoValue,
    /// A stream-defined error identifier.
    Custom(&'static str),
}

impl ErrorId {
    /// Get the stable wire identifier for this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorId::UnknownCommand => "unknown-command",
            ErrorId::InvalidArgument => "invalid-argument",
            ErrorId::UnknownEntity => "unknown-entity",
            ErrorId::InvalidStreamId => "invalid-stream-id",
            ErrorId::NoValue => "no-value",
            ErrorId::Custom(id) => id,
        }
    }
}

impl std::fmt::Display for ErrorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_id_wire_identifiers() {
        assert_eq!(ErrorId::UnknownCommand.as_str(), "unknown-command");
        assert_eq!(ErrorId::InvalidArgument.as_str(), "invalid-argument");
        assert_eq!(ErrorId::UnknownEntity.as_str(), "unknown-entity");
        assert_eq!(ErrorId::InvalidStreamId.as_str(), "invalid-stream-id");
        assert_eq!(ErrorId::NoValue.as_str(), "no-value");
        assert_eq!(ErrorId::Custom("sensor-busy").as_str(), "sensor-busy");
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::InvalidHexDigit(b'g');
        assert_eq!(err.to_string(), "invalid hex digit 0x67 in binary body");
    }
}

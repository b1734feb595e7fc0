//! Identification stream.
//!
//! A stream-addressable variant of the control channel's `ident` command,
//! for devices that expose more than one identification signal. The body is
//! a single boolean.

use serialmux_protocol::{
    ArgParser, ErrorId, Frame, FrameWriter, IdentSignal, Outcome, Stream,
};

/// Stream driving one identification signal.
pub struct IdentStream {
    signal: Box<dyn IdentSignal>,
}

impl IdentStream {
    /// Create an ident stream over the given signal sink.
    pub fn new(signal: Box<dyn IdentSignal>) -> Self {
        IdentStream { signal }
    }
}

impl Stream for IdentStream {
    fn describe(&self, w: &mut FrameWriter<'_>) {
        w.write_str("class:ident");
    }

    fn handle_message(&mut self, frame: Frame<'_>, _w: &mut FrameWriter<'_>) -> Outcome {
        let mut p = ArgParser::new(frame.body);
        let Ok(on) = p.scan_bool() else {
            return Outcome::Failure(ErrorId::InvalidArgument);
        };
        if !p.end() {
            return Outcome::Failure(ErrorId::InvalidArgument);
        }
        self.signal.set_active(on);
        Outcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use serialmux_protocol::Encoding;
    use std::cell::Cell;
    use std::rc::Rc;

    fn call(stream: &mut IdentStream, body: &[u8]) -> Outcome {
        let mut out = BytesMut::new();
        let mut w = FrameWriter::new(&mut out);
        stream.handle_message(
            Frame {
                encoding: Encoding::Text,
                body,
            },
            &mut w,
        )
    }

    #[test]
    fn test_boolean_toggles_signal() {
        let state = Rc::new(Cell::new(false));
        let sink = state.clone();
        let mut s = IdentStream::new(Box::new(move |on| sink.set(on)));

        assert_eq!(call(&mut s, b"on"), Outcome::Success);
        assert!(state.get());
        assert_eq!(call(&mut s, b"off"), Outcome::Success);
        assert!(!state.get());
    }

    #[test]
    fn test_non_boolean_rejected() {
        let mut s = IdentStream::new(Box::new(|_on| {}));
        assert_eq!(call(&mut s, b"7"), Outcome::Failure(ErrorId::InvalidArgument));
        assert_eq!(call(&mut s, b""), Outcome::Failure(ErrorId::InvalidArgument));
        assert_eq!(
            call(&mut s, b"on off"),
            Outcome::Failure(ErrorId::InvalidArgument)
        );
    }
}

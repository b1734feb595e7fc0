//! Device selector stream.
//!
//! Lets the user physically disambiguate one device among several of the
//! same type, e.g. by pressing a button when prompted. The stream responds
//! to a boolean command that enables or disables selection, and while
//! enabled emits a `select` notification on each inactive→active edge of
//! the input.

use log::debug;
use serialmux_protocol::{ArgParser, ErrorId, Frame, FrameWriter, Outcome, Stream};

/// Input sampled by the selector, typically a debounced button.
pub trait SelectInput {
    /// Whether the input is active right now.
    fn is_selected(&mut self) -> bool;
}

impl<F: FnMut() -> bool> SelectInput for F {
    fn is_selected(&mut self) -> bool {
        self()
    }
}

/// Stream emitting a `select` notification when its input becomes active.
pub struct DeviceSelector {
    input: Box<dyn SelectInput>,
    enabled: bool,
    /// Input state on the previous poll, for edge detection.
    active: bool,
}

impl DeviceSelector {
    /// Create a selector over the given input. Selection starts disabled.
    pub fn new(input: Box<dyn SelectInput>) -> Self {
        DeviceSelector {
            input,
            enabled: false,
            active: false,
        }
    }

    /// Whether selection is currently enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            debug!("device selection {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        self.active = false;
    }
}

impl Stream for DeviceSelector {
    fn describe(&self, w: &mut FrameWriter<'_>) {
        w.write_str("class:deviceSelect");
    }

    fn handle_message(&mut self, frame: Frame<'_>, _w: &mut FrameWriter<'_>) -> Outcome {
        let mut p = ArgParser::new(frame.body);
        let Ok(enable) = p.scan_bool() else {
            return Outcome::Failure(ErrorId::InvalidArgument);
        };
        if !p.end() {
            return Outcome::Failure(ErrorId::InvalidArgument);
        }
        self.set_enabled(enable);
        Outcome::Success
    }

    fn poll(&mut self, id: u8, w: &mut FrameWriter<'_>) {
        if !self.enabled {
            return;
        }
        let current = self.input.is_selected();
        if current != self.active {
            if current {
                w.start_notification(id);
                w.write_str("select");
                w.end_frame();
            }
            self.active = current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use serialmux_protocol::Encoding;
    use std::cell::Cell;
    use std::rc::Rc;

    fn selector_with_input() -> (DeviceSelector, Rc<Cell<bool>>) {
        let pressed = Rc::new(Cell::new(false));
        let input = pressed.clone();
        (
            DeviceSelector::new(Box::new(move || input.get())),
            pressed,
        )
    }

    fn enable(s: &mut DeviceSelector) {
        let mut out = BytesMut::new();
        let mut w = FrameWriter::new(&mut out);
        let outcome = s.handle_message(
            Frame {
                encoding: Encoding::Text,
                body: b"on",
            },
            &mut w,
        );
        assert_eq!(outcome, Outcome::Success);
    }

    fn poll(s: &mut DeviceSelector) -> Vec<u8> {
        let mut out = BytesMut::new();
        let mut w = FrameWriter::new(&mut out);
        s.poll(4, &mut w);
        out.to_vec()
    }

    #[test]
    fn test_notifies_on_rising_edge_only() {
        let (mut s, pressed) = selector_with_input();
        enable(&mut s);

        assert!(poll(&mut s).is_empty());

        pressed.set(true);
        assert_eq!(poll(&mut s), b"4!select\r\n");
        // Held down: no repeat.
        assert!(poll(&mut s).is_empty());

        pressed.set(false);
        assert!(poll(&mut s).is_empty());
        pressed.set(true);
        assert_eq!(poll(&mut s), b"4!select\r\n");
    }

    #[test]
    fn test_disabled_selector_is_silent() {
        let (mut s, pressed) = selector_with_input();
        pressed.set(true);
        assert!(poll(&mut s).is_empty());
    }

    #[test]
    fn test_disable_resets_edge_state() {
        let (mut s, pressed) = selector_with_input();
        enable(&mut s);
        pressed.set(true);
        assert_eq!(poll(&mut s), b"4!select\r\n");

        // Disable then re-enable while still held: the held state counts as
        // a fresh edge again.
        let mut out = BytesMut::new();
        let mut w = FrameWriter::new(&mut out);
        s.handle_message(
            Frame {
                encoding: Encoding::Text,
                body: b"off",
            },
            &mut w,
        );
        enable(&mut s);
        assert_eq!(poll(&mut s), b"4!select\r\n");
    }
}

//! Mode selector stream.
//!
//! Exposes a fixed set of named operating modes. `mode` with no argument
//! queries the active mode; `mode <name>` requests a switch through the
//! [`ModeSwitch`] contract.

use serialmux_protocol::{ArgParser, ErrorId, Frame, FrameWriter, Outcome, Stream};

/// Result of a mode switch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// Switch completed; the caller replies `ok`.
    Done,
    /// Switch accepted; the client should wait this many milliseconds
    /// before issuing further commands. The caller replies `ok wait:<ms>`.
    Wait(u32),
    /// Switch failed. The implementation has already written the error
    /// reply body.
    Failed,
}

/// Contract for performing the actual mode change. Only invoked when the
/// requested mode differs from the active one.
pub trait ModeSwitch {
    /// Switch from mode index `from` to `to`. On [`ModeChange::Failed`] the
    /// implementation must write the error body itself.
    fn switch(&mut self, from: usize, to: usize, w: &mut FrameWriter<'_>) -> ModeChange;
}

impl<F: FnMut(usize, usize) -> ModeChange> ModeSwitch for F {
    fn switch(&mut self, from: usize, to: usize, _w: &mut FrameWriter<'_>) -> ModeChange {
        self(from, to)
    }
}

/// Stream exposing a set of named modes, one of which is active.
pub struct ModeSelector {
    names: Vec<String>,
    active: usize,
    switcher: Box<dyn ModeSwitch>,
}

impl ModeSelector {
    /// Create a selector over the given mode names. The first mode is
    /// active initially.
    ///
    /// # Panics
    ///
    /// Panics if `names` is empty; a selector always has an active mode.
    pub fn new(
        names: impl IntoIterator<Item = impl Into<String>>,
        switcher: Box<dyn ModeSwitch>,
    ) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert!(!names.is_empty(), "mode list must not be empty");
        ModeSelector {
            names,
            active: 0,
            switcher,
        }
    }

    /// The name of the active mode.
    pub fn active_mode(&self) -> &str {
        &self.names[self.active]
    }
}

impl Stream for ModeSelector {
    fn describe(&self, w: &mut FrameWriter<'_>) {
        w.write_str("class:modeSelect modes:[");
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                w.write_space();
            }
            w.write_str(name);
        }
        w.write_str("]");
    }

    fn handle_message(&mut self, frame: Frame<'_>, w: &mut FrameWriter<'_>) -> Outcome {
        let mut p = ArgParser::new(frame.body);
        let Ok(word) = p.scan_word() else {
            return Outcome::Failure(ErrorId::InvalidArgument);
        };
        if word != "mode" {
            return Outcome::Failure(ErrorId::UnknownCommand);
        }

        // Query form.
        if p.end() {
            w.write_str("mode ");
            w.write_str(&self.names[self.active]);
            return Outcome::Handled;
        }

        let Ok(name) = p.scan_word() else {
            return Outcome::Failure(ErrorId::InvalidArgument);
        };
        if !p.end() {
            return Outcome::Failure(ErrorId::InvalidArgument);
        }

        let Some(requested) = self.names.iter().position(|n| n == name) else {
            return Outcome::Failure(ErrorId::UnknownEntity);
        };
        if requested == self.active {
            return Outcome::Success;
        }

        match self.switcher.switch(self.active, requested, w) {
            ModeChange::Done => {
                self.active = requested;
                Outcome::Success
            }
            ModeChange::Wait(ms) => {
                self.active = requested;
                w.write_ok_wait(ms);
                Outcome::Handled
            }
            ModeChange::Failed => Outcome::Handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use serialmux_protocol::Encoding;

    fn call(stream: &mut ModeSelector, body: &[u8]) -> (Outcome, Vec<u8>) {
        let mut out = BytesMut::new();
        let mut w = FrameWriter::new(&mut out);
        let outcome = stream.handle_message(
            Frame {
                encoding: Encoding::Text,
                body,
            },
            &mut w,
        );
        (outcome, out.to_vec())
    }

    fn selector() -> ModeSelector {
        ModeSelector::new(
            ["idle", "run", "cal"],
            Box::new(|_from: usize, _to: usize| ModeChange::Done),
        )
    }

    #[test]
    fn test_query_active_mode() {
        let mut s = selector();
        let (outcome, body) = call(&mut s, b"mode");
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(body, b"mode idle");
    }

    #[test]
    fn test_switch_mode() {
        let mut s = selector();
        let (outcome, body) = call(&mut s, b"mode run");
        assert_eq!(outcome, Outcome::Success);
        assert!(body.is_empty());
        assert_eq!(s.active_mode(), "run");
    }

    #[test]
    fn test_switch_to_current_is_noop_success() {
        let mut s = ModeSelector::new(
            ["idle", "run"],
            Box::new(|_: usize, _: usize| -> ModeChange { panic!("switcher must not run") }),
        );
        let (outcome, _) = call(&mut s, b"mode idle");
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_switch_with_wait() {
        let mut s = ModeSelector::new(
            ["idle", "spin"],
            Box::new(|_: usize, _: usize| ModeChange::Wait(500)),
        );
        let (outcome, body) = call(&mut s, b"mode spin");
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(body, b"ok wait:500");
        assert_eq!(s.active_mode(), "spin");
    }

    #[test]
    fn test_failed_switch_keeps_mode() {
        struct Refuse;
        impl ModeSwitch for Refuse {
            fn switch(&mut self, _: usize, _: usize, w: &mut FrameWriter<'_>) -> ModeChange {
                w.write_error(ErrorId::Custom("mode-locked"));
                ModeChange::Failed
            }
        }
        let mut s = ModeSelector::new(["idle", "run"], Box::new(Refuse));
        let (outcome, body) = call(&mut s, b"mode run");
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(body, b"error:mode-locked");
        assert_eq!(s.active_mode(), "idle");
    }

    #[test]
    fn test_unknown_mode() {
        let mut s = selector();
        let (outcome, _) = call(&mut s, b"mode warp");
        assert_eq!(outcome, Outcome::Failure(ErrorId::UnknownEntity));
    }

    #[test]
    fn test_unknown_command() {
        let mut s = selector();
        let (outcome, _) = call(&mut s, b"speed 5");
        assert_eq!(outcome, Outcome::Failure(ErrorId::UnknownCommand));
    }

    #[test]
    #[should_panic(expected = "mode list must not be empty")]
    fn test_empty_mode_list_rejected() {
        ModeSelector::new(
            std::iter::empty::<&str>(),
            Box::new(|_: usize, _: usize| ModeChange::Done),
        );
    }

    #[test]
    fn test_describe() {
        let s = selector();
        let mut out = BytesMut::new();
        let mut w = FrameWriter::new(&mut out);
        s.describe(&mut w);
        assert_eq!(&out[..], &b"class:modeSelect modes:[idle run cal]"[..]);
    }
}

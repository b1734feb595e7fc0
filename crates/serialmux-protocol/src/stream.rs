//! The stream capability contract.
//!
//! Concrete streams (sensors, actuators, selectors) implement [`Stream`] to
//! become dispatchable and schedulable. The engine owns the registered
//! implementations and routes frames addressed to their ids; streams only
//! ever write inside a frame the engine has opened for them, except in
//! [`Stream::poll`] where they frame their own notifications.

use crate::error::ErrorId;
use crate::writer::FrameWriter;

/// Body encoding of a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Plain ASCII text.
    Text,
    /// Binary, already hex-decoded by the dispatcher.
    Binary,
}

/// One received frame, routed to a stream handler. Ephemeral: the body
/// borrows the receive buffer and is only valid for the handler call.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Body encoding.
    pub encoding: Encoding,
    /// Frame body, with framing header and terminator stripped.
    pub body: &'a [u8],
}

/// Result of a stream message handler, controlling what the dispatcher
/// appends to the open reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Operation succeeded; the dispatcher writes `ok`.
    Success,
    /// Operation failed; the dispatcher writes the matching error.
    Failure(ErrorId),
    /// The handler already wrote its full reply body; the dispatcher only
    /// closes the frame.
    Handled,
}

/// Contract implemented by addressable streams (ids 1–15).
pub trait Stream {
    /// Write this stream's self-description into the open reply.
    fn describe(&self, w: &mut FrameWriter<'_>);

    /// Handle one frame addressed to this stream.
    ///
    /// The dispatcher has already opened the reply frame; the handler writes
    /// at most the reply body and signals via [`Outcome`] what the
    /// dispatcher should append before closing it.
    fn handle_message(&mut self, frame: Frame<'_>, w: &mut FrameWriter<'_>) -> Outcome;

    /// Whether this stream is capable of periodic reporting. Static; checked
    /// once when the reporting mask is configured.
    fn can_report(&self) -> bool {
        false
    }

    /// Whether this stream should report right now. Dynamic; checked on
    /// every scheduler firing. Override to mute reports while a value is
    /// invalid or unchanged.
    fn should_report(&self) -> bool {
        true
    }

    /// Write the periodic report body into the open notification frame.
    fn report(&mut self, _w: &mut FrameWriter<'_>) {}

    /// Called once per engine tick, outside any frame. `id` is the stream's
    /// registered id. Streams that emit async notifications (e.g. a selector
    /// becoming active) open, write and close those frames here.
    fn poll(&mut self, _id: u8, _w: &mut FrameWriter<'_>) {}
}

/// Sink for the device-wide identification signal driven by the control
/// channel's `ident` command. Raw pin access stays outside the engine; this
/// is the whole contract.
pub trait IdentSignal {
    /// Turn the identification signal on or off.
    fn set_active(&mut self, on: bool);
}

impl<F: FnMut(bool)> IdentSignal for F {
    fn set_active(&mut self, on: bool) {
        self(on)
    }
}

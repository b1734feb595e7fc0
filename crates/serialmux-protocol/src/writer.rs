//! Reply and notification frame writer.
//!
//! All output framing goes through [`FrameWriter`]: the dispatcher opens a
//! reply (`<idHex>>`) or the scheduler a notification (`<idHex>!`), handlers
//! write the body, and the frame is closed with CRLF. Because the engine is
//! single-threaded, a frame is always fully written before control returns,
//! so replies and notifications never interleave.

use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};

use crate::constants::{BINARY_MARKER, NOTIFY_MARKER, REPLY_MARKER};
use crate::error::ErrorId;
use crate::hex;

/// Writer over the engine's transmit buffer.
///
/// The body-writing methods are framing-oblivious; it is the caller's
/// responsibility to bracket them with [`start_reply`](Self::start_reply) /
/// [`start_notification`](Self::start_notification) and
/// [`end_frame`](Self::end_frame).
#[derive(Debug)]
pub struct FrameWriter<'a> {
    out: &'a mut BytesMut,
}

impl<'a> FrameWriter<'a> {
    /// Create a writer appending to `out`.
    pub fn new(out: &'a mut BytesMut) -> Self {
        FrameWriter { out }
    }

    /// Open a reply frame on the given stream id.
    pub fn start_reply(&mut self, id: u8) {
        self.out.put_u8(hex::to_hexit(id));
        self.out.put_u8(REPLY_MARKER);
    }

    /// Open a notification frame on the given stream id.
    pub fn start_notification(&mut self, id: u8) {
        self.out.put_u8(hex::to_hexit(id));
        self.out.put_u8(NOTIFY_MARKER);
    }

    /// Close the current frame with CRLF.
    pub fn end_frame(&mut self) {
        self.out.put_slice(b"\r\n");
    }

    /// Write a string verbatim.
    pub fn write_str(&mut self, s: &str) {
        self.out.put_slice(s.as_bytes());
    }

    /// Write a single space.
    pub fn write_space(&mut self) {
        self.out.put_u8(b' ');
    }

    /// Write a stream id as a single uppercase hex digit.
    pub fn write_id(&mut self, id: u8) {
        self.out.put_u8(hex::to_hexit(id));
    }

    /// Write an integer in decimal.
    pub fn write_int(&mut self, v: i32) {
        let _ = write!(self.out, "{v}");
    }

    /// Write a float with the given number of decimal places.
    pub fn write_float(&mut self, v: f32, decimal_places: usize) {
        let _ = write!(self.out, "{v:.decimal_places$}");
    }

    /// Write a boolean as `true` or `false`.
    pub fn write_bool(&mut self, v: bool) {
        self.write_str(if v { "true" } else { "false" });
    }

    /// Write a double-quoted string. Escaping is not supported; the value
    /// must not contain `"`.
    pub fn write_quoted(&mut self, s: &str) {
        self.out.put_u8(b'"');
        self.write_str(s);
        self.out.put_u8(b'"');
    }

    /// Write a `key:` prefix.
    pub fn write_key(&mut self, key: &str) {
        self.write_str(key);
        self.out.put_u8(b':');
    }

    /// Write the success body `ok`.
    pub fn write_ok(&mut self) {
        self.write_str("ok");
    }

    /// Write `ok wait:<ms>`, advising the client not to issue further
    /// commands before `wait_ms` has elapsed. Advisory only: the engine
    /// does not actually suspend.
    pub fn write_ok_wait(&mut self, wait_ms: u32) {
        self.write_str("ok wait:");
        let _ = write!(self.out, "{wait_ms}");
    }

    /// Write an `error:<id>` body.
    pub fn write_error(&mut self, id: ErrorId) {
        self.write_key("error");
        self.write_str(id.as_str());
    }

    /// Extend an error body with a ` code:<code>` field.
    pub fn write_error_code(&mut self, code: i32) {
        self.write_space();
        self.write_key("code");
        self.write_int(code);
    }

    /// Extend an error body with a ` message:"..."` field.
    pub fn write_error_message(&mut self, message: &str) {
        self.write_space();
        self.write_key("message");
        self.write_quoted(message);
    }

    /// Write a binary body: the `#` marker followed by the hex encoding of
    /// `data`.
    pub fn write_binary_body(&mut self, data: &[u8]) {
        self.out.put_u8(BINARY_MARKER);
        hex::encode_into(self.out, data);
    }
}

//! The protocol engine: receive loop, frame dispatch and the reporting tick.
//!
//! The engine is the single owner of the receive buffer, the transmit
//! buffer, the stream registration table and the reporting schedule. It is
//! sans-IO: the application pushes received bytes in with [`Engine::push`],
//! drives time with [`Engine::tick`], and drains output frames with
//! [`Engine::take_output`]. All work is synchronous and bounded; nothing
//! ever blocks.

use bytes::{Bytes, BytesMut};
use log::{debug, trace, warn};

use crate::constants::{BINARY_MARKER, CONTROL_STREAM_ID, MAX_STREAMS};
use crate::error::ErrorId;
use crate::frame::FrameReceiver;
use crate::hex;
use crate::report::ReportSchedule;
use crate::stream::{Encoding, Frame, IdentSignal, Outcome, Stream};
use crate::writer::FrameWriter;

/// Single-threaded protocol engine multiplexing up to 15 streams over one
/// serial link.
pub struct Engine {
    pub(crate) descriptor: String,
    pub(crate) receiver: FrameReceiver,
    pub(crate) streams: [Option<Box<dyn Stream>>; MAX_STREAMS],
    pub(crate) ident: Option<Box<dyn IdentSignal>>,
    pub(crate) schedule: ReportSchedule,
    pub(crate) tx: BytesMut,
}

impl Engine {
    /// Create an engine with the given device descriptor, returned verbatim
    /// by the control channel's `hello` command.
    pub fn new(descriptor: impl Into<String>) -> Self {
        Engine {
            descriptor: descriptor.into(),
            receiver: FrameReceiver::new(),
            streams: std::array::from_fn(|_| None),
            ident: None,
            schedule: ReportSchedule::new(),
            tx: BytesMut::new(),
        }
    }

    /// Register a stream handler at `id` (1–15). Registering over an
    /// occupied id replaces the previous handler; out-of-range ids are
    /// ignored with a warning.
    pub fn register(&mut self, id: u8, stream: Box<dyn Stream>) {
        if id < 1 || id as usize > MAX_STREAMS {
            warn!("stream id {id} out of range, registration ignored");
            return;
        }
        let slot = &mut self.streams[(id - 1) as usize];
        if slot.is_some() {
            debug!("replacing stream handler at id {id}");
        }
        *slot = Some(stream);
    }

    /// Whether a stream is registered at `id`.
    pub fn is_registered(&self, id: u8) -> bool {
        id >= 1
            && id as usize <= MAX_STREAMS
            && self.streams[(id - 1) as usize].is_some()
    }

    /// Install the sink for the `ident` identification signal.
    pub fn set_ident(&mut self, signal: Box<dyn IdentSignal>) {
        self.ident = Some(signal);
    }

    /// The device descriptor.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Feed received bytes. Complete frames are dispatched synchronously;
    /// any replies they produce are appended to the transmit buffer.
    pub fn push(&mut self, now_ms: u64, data: &[u8]) {
        for &byte in data {
            if let Some(mut line) = self.receiver.feed(byte) {
                self.dispatch(now_ms, &mut line);
            }
        }
    }

    /// Run one cooperative tick: poll streams for async notifications, then
    /// emit periodic reports if the schedule is due.
    pub fn tick(&mut self, now_ms: u64) {
        {
            let Engine { tx, streams, .. } = self;
            let mut w = FrameWriter::new(tx);
            for (index, slot) in streams.iter_mut().enumerate() {
                if let Some(stream) = slot {
                    stream.poll((index + 1) as u8, &mut w);
                }
            }
        }

        if self.schedule.due(now_ms) {
            let Engine { tx, streams, schedule, .. } = self;
            let mut w = FrameWriter::new(tx);
            for (index, slot) in streams.iter_mut().enumerate() {
                if !schedule.contains(index) {
                    continue;
                }
                let Some(stream) = slot else { continue };
                if !stream.should_report() {
                    continue;
                }
                w.start_notification((index + 1) as u8);
                w.write_str("report ");
                stream.report(&mut w);
                w.end_frame();
            }
        }
    }

    /// Drain everything written since the last call: reply and notification
    /// frames, each fully framed and CRLF-terminated.
    pub fn take_output(&mut self) -> Bytes {
        self.tx.split().freeze()
    }

    /// Whether any output is waiting to be drained.
    pub fn has_output(&self) -> bool {
        !self.tx.is_empty()
    }

    /// Route one received frame. Frames without a verifiable address (too
    /// short, bad hexit, undecodable binary) are dropped without a reply.
    fn dispatch(&mut self, now_ms: u64, line: &mut BytesMut) {
        if line.len() < 2 {
            // Nothing to answer: no address could be verified.
            return;
        }

        let Some(id) = hex::from_hexit(line[0]) else {
            trace!("dropping frame with unparseable address byte 0x{:02X}", line[0]);
            return;
        };

        // line[1] is conventionally REQUEST_SEPARATOR but any byte is
        // accepted.

        if line.len() >= 3 && line[2] == BINARY_MARKER {
            if id == CONTROL_STREAM_ID {
                trace!("dropping binary frame addressed to the control channel");
                return;
            }
            match hex::decode_frame_body(&mut line[..]) {
                Ok(len) => self.on_stream_frame(id, Encoding::Binary, &line[..len]),
                Err(err) => warn!("dropping undecodable binary frame: {err}"),
            }
        } else if id == CONTROL_STREAM_ID {
            self.on_control_frame(now_ms, &line[2..]);
        } else {
            self.on_stream_frame(id, Encoding::Text, &line[2..]);
        }
    }

    /// Deliver a frame to the stream registered at `id` (1–15) and write the
    /// reply. An unregistered id is the one well-formed-but-unroutable case
    /// that still gets an error reply.
    fn on_stream_frame(&mut self, id: u8, encoding: Encoding, body: &[u8]) {
        let Engine { tx, streams, .. } = self;
        let mut w = FrameWriter::new(tx);
        w.start_reply(id);
        match streams[(id - 1) as usize].as_mut() {
            None => w.write_error(ErrorId::InvalidStreamId),
            Some(stream) => {
                match stream.handle_message(Frame { encoding, body }, &mut w) {
                    Outcome::Success => w.write_ok(),
                    Outcome::Failure(err) => w.write_error(err),
                    Outcome::Handled => {}
                }
            }
        }
        w.end_frame();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("descriptor", &self.descriptor)
            .field(
                "registered",
                &self
                    .streams
                    .iter()
                    .enumerate()
                    .filter_map(|(i, s)| s.as_ref().map(|_| i + 1))
                    .collect::<Vec<_>>(),
            )
            .field("schedule", &self.schedule)
            .finish()
    }
}

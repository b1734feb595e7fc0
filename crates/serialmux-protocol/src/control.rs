//! Control channel command interpreter.
//!
//! Frames addressed to stream id 0 carry device-wide management commands:
//! `hello`, `streams`, `desc <id>`, `ident <bool>` and
//! `report <bool> [<interval> [<id>...]]`. The interpreter writes only the
//! reply body; the dispatcher owns frame open/close.

use crate::args::ArgParser;
use crate::constants::{ALL_STREAMS_MASK, CONTROL_STREAM_ID, MAX_STREAMS};
use crate::engine::Engine;
use crate::error::ErrorId;
use crate::report::ReportSchedule;
use crate::stream::{IdentSignal, Stream};
use crate::writer::FrameWriter;

type StreamTable = [Option<Box<dyn Stream>>; MAX_STREAMS];

impl Engine {
    /// Execute one control-channel command and write the reply frame.
    pub(crate) fn on_control_frame(&mut self, now_ms: u64, body: &[u8]) {
        let Engine {
            tx,
            streams,
            ident,
            schedule,
            descriptor,
            ..
        } = self;
        let mut p = ArgParser::new(body);
        let mut w = FrameWriter::new(tx);
        w.start_reply(CONTROL_STREAM_ID);

        let err = match p.scan_word() {
            Err(_) => Some(ErrorId::UnknownCommand),
            Ok("hello") => cmd_hello(&mut p, &mut w, descriptor),
            Ok("streams") => cmd_streams(&mut p, &mut w, streams),
            Ok("desc") => cmd_desc(&mut p, &mut w, streams),
            Ok("ident") => cmd_ident(&mut p, &mut w, ident),
            Ok("report") => cmd_report(&mut p, &mut w, streams, schedule, now_ms),
            Ok(_) => Some(ErrorId::UnknownCommand),
        };

        if let Some(err) = err {
            w.write_error(err);
        }
        w.end_frame();
    }
}

/// `hello` — echo the device descriptor.
fn cmd_hello(p: &mut ArgParser<'_>, w: &mut FrameWriter<'_>, descriptor: &str) -> Option<ErrorId> {
    if !p.end() {
        return Some(ErrorId::InvalidArgument);
    }
    w.write_str("hello ");
    w.write_str(descriptor);
    None
}

/// `streams` — list registered ids ascending, one hex digit each.
fn cmd_streams(
    p: &mut ArgParser<'_>,
    w: &mut FrameWriter<'_>,
    streams: &StreamTable,
) -> Option<ErrorId> {
    if !p.end() {
        return Some(ErrorId::InvalidArgument);
    }
    w.write_str("streams");
    for (index, slot) in streams.iter().enumerate() {
        if slot.is_some() {
            w.write_space();
            w.write_id((index + 1) as u8);
        }
    }
    None
}

/// `desc <id>` — write the id and delegate to the stream's self-description.
fn cmd_desc(
    p: &mut ArgParser<'_>,
    w: &mut FrameWriter<'_>,
    streams: &StreamTable,
) -> Option<ErrorId> {
    let Ok(id) = p.scan_int() else {
        return Some(ErrorId::InvalidArgument);
    };
    if !p.end() {
        return Some(ErrorId::InvalidArgument);
    }
    if id < 1 || id > MAX_STREAMS as i32 {
        return Some(ErrorId::UnknownEntity);
    }
    let Some(stream) = streams[(id - 1) as usize].as_ref() else {
        return Some(ErrorId::UnknownEntity);
    };
    w.write_str("desc ");
    w.write_id(id as u8);
    w.write_space();
    stream.describe(w);
    None
}

/// `ident <bool>` — drive the identification signal, if one is installed.
fn cmd_ident(
    p: &mut ArgParser<'_>,
    w: &mut FrameWriter<'_>,
    ident: &mut Option<Box<dyn IdentSignal>>,
) -> Option<ErrorId> {
    let Ok(on) = p.scan_bool() else {
        return Some(ErrorId::InvalidArgument);
    };
    if !p.end() {
        return Some(ErrorId::InvalidArgument);
    }
    if let Some(signal) = ident {
        signal.set_active(on);
    }
    w.write_ok();
    None
}

/// `report <bool> [<interval> [<id>...]]` — reconfigure the reporting
/// schedule.
///
/// Explicitly named ids must be registered; registered-but-incapable ids are
/// silently excluded from the final mask. With no ids named, every
/// registered report-capable stream participates. On error the previous
/// schedule is left untouched.
fn cmd_report(
    p: &mut ArgParser<'_>,
    w: &mut FrameWriter<'_>,
    streams: &StreamTable,
    schedule: &mut ReportSchedule,
    now_ms: u64,
) -> Option<ErrorId> {
    let Ok(enable) = p.scan_bool() else {
        return Some(ErrorId::InvalidArgument);
    };

    if !enable {
        if !p.end() {
            return Some(ErrorId::InvalidArgument);
        }
        schedule.disable();
        w.write_ok();
        return None;
    }

    let Ok(interval) = p.scan_int() else {
        return Some(ErrorId::InvalidArgument);
    };
    if interval < 0 {
        return Some(ErrorId::InvalidArgument);
    }

    let requested = if p.end() {
        ALL_STREAMS_MASK
    } else {
        let mut mask = 0u16;
        while !p.end() {
            let Ok(id) = p.scan_int() else {
                return Some(ErrorId::InvalidArgument);
            };
            if id < 1 || id > MAX_STREAMS as i32 || streams[(id - 1) as usize].is_none() {
                return Some(ErrorId::InvalidStreamId);
            }
            mask |= 1 << (id - 1);
        }
        mask
    };

    let mut mask = 0u16;
    for (index, slot) in streams.iter().enumerate() {
        if requested & (1 << index) == 0 {
            continue;
        }
        if let Some(stream) = slot {
            if stream.can_report() {
                mask |= 1 << index;
            }
        }
    }

    schedule.arm(interval as u64, mask, now_ms);
    w.write_ok();
    None
}

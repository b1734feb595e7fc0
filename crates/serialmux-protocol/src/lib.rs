//! SerialMux Protocol Engine
//!
//! This crate implements a lightweight multiplexed command/notification
//! protocol for devices communicating over a single byte-oriented serial
//! link. One physical connection carries up to 15 independent logical
//! streams (sensors, actuators, selectors) plus a reserved control channel,
//! framed as line-terminated ASCII with an escape for hex-encoded binary
//! payloads.
//!
//! # Protocol Overview
//!
//! Each frame is one CR/LF/CRLF-terminated line:
//!
//! - **Requests** (host → device): `<idHex><sep>[#]<body>` where `idHex` is a
//!   single hex digit (0 = control channel, 1–F = stream), `<sep>` is
//!   conventionally `<` (unchecked), and an optional `#` marks a hex-encoded
//!   binary body.
//! - **Replies** (device → host): `<idHex>><body>`, echoing the addressed id.
//! - **Notifications** (device → host, unsolicited): `<idHex>!<body>`, used
//!   for periodic reports and async events.
//!
//! The control channel (id 0) accepts the management vocabulary `hello`,
//! `streams`, `desc <id>`, `report <bool> [<interval> [<id>...]]` and
//! `ident <bool>`. Errors are reported as `error:<code>`.
//!
//! # Engine Model
//!
//! The engine is sans-IO and single-threaded: the surrounding application
//! pushes received bytes in, calls [`Engine::tick`] from its main loop, and
//! drains transmit bytes out. No I/O, threads or timers live inside the
//! library.
//!
//! # Example
//!
//! ```rust
//! use serialmux_protocol::Engine;
//!
//! let mut engine = Engine::new("demo-device v1");
//! engine.push(0, b"0<hello\r\n");
//! assert_eq!(&engine.take_output()[..], b"0>hello demo-device v1\r\n");
//! ```

mod args;
mod constants;
mod control;
mod engine;
mod error;
mod frame;
mod hex;
mod report;
mod stream;
mod writer;

pub use args::*;
pub use constants::*;
pub use engine::*;
pub use error::*;
pub use frame::*;
pub use hex::*;
pub use report::*;
pub use stream::*;
pub use writer::*;

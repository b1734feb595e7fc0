//! Reference stream implementations for the SerialMux protocol engine.
//!
//! These cover the common device roles multiplexed over one serial link:
//!
//! - [`ModeSelector`] — named operating modes with a `mode` query/switch
//!   vocabulary
//! - [`IdentStream`] — a per-stream identification signal
//! - [`DeviceSelector`] — push-button device disambiguation with an async
//!   `select` notification
//! - [`ScalarSensor`] — a single-value sensor with `read`/`enable`/`set`
//!   vocabulary and periodic reporting
//!
//! All hardware access is abstracted behind one-method traits
//! ([`SelectInput`], the protocol crate's `IdentSignal`, the [`ModeSwitch`]
//! and [`SensorControl`] hooks); nothing in this crate touches pins.

mod ident;
mod mode;
mod selector;
mod sensor;

pub use ident::*;
pub use mode::*;
pub use selector::*;
pub use sensor::*;

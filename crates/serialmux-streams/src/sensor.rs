//! Scalar sensor stream.
//!
//! Holds one typed value fed in by the surrounding application. The command
//! vocabulary is:
//!
//! - `read` — reply `read <value>`, or `error:no-value` while invalid
//! - `enable` — query the enabled state; `enable <bool>` sets it
//! - `set <key>:<value> ...` — configuration transaction, delegated to the
//!   [`SensorControl`] hooks
//!
//! The sensor is report-capable; reports are gated on the value being
//! valid, so a disabled or not-yet-sampled sensor stays silent.

use log::debug;
use serialmux_protocol::{
    ArgParser, ErrorId, Frame, FrameWriter, Outcome, Stream, Value,
};

/// A value a [`ScalarSensor`] can hold and format.
pub trait SensorValue: Copy {
    /// Write the value as a report/read body.
    fn write_to(self, w: &mut FrameWriter<'_>);
}

impl SensorValue for i32 {
    fn write_to(self, w: &mut FrameWriter<'_>) {
        w.write_int(self);
    }
}

impl SensorValue for f32 {
    fn write_to(self, w: &mut FrameWriter<'_>) {
        w.write_float(self, 4);
    }
}

/// Hooks for sensor-specific enable and configuration behavior.
pub trait SensorControl {
    /// Called when the enabled state actually changes, e.g. to power a
    /// peripheral up or down.
    fn on_enabled(&mut self, _enabled: bool) {}

    /// Called when a `set` transaction begins.
    fn begin_config(&mut self) {}

    /// Called once per `key:value` argument of a `set` transaction. The
    /// implementation can apply changes immediately or buffer them until
    /// [`commit_config`](Self::commit_config).
    fn set_config(&mut self, _key: &str, _value: Value<'_>) {}

    /// Called at the end of a `set` transaction. `aborted` is true if
    /// argument parsing failed partway through. Returns true on success
    /// (the caller replies `ok`); on failure the implementation writes the
    /// error body itself and returns false.
    fn commit_config(&mut self, aborted: bool, w: &mut FrameWriter<'_>) -> bool {
        if aborted {
            w.write_error(ErrorId::InvalidArgument);
            return false;
        }
        true
    }
}

/// A [`SensorControl`] with no custom behavior.
pub struct NullControl;

impl SensorControl for NullControl {}

/// Stream exposing a single scalar value.
pub struct ScalarSensor<T: SensorValue> {
    enabled: bool,
    valid: bool,
    value: T,
    control: Box<dyn SensorControl>,
}

impl<T: SensorValue + Default> ScalarSensor<T> {
    /// Create a disabled sensor with no valid value and no custom control
    /// behavior.
    pub fn new() -> Self {
        Self::with_control(Box::new(NullControl))
    }

    /// Create a sensor with the given control hooks.
    pub fn with_control(control: Box<dyn SensorControl>) -> Self {
        ScalarSensor {
            enabled: false,
            valid: false,
            value: T::default(),
            control,
        }
    }
}

impl<T: SensorValue + Default> Default for ScalarSensor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SensorValue> ScalarSensor<T> {
    /// Whether the sensor is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the current value is valid.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// The most recent value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Store a new sample. Ignored while the sensor is disabled.
    pub fn set_value(&mut self, value: T) {
        if self.enabled {
            self.value = value;
            self.valid = true;
        }
    }

    /// Mark the current value as stale.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Enable the sensor. The control hook only fires on an actual change.
    pub fn enable(&mut self) {
        if !self.enabled {
            debug!("sensor enabled");
            self.control.on_enabled(true);
            self.enabled = true;
        }
    }

    /// Disable the sensor, invalidating any held value.
    pub fn disable(&mut self) {
        if self.enabled {
            debug!("sensor disabled, value invalidated");
            self.control.on_enabled(false);
            self.enabled = false;
            self.valid = false;
        }
    }

    fn handle_set(&mut self, p: &mut ArgParser<'_>, w: &mut FrameWriter<'_>) -> Outcome {
        self.control.begin_config();
        let mut aborted = false;
        while !p.end() {
            match p.next() {
                Err(_) => {
                    aborted = true;
                    break;
                }
                Ok(arg) => {
                    if let Some(key) = arg.key {
                        self.control.set_config(key, arg.value);
                    }
                }
            }
        }
        if self.control.commit_config(aborted, w) {
            Outcome::Success
        } else {
            Outcome::Handled
        }
    }
}

impl<T: SensorValue> Stream for ScalarSensor<T> {
    fn describe(&self, w: &mut FrameWriter<'_>) {
        w.write_str("class:scalarSensor");
    }

    fn handle_message(&mut self, frame: Frame<'_>, w: &mut FrameWriter<'_>) -> Outcome {
        let mut p = ArgParser::new(frame.body);
        let Ok(word) = p.scan_word() else {
            return Outcome::Failure(ErrorId::InvalidArgument);
        };

        match word {
            "read" => {
                if !p.end() {
                    return Outcome::Failure(ErrorId::InvalidArgument);
                }
                if !self.valid {
                    return Outcome::Failure(ErrorId::NoValue);
                }
                w.write_str("read ");
                self.value.write_to(w);
                Outcome::Handled
            }
            "enable" => {
                if p.end() {
                    w.write_str("enable ");
                    w.write_bool(self.enabled);
                    return Outcome::Handled;
                }
                let Ok(enable) = p.scan_bool() else {
                    return Outcome::Failure(ErrorId::InvalidArgument);
                };
                if !p.end() {
                    return Outcome::Failure(ErrorId::InvalidArgument);
                }
                if enable {
                    self.enable();
                } else {
                    self.disable();
                }
                Outcome::Success
            }
            "set" => self.handle_set(&mut p, w),
            _ => Outcome::Failure(ErrorId::UnknownCommand),
        }
    }

    fn can_report(&self) -> bool {
        true
    }

    fn should_report(&self) -> bool {
        self.valid
    }

    fn report(&mut self, w: &mut FrameWriter<'_>) {
        self.value.write_to(w);
    }
}

//! Turn a measured value into a `Status`
//!
//! Every check compares one number against a warning and a critical bound.
//! Critical is always tested first, so a value over both bounds is
//! critical.

use crate::Status;

/// Whether thresholds are raw counts or a percentage of some maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Absolute,
    /// Thresholds are percent of `max`
    Percentage { max: f64 },
}

impl Mode {
    /// Scale `measured` into the units the thresholds are in
    pub fn scale(self, measured: f64) -> f64 {
        match self {
            Mode::Absolute => measured,
            Mode::Percentage { max } => measured / max * 100.0,
        }
    }
}

/// A warning/critical pair
///
/// `warning <= critical` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Thresholds {
    pub fn new(warning: f64, critical: f64) -> Thresholds {
        Thresholds { warning, critical }
    }

    /// Critical at or above `critical`, warning at or above `warning`
    pub fn evaluate(&self, measured: f64) -> Status {
        if measured >= self.critical {
            Status::Critical
        } else if measured >= self.warning {
            Status::Warning
        } else {
            Status::Ok
        }
    }

    pub fn evaluate_in(&self, measured: f64, mode: Mode) -> Status {
        self.evaluate(mode.scale(measured))
    }

    /// Replication lag: critical at or above `critical`, warning only when
    /// strictly above `warning`
    pub fn evaluate_lag(&self, lag: f64) -> Status {
        if lag >= self.critical {
            Status::Critical
        } else if lag > self.warning {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

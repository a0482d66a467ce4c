//! Outbound application events.
//!
//! The [`VolumeController`](super::service::VolumeController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them (serial log today).

use serde::Serialize;

use crate::control::pwm_map::PwmLevel;
use crate::error::ActuatorError;

use super::commands::{Rejection, Volume};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The controller has started and both motors are at `level`.
    Started { level: PwmLevel },

    /// A command was accepted and written to both motors.
    LevelApplied { volume: Volume, level: PwmLevel },

    /// A command line was discarded; outputs are unchanged.
    CommandIgnored(Rejection),

    /// A motor write failed; the last confirmed level is retained.
    ActuatorFault(ActuatorError),

    /// Periodic telemetry snapshot.
    Telemetry(Telemetry),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Telemetry {
    pub level: PwmLevel,
    pub last_volume: Option<Volume>,
    pub lines_processed: u64,
    pub uptime_secs: u64,
}

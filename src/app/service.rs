//! Application service — the hexagonal core.
//!
//! [`VolumeController`] turns command lines into motor duty levels.  All I/O
//! flows through port traits injected at call sites, making the whole
//! pipeline testable with mock adapters.
//!
//! ```text
//!  LinePort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!               │     VolumeController      │
//!  MotorPort ◀──│ parse · validate · remap  │
//!               └──────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::control::pwm_map::{volume_to_pwm, PwmLevel};
use crate::error::ActuatorError;

use super::commands::{parse_command, Rejection, Volume};
use super::events::{AppEvent, Telemetry};
use super::ports::{EventSink, LinePort, MotorPort};

/// Result of one loop iteration.
///
/// `Idle` is the no-input state; every other variant is the end of a
/// processing pass over exactly one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No complete line was available.
    Idle,
    /// Both motors now run at this level.
    Applied(PwmLevel),
    /// The line was discarded; outputs unchanged.
    Ignored(Rejection),
    /// The write failed; outputs may be inconsistent until the next command.
    Failed(ActuatorError),
}

// ───────────────────────────────────────────────────────────────
// VolumeController
// ───────────────────────────────────────────────────────────────

pub struct VolumeController {
    config: ControllerConfig,
    /// Last level both channels confirmed.
    level: PwmLevel,
    last_volume: Option<Volume>,
    lines_processed: u64,
}

impl VolumeController {
    /// Construct the controller.  Does **not** touch the motors — call
    /// [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            level: PwmLevel::OFF,
            last_volume: None,
            lines_processed: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive both motors to off.
    pub fn start(
        &mut self,
        motors: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Result<(), ActuatorError> {
        motors.write_level(PwmLevel::OFF)?;
        self.level = PwmLevel::OFF;
        sink.emit(&AppEvent::Started { level: self.level });
        info!("VolumeController started, motors off");
        Ok(())
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration: take at most one line and act on it.
    pub fn poll(
        &mut self,
        link: &mut impl LinePort,
        motors: &mut impl MotorPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> Outcome {
        match link.poll_line(now_ms) {
            Some(line) => self.handle_line(&line, motors, sink),
            None => Outcome::Idle,
        }
    }

    /// Parse, validate, remap and apply one command line.
    pub fn handle_line(
        &mut self,
        line: &[u8],
        motors: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Outcome {
        self.lines_processed += 1;

        let volume = match parse_command(line, self.config.parse_mode).and_then(|c| c.validate()) {
            Ok(v) => v,
            Err(rejection) => {
                debug!("Ignoring command: {}", rejection);
                sink.emit(&AppEvent::CommandIgnored(rejection));
                return Outcome::Ignored(rejection);
            }
        };

        let level = volume_to_pwm(volume.get(), self.config.pwm_minimum);
        if let Err(e) = motors.write_level(level) {
            warn!("Motor write failed: {} (holding level {})", e, self.level);
            sink.emit(&AppEvent::ActuatorFault(e));
            return Outcome::Failed(e);
        }

        self.level = level;
        self.last_volume = Some(volume);
        debug!("volume={} -> pwm={}", volume.get(), level);
        sink.emit(&AppEvent::LevelApplied { volume, level });
        Outcome::Applied(level)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot.
    pub fn build_telemetry(&self, uptime_ms: u64) -> Telemetry {
        Telemetry {
            level: self.level,
            last_volume: self.last_volume,
            lines_processed: self.lines_processed,
            uptime_secs: uptime_ms / 1000,
        }
    }

    /// Level currently held on both motors.
    pub fn level(&self) -> PwmLevel {
        self.level
    }

    /// Most recent accepted volume, if any.
    pub fn last_volume(&self) -> Option<Volume> {
        self.last_volume
    }
}

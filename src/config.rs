//! Controller configuration parameters
//!
//! All tunable parameters for the volume-to-PWM controller.  Values are
//! compiled in; nothing is persisted across resets.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Task watchdog timeout (milliseconds).  The poll interval must stay well
/// below this or the loop will be reset.
pub const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

/// How command lines are turned into integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseMode {
    /// Leading-numeric-prefix parse; text with no digits reads as 0.
    #[default]
    Permissive,
    /// The whole line must be a decimal integer (surrounding whitespace
    /// allowed).  Anything else is ignored like an out-of-range value.
    Strict,
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Serial ---
    /// Command link baud rate
    pub link_baud_rate: u32,
    /// Debug channel baud rate
    pub debug_baud_rate: u32,
    /// A partial line idle this long is treated as complete (milliseconds)
    pub line_timeout_ms: u32,
    /// Command parsing strictness
    pub parse_mode: ParseMode,

    // --- PWM ---
    /// Lowest non-zero duty written to the motors (stall floor, 1-254)
    pub pwm_minimum: u8,

    // --- Timing ---
    /// Delay between loop iterations (milliseconds)
    pub poll_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Serial
            link_baud_rate: 9600,
            debug_baud_rate: 9600,
            line_timeout_ms: 1000,
            parse_mode: ParseMode::Permissive,

            // PWM
            pwm_minimum: 50,

            // Timing
            poll_interval_ms: 5,
            telemetry_interval_secs: 60,
        }
    }
}

impl ControllerConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if self.link_baud_rate == 0 {
            return Err(Error::Config("link_baud_rate must be non-zero"));
        }
        if self.debug_baud_rate == 0 {
            return Err(Error::Config("debug_baud_rate must be non-zero"));
        }
        if self.pwm_minimum == 0 || self.pwm_minimum == u8::MAX {
            return Err(Error::Config("pwm_minimum must be in 1..=254"));
        }
        if self.line_timeout_ms == 0 {
            return Err(Error::Config("line_timeout_ms must be non-zero"));
        }
        if self.poll_interval_ms >= WATCHDOG_TIMEOUT_MS {
            return Err(Error::Config("poll_interval_ms must be below the watchdog timeout"));
        }
        Ok(())
    }
}

//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ VolumeController (domain)
//! ```
//!
//! Driven adapters (serial link, motors, event sinks) implement these traits.
//! The [`VolumeController`](super::service::VolumeController) consumes them
//! via generics, so the domain core never touches hardware directly.

use crate::control::pwm_map::PwmLevel;
use crate::error::ActuatorError;

/// Longest command line kept, not counting leading whitespace; extra bytes
/// before the newline are dropped.
pub const MAX_LINE_LEN: usize = 64;

/// One received command line, newline stripped.
pub type Line = heapless::Vec<u8, MAX_LINE_LEN>;

// ───────────────────────────────────────────────────────────────
// Byte source (driven adapter: UART → link)
// ───────────────────────────────────────────────────────────────

/// Non-blocking byte-at-a-time reader over a serial peripheral.
pub trait ByteSource {
    /// Next received byte, or `None` if nothing is buffered right now.
    fn read_byte(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Line port (driven adapter: serial link → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain polls this for complete command lines.
pub trait LinePort {
    /// Return at most one complete line.  Must not block.
    fn poll_line(&mut self, now_ms: u64) -> Option<Line>;
}

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → PWM hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: both motor outputs, always driven together.
pub trait MotorPort {
    /// Set both channels to `level`.
    fn write_level(&mut self, level: PwmLevel) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

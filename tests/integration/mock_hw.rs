//! Mock hardware for integration tests.
//!
//! Records every motor write and serves scripted serial bytes so tests can
//! assert on the full command history without touching real UART/LEDC.

use std::collections::VecDeque;

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use volmotor::app::events::AppEvent;
use volmotor::app::ports::{ByteSource, EventSink};

// ── PWM channel ───────────────────────────────────────────────

/// 8-bit PWM output that keeps its full write history.
#[derive(Debug, Default)]
pub struct MockPwm {
    pub writes: Vec<u16>,
    /// Reject every write with `ErrorKind::Other`.
    pub fail: bool,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> Option<u16> {
        self.writes.last().copied()
    }
}

impl ErrorType for MockPwm {
    type Error = ErrorKind;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        self.writes.push(duty);
        Ok(())
    }
}

// ── Serial bytes ──────────────────────────────────────────────

/// Byte source fed by the test.
#[derive(Debug, Default)]
pub struct ScriptedUart {
    rx: VecDeque<u8>,
}

#[allow(dead_code)]
impl ScriptedUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn unread(&self) -> usize {
        self.rx.len()
    }
}

impl ByteSource for ScriptedUart {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

// ── Event sink ────────────────────────────────────────────────

/// Sink that keeps every event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignored_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandIgnored(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

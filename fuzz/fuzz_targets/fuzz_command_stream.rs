//! Fuzz target: serial bytes → `SerialLink` → `VolumeController`
//!
//! Streams arbitrary bytes through the line assembler and the controller
//! and checks that the motors only ever see 0 or a level at or above the
//! stall floor, with both channels equal.
//!
//! cargo fuzz run fuzz_command_stream

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use volmotor::adapters::serial_link::SerialLink;
use volmotor::app::events::AppEvent;
use volmotor::app::ports::{ByteSource, EventSink, MotorPort};
use volmotor::app::service::{Outcome, VolumeController};
use volmotor::config::ControllerConfig;
use volmotor::control::pwm_map::PwmLevel;
use volmotor::error::ActuatorError;

struct Bytes(VecDeque<u8>);

impl ByteSource for Bytes {
    fn read_byte(&mut self) -> Option<u8> {
        self.0.pop_front()
    }
}

struct Pair(u8, u8);

impl MotorPort for Pair {
    fn write_level(&mut self, level: PwmLevel) -> Result<(), ActuatorError> {
        self.0 = level.raw();
        self.1 = level.raw();
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = ControllerConfig::default();
    let floor = config.pwm_minimum;
    let mut link = SerialLink::new(Bytes(data.iter().copied().collect()), config.line_timeout_ms);
    let mut ctl = VolumeController::new(config);
    let mut pair = Pair(0, 0);

    // Time jumps past the line timeout between polls, so once the bytes run
    // dry one extra idle poll flushes any trailing partial line.
    let mut now_ms = 0u64;
    let mut idle = false;
    loop {
        now_ms += 2_000;
        match ctl.poll(&mut link, &mut pair, &mut Discard, now_ms) {
            Outcome::Idle if idle => break,
            Outcome::Idle => idle = true,
            Outcome::Applied(level) => {
                idle = false;
                assert!(level.is_off() || level.raw() >= floor);
            }
            Outcome::Ignored(_) | Outcome::Failed(_) => idle = false,
        }
        assert_eq!(pair.0, pair.1);
    }
});

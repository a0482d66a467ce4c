//! Integration tests for the serial → controller → motors pipeline.
//!
//! Bytes go in through a scripted UART, lines come out of the real
//! `SerialLink`, and duty writes land on two recording PWM channels.

use crate::mock_hw::{MockPwm, RecordingSink, ScriptedUart};

use volmotor::adapters::serial_link::SerialLink;
use volmotor::app::commands::Rejection;
use volmotor::app::events::AppEvent;
use volmotor::app::service::{Outcome, VolumeController};
use volmotor::config::{ControllerConfig, ParseMode};
use volmotor::control::pwm_map::PwmLevel;
use volmotor::drivers::motor::MotorPair;
use volmotor::error::{ActuatorError, Channel};

struct Rig {
    ctl: VolumeController,
    link: SerialLink<ScriptedUart>,
    motors: MotorPair<MockPwm, MockPwm>,
    sink: RecordingSink,
    now_ms: u64,
}

impl Rig {
    fn new(config: ControllerConfig) -> Self {
        let link = SerialLink::new(ScriptedUart::new(), config.line_timeout_ms);
        let mut rig = Self {
            ctl: VolumeController::new(config),
            link,
            motors: MotorPair::new(MockPwm::new(), MockPwm::new()),
            sink: RecordingSink::new(),
            now_ms: 0,
        };
        rig.ctl.start(&mut rig.motors, &mut rig.sink).unwrap();
        rig
    }

    fn send(&mut self, bytes: &[u8]) {
        self.link.source_mut().send(bytes);
    }

    fn poll(&mut self) -> Outcome {
        self.now_ms += 5;
        self.ctl
            .poll(&mut self.link, &mut self.motors, &mut self.sink, self.now_ms)
    }

    fn outputs(&self) -> (Option<u16>, Option<u16>) {
        let (a, b) = self.motors.channels();
        (a.duty(), b.duty())
    }

    fn write_count(&self) -> usize {
        self.motors.channels().0.writes.len()
    }
}

fn rig() -> Rig {
    Rig::new(ControllerConfig::default())
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_drives_both_motors_off() {
    let r = rig();
    assert_eq!(r.outputs(), (Some(0), Some(0)));
    assert!(matches!(r.sink.events[0], AppEvent::Started { .. }));
}

#[test]
fn no_input_is_a_no_op() {
    let mut r = rig();
    assert_eq!(r.poll(), Outcome::Idle);
    assert_eq!(r.poll(), Outcome::Idle);
    assert_eq!(r.write_count(), 1, "only the startup write");
}

// ── Documented scenarios ──────────────────────────────────────

#[test]
fn scenario_zero_turns_off() {
    let mut r = rig();
    r.send(b"80\n0\n");
    r.poll();
    assert_eq!(r.poll(), Outcome::Applied(PwmLevel::OFF));
    assert_eq!(r.outputs(), (Some(0), Some(0)));
}

#[test]
fn scenario_fifty_maps_to_152() {
    let mut r = rig();
    r.send(b"50\n");
    assert!(matches!(r.poll(), Outcome::Applied(l) if l.raw() == 152));
    assert_eq!(r.outputs(), (Some(152), Some(152)));
}

#[test]
fn scenario_hundred_is_full_scale() {
    let mut r = rig();
    r.send(b"100\n");
    r.poll();
    assert_eq!(r.outputs(), (Some(255), Some(255)));
}

#[test]
fn scenario_text_reads_as_zero() {
    let mut r = rig();
    r.send(b"60\nabc\n");
    r.poll();
    assert_eq!(r.poll(), Outcome::Applied(PwmLevel::OFF));
    assert_eq!(r.outputs(), (Some(0), Some(0)));
}

#[test]
fn scenario_out_of_range_leaves_outputs_alone() {
    let mut r = rig();
    r.send(b"75\n101\n-5\n1000\n");
    r.poll();
    let before = r.outputs();
    let writes_before = r.write_count();

    for expected in [101, -5, 1000] {
        assert_eq!(r.poll(), Outcome::Ignored(Rejection::OutOfRange(expected)));
    }
    assert_eq!(r.outputs(), before);
    assert_eq!(r.write_count(), writes_before);
    assert_eq!(r.sink.ignored_count(), 3);
}

#[test]
fn empty_line_turns_off() {
    let mut r = rig();
    r.send(b"40\n\n");
    r.poll();
    assert_eq!(r.poll(), Outcome::Applied(PwmLevel::OFF));
}

#[test]
fn long_leading_padding_still_parses() {
    let mut r = rig();
    let mut line = vec![b' '; 70];
    line.extend_from_slice(b"75\n");
    r.send(&line);
    assert!(matches!(r.poll(), Outcome::Applied(l) if l.raw() == 203));
}

#[test]
fn crlf_lines_are_accepted() {
    let mut r = rig();
    r.send(b"75\r\n");
    r.poll();
    assert_eq!(r.outputs(), (Some(203), Some(203)));
}

// ── Line handling ─────────────────────────────────────────────

#[test]
fn exactly_one_line_per_iteration() {
    let mut r = rig();
    r.send(b"10\n20\n30\n");
    r.poll();
    assert_eq!(r.ctl.last_volume().map(|v| v.get()), Some(10));
    assert_eq!(r.link.source_mut().unread(), 6);
    r.poll();
    r.poll();
    assert_eq!(r.ctl.last_volume().map(|v| v.get()), Some(30));
    assert_eq!(r.poll(), Outcome::Idle);
}

#[test]
fn unterminated_line_applies_after_timeout() {
    let mut r = rig();
    r.send(b"100");
    assert_eq!(r.poll(), Outcome::Idle);

    r.now_ms += 2_000;
    assert_eq!(r.poll(), Outcome::Applied(PwmLevel::FULL));
}

#[test]
fn repeated_value_is_idempotent() {
    let mut r = rig();
    r.send(b"33\n33\n");
    let first = r.poll();
    let after_first = r.outputs();
    let second = r.poll();
    assert_eq!(first, second);
    assert_eq!(r.outputs(), after_first);
}

// ── Actuator faults ───────────────────────────────────────────

#[test]
fn failed_second_channel_leaves_motors_matched() {
    let mut r = rig();
    r.send(b"50\n100\n");
    r.poll();
    assert_eq!(r.outputs(), (Some(152), Some(152)));

    r.motors.channels_mut().1.fail = true;
    assert_eq!(
        r.poll(),
        Outcome::Failed(ActuatorError::PwmWriteFailed(Channel::B))
    );
    assert_eq!(r.outputs(), (Some(152), Some(152)));
    assert_eq!(r.ctl.level().raw(), 152);
    assert!(matches!(r.sink.events.last(), Some(AppEvent::ActuatorFault(_))));
}

// ── Strict parsing ────────────────────────────────────────────

#[test]
fn strict_mode_ignores_text_instead_of_stopping() {
    let mut r = Rig::new(ControllerConfig {
        parse_mode: ParseMode::Strict,
        ..ControllerConfig::default()
    });
    r.send(b"90\nabc\n\n12abc\n");
    r.poll();
    let running = r.outputs();

    for _ in 0..3 {
        assert_eq!(r.poll(), Outcome::Ignored(Rejection::NotNumeric));
    }
    assert_eq!(r.outputs(), running);
}

#[test]
fn higher_floor_applies() {
    let mut r = Rig::new(ControllerConfig {
        pwm_minimum: 100,
        ..ControllerConfig::default()
    });
    r.send(b"1\n");
    r.poll();
    // 1 * 155 / 100 = 1 → 101
    assert_eq!(r.outputs(), (Some(101), Some(101)));
}

//! Telemetry snapshots and the log sink.

use crate::mock_hw::{MockPwm, RecordingSink};

use volmotor::adapters::log_sink::LogEventSink;
use volmotor::app::events::AppEvent;
use volmotor::app::ports::EventSink;
use volmotor::app::service::VolumeController;
use volmotor::config::ControllerConfig;
use volmotor::drivers::motor::MotorPair;

#[test]
fn telemetry_reflects_last_accepted_command() {
    let mut ctl = VolumeController::new(ControllerConfig::default());
    let mut motors = MotorPair::new(MockPwm::new(), MockPwm::new());
    let mut sink = RecordingSink::new();
    ctl.start(&mut motors, &mut sink).unwrap();

    ctl.handle_line(b"100", &mut motors, &mut sink);
    ctl.handle_line(b"250", &mut motors, &mut sink);

    let t = ctl.build_telemetry(61_000);
    assert_eq!(t.level.raw(), 255);
    assert_eq!(t.last_volume.map(|v| v.get()), Some(100));
    assert_eq!(t.lines_processed, 2);
    assert_eq!(t.uptime_secs, 61);
}

#[test]
fn telemetry_serialises_to_flat_json() {
    let ctl = VolumeController::new(ControllerConfig::default());
    let json = serde_json::to_string(&ctl.build_telemetry(0)).unwrap();
    assert_eq!(
        json,
        r#"{"level":0,"last_volume":null,"lines_processed":0,"uptime_secs":0}"#
    );
}

#[test]
fn log_sink_accepts_every_event_kind() {
    let mut ctl = VolumeController::new(ControllerConfig::default());
    let mut motors = MotorPair::new(MockPwm::new(), MockPwm::new());
    let mut recorder = RecordingSink::new();
    ctl.start(&mut motors, &mut recorder).unwrap();
    ctl.handle_line(b"42", &mut motors, &mut recorder);
    ctl.handle_line(b"-1", &mut motors, &mut recorder);

    let mut sink = LogEventSink::new();
    for event in &recorder.events {
        sink.emit(event);
    }
    sink.emit(&AppEvent::Telemetry(ctl.build_telemetry(1_000)));
    assert_eq!(recorder.events.len(), 3);
}

//! volmotor firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SerialLink<UartPort>   MotorPair<LedcChannel, LedcChannel>  │
//! │  (LinePort)             (MotorPort)                          │
//! │  LogEventSink           MonotonicClock                       │
//! │  (EventSink)                                                 │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ───────────────         │
//! │                                                              │
//! │  ┌───────────────────────────────────────────────────┐       │
//! │  │       VolumeController (pure logic)               │       │
//! │  │  parse · validate · remap · write both motors     │       │
//! │  └───────────────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::info;

use volmotor::adapters::log_sink::LogEventSink;
use volmotor::adapters::serial_link::{SerialLink, UartPort};
use volmotor::adapters::time::MonotonicClock;
use volmotor::app::events::AppEvent;
use volmotor::app::ports::EventSink;
use volmotor::app::service::VolumeController;
use volmotor::config::{ControllerConfig, WATCHDOG_TIMEOUT_MS};
use volmotor::drivers::hw_init;
use volmotor::drivers::motor::{LedcChannel, MotorPair};
use volmotor::drivers::watchdog::Watchdog;
use volmotor::error::Error;
use volmotor::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("volmotor v{}", env!("CARGO_PKG_VERSION"));

    let config = ControllerConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    // Motors first so they are driven low before anything can stall.
    hw_init::init_motor_pwm().map_err(Error::from)?;

    // Reserved for diagnostics; held open, never written.
    let _debug = UartPort::open(
        pins::DEBUG_UART_PORT,
        pins::DEBUG_UART_TX_GPIO,
        pins::DEBUG_UART_RX_GPIO,
        config.debug_baud_rate,
    )?;
    let link_uart = UartPort::open(
        pins::LINK_UART_PORT,
        pins::LINK_UART_TX_GPIO,
        pins::LINK_UART_RX_GPIO,
        config.link_baud_rate,
    )?;

    let watchdog = Watchdog::subscribe(WATCHDOG_TIMEOUT_MS);
    let clock = MonotonicClock::new();

    // ── 3. Adapters + controller ──────────────────────────────
    let mut link = SerialLink::new(link_uart, config.line_timeout_ms);
    let mut motors = MotorPair::new(LedcChannel::motor_a(), LedcChannel::motor_b());
    let mut sink = LogEventSink::new();

    let poll_interval = Duration::from_millis(u64::from(config.poll_interval_ms));
    let telemetry_every_ms = u64::from(config.telemetry_interval_secs) * 1000;

    let mut controller = VolumeController::new(config);
    controller.start(&mut motors, &mut sink)?;

    info!("System ready. Entering control loop.");

    // ── 4. Control loop ───────────────────────────────────────
    let mut next_telemetry_ms = telemetry_every_ms;

    loop {
        let now_ms = clock.uptime_ms();

        // Write failures are reported through the sink; keep polling.
        let _ = controller.poll(&mut link, &mut motors, &mut sink, now_ms);

        if telemetry_every_ms > 0 && now_ms >= next_telemetry_ms {
            sink.emit(&AppEvent::Telemetry(controller.build_telemetry(now_ms)));
            next_telemetry_ms = now_ms + telemetry_every_ms;
        }

        watchdog.feed();

        // Yield to FreeRTOS so the idle task can run.
        std::thread::sleep(poll_interval);
    }
}

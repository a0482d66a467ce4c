//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade (the ESP-IDF console UART in production).  Telemetry is rendered
//! as a single JSON object so it can be scraped off the console.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { level } => {
                info!("START | pwm={}", level);
            }
            AppEvent::LevelApplied { volume, level } => {
                debug!("LEVEL | volume={} pwm={}", volume.get(), level);
            }
            AppEvent::CommandIgnored(reason) => {
                debug!("IGNORE | {}", reason);
            }
            AppEvent::ActuatorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | encode failed: {}", e),
            },
        }
    }
}

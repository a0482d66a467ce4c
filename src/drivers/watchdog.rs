//! Task watchdog for the polling loop.
//!
//! Subscribes the main task to the ESP-IDF task watchdog so a wedged loop
//! (stuck UART driver, LEDC hang) resets the board with the motors off.
//! The loop must call [`Watchdog::feed`] every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::{info, warn};

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT to `timeout_ms` (panic on expiry) and subscribe
    /// the calling task.  Subscription failure is logged, not fatal.
    #[cfg(target_os = "espidf")]
    pub fn subscribe(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: called once from the main task during init.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK as i32 {
            warn!("Watchdog: reconfigure returned {} (may already be configured)", ret);
        }

        // SAFETY: a null handle subscribes the calling task.
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK as i32;
        if subscribed {
            info!("Watchdog: subscribed ({} ms timeout)", timeout_ms);
        } else {
            warn!("Watchdog: failed to subscribe ({})", ret);
        }

        Self { subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn subscribe(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): {} ms timeout, no-op", timeout_ms);
        if timeout_ms == 0 {
            warn!("Watchdog(sim): zero timeout would reset immediately on hardware");
        }
        Self {}
    }

    /// Reset the countdown.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: resets the TWDT entry of the calling (subscribed) task.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

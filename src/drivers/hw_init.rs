//! One-shot hardware peripheral initialisation and raw register helpers.
//!
//! Configures the LEDC timer/channels for the two motors and installs UART
//! drivers using raw ESP-IDF sys calls.  Called once from `main()` before the
//! polling loop starts.  On host builds every function is a simulation stub:
//! LEDC duty is remembered in memory and UARTs never receive anything.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

use crate::error::LinkError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerFailed(i32),
    LedcChannelFailed(u32, i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(ch, rc) => {
                write!(f, "LEDC channel {} config failed (rc={})", ch, rc)
            }
        }
    }
}

impl std::error::Error for HwInitError {}

// ── LEDC PWM ─────────────────────────────────────────────────

/// Configure timer 0 and both motor channels, duty 0.
#[cfg(target_os = "espidf")]
pub fn init_motor_pwm() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: called once from the single main task before the loop starts.
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcTimerFailed(ret));
    }

    let channels = [
        (pins::LEDC_CH_MOTOR_A, pins::MOTOR_A_PWM_GPIO),
        (pins::LEDC_CH_MOTOR_B, pins::MOTOR_B_PWM_GPIO),
    ];
    for &(channel, gpio) in &channels {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        // SAFETY: as above; the config struct outlives the call.
        let ret = unsafe { ledc_channel_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcChannelFailed(channel, ret));
        }
    }

    info!(
        "hw_init: LEDC configured ({} Hz, {}-bit, motor A=CH{}, motor B=CH{})",
        pins::MOTOR_PWM_FREQ_HZ,
        pins::PWM_RESOLUTION_BITS,
        pins::LEDC_CH_MOTOR_A,
        pins::LEDC_CH_MOTOR_B
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_motor_pwm() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): LEDC init skipped");
    Ok(())
}

/// Write `duty` to an LEDC channel.  Returns the ESP-IDF error code on failure.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_motor_pwm(); duty
    // register writes are race-free since only the main loop calls this.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
static SIM_LEDC_DUTY: [core::sync::atomic::AtomicU8; 8] =
    [const { core::sync::atomic::AtomicU8::new(0) }; 8];

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(channel: u32, duty: u8) -> Result<(), i32> {
    match SIM_LEDC_DUTY.get(channel as usize) {
        Some(slot) => {
            slot.store(duty, core::sync::atomic::Ordering::Relaxed);
            Ok(())
        }
        None => Err(-1),
    }
}

/// Last duty written to a simulated LEDC channel (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_duty(channel: u32) -> Option<u8> {
    SIM_LEDC_DUTY
        .get(channel as usize)
        .map(|slot| slot.load(core::sync::atomic::Ordering::Relaxed))
}

// ── UART ─────────────────────────────────────────────────────

/// Install the UART driver on `port` with 8N1 framing at `baud_rate`.
#[cfg(target_os = "espidf")]
pub fn uart_init(port: i32, tx_gpio: i32, rx_gpio: i32, baud_rate: u32) -> Result<(), LinkError> {
    let cfg = uart_config_t {
        baud_rate: baud_rate as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    // SAFETY: called from the single main task during init; no queue handle
    // is requested so the null pointer is permitted by the driver API.
    unsafe {
        let ret = uart_driver_install(
            port,
            pins::UART_RX_BUFFER_BYTES,
            0,
            0,
            core::ptr::null_mut(),
            0,
        );
        if ret != ESP_OK as i32 {
            return Err(LinkError::ConfigFailed(ret));
        }

        let ret = uart_param_config(port, &cfg);
        if ret != ESP_OK as i32 {
            return Err(LinkError::ConfigFailed(ret));
        }

        let ret = uart_set_pin(port, tx_gpio, rx_gpio, UART_PIN_NO_CHANGE, UART_PIN_NO_CHANGE);
        if ret != ESP_OK as i32 {
            return Err(LinkError::PinAssignFailed(ret));
        }
    }

    info!(
        "hw_init: UART{} up at {} baud (tx={}, rx={})",
        port, baud_rate, tx_gpio, rx_gpio
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_init(port: i32, _tx_gpio: i32, _rx_gpio: i32, baud_rate: u32) -> Result<(), LinkError> {
    log::info!("hw_init(sim): UART{} at {} baud (no device)", port, baud_rate);
    Ok(())
}

/// Read one byte without waiting.
#[cfg(target_os = "espidf")]
pub fn uart_read_byte(port: i32) -> Option<u8> {
    let mut byte: u8 = 0;
    // SAFETY: the driver was installed by uart_init(); `byte` is a valid
    // one-byte buffer and a zero tick timeout never blocks.
    let n = unsafe { uart_read_bytes(port, (&raw mut byte).cast(), 1, 0) };
    (n == 1).then_some(byte)
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read_byte(_port: i32) -> Option<u8> {
    None
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_ledc_remembers_duty() {
        ledc_set(7, 123).unwrap();
        assert_eq!(sim_ledc_duty(7), Some(123));
    }

    #[test]
    fn sim_ledc_rejects_unknown_channel() {
        assert_eq!(ledc_set(99, 1), Err(-1));
        assert_eq!(sim_ledc_duty(99), None);
    }
}

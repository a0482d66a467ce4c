//! GPIO / peripheral pin assignments for the volmotor board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers or peripheral indices.

// ---------------------------------------------------------------------------
// Motor outputs (two identical H-bridge / MOSFET inputs, driven in lockstep)
// ---------------------------------------------------------------------------

/// PWM output for motor A.
pub const MOTOR_A_PWM_GPIO: i32 = 11;
/// PWM output for motor B.
pub const MOTOR_B_PWM_GPIO: i32 = 10;

/// LEDC channel driving motor A.
pub const LEDC_CH_MOTOR_A: u32 = 0;
/// LEDC channel driving motor B.
pub const LEDC_CH_MOTOR_B: u32 = 1;

// ---------------------------------------------------------------------------
// Command link (HC-05 style Bluetooth SPP module on UART1)
// ---------------------------------------------------------------------------

pub const LINK_UART_PORT: i32 = 1;
pub const LINK_UART_TX_GPIO: i32 = 4;
pub const LINK_UART_RX_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Debug channel (UART2, reserved for diagnostics)
// ---------------------------------------------------------------------------

pub const DEBUG_UART_PORT: i32 = 2;
pub const DEBUG_UART_TX_GPIO: i32 = 17;
pub const DEBUG_UART_RX_GPIO: i32 = 18;

/// Driver RX ring size for both UARTs (ESP-IDF requires > 128 bytes).
pub const UART_RX_BUFFER_BYTES: i32 = 256;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels, which
/// matches the command range one-to-one.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for both motors (25 kHz — inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;

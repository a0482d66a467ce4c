//! Dual motor output driver.
//!
//! Two PWM outputs (motor A, motor B) driven in lockstep at the same duty.
//! Each output is any [`SetDutyCycle`] implementation; on the board that is
//! an [`LedcChannel`], in tests a recording mock.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`LedcChannel`] writes the LEDC duty register via hw_init.
//! On host/test: hw_init keeps the duty in memory only.

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use log::warn;

use crate::app::ports::MotorPort;
use crate::control::pwm_map::{PwmLevel, PWM_MAX};
use crate::drivers::hw_init;
use crate::error::{ActuatorError, Channel};
use crate::pins;

// ── LEDC channel ──────────────────────────────────────────────

/// ESP-IDF error code from an LEDC duty update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcError(pub i32);

impl embedded_hal::pwm::Error for LedcError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One LEDC channel previously configured by
/// [`hw_init::init_motor_pwm`].
pub struct LedcChannel {
    channel: u32,
}

impl LedcChannel {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn motor_a() -> Self {
        Self::new(pins::LEDC_CH_MOTOR_A)
    }

    pub fn motor_b() -> Self {
        Self::new(pins::LEDC_CH_MOTOR_B)
    }
}

impl ErrorType for LedcChannel {
    type Error = LedcError;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        (1u16 << pins::PWM_RESOLUTION_BITS) - 1
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(self.max_duty_cycle()) as u8;
        hw_init::ledc_set(self.channel, duty).map_err(LedcError)
    }
}

// ── Motor pair ────────────────────────────────────────────────

/// Both motor outputs behind [`MotorPort`].
pub struct MotorPair<A, B> {
    a: A,
    b: B,
    level: PwmLevel,
}

impl<A: SetDutyCycle, B: SetDutyCycle> MotorPair<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self {
            a,
            b,
            level: PwmLevel::OFF,
        }
    }

    /// Level last written successfully to both channels.
    pub fn level(&self) -> PwmLevel {
        self.level
    }

    pub fn channels(&self) -> (&A, &B) {
        (&self.a, &self.b)
    }

    pub fn channels_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.a, &mut self.b)
    }
}

impl<A: SetDutyCycle, B: SetDutyCycle> MotorPort for MotorPair<A, B> {
    fn write_level(&mut self, level: PwmLevel) -> Result<(), ActuatorError> {
        let num = u16::from(level.raw());
        let den = u16::from(PWM_MAX);

        if let Err(e) = self.a.set_duty_cycle_fraction(num, den) {
            warn!("Motor A duty write failed: {:?}", e);
            return Err(ActuatorError::PwmWriteFailed(Channel::A));
        }
        if let Err(e) = self.b.set_duty_cycle_fraction(num, den) {
            warn!("Motor B duty write failed: {:?}", e);
            // A already moved; put it back so both hold the previous level.
            let prev = u16::from(self.level.raw());
            if let Err(e) = self.a.set_duty_cycle_fraction(prev, den) {
                warn!("Motor A rollback to {} failed: {:?}", self.level, e);
            }
            return Err(ActuatorError::PwmWriteFailed(Channel::B));
        }

        self.level = level;
        Ok(())
    }
}

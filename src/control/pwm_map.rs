//! Volume → PWM duty mapping
//!
//! Integer two-point linear remap from the command domain [0, 100] onto the
//! motor range [floor, 255], with an explicit "off" at zero so the motors can
//! still be stopped despite the stall floor.

use serde::Serialize;

/// Upper bound of an accepted volume command.
pub const VOLUME_MAX: i32 = 100;
/// Full-scale duty value (8-bit PWM).
pub const PWM_MAX: u8 = 255;

/// Duty level written to both motors.
///
/// Either exactly 0 or within `[pwm_minimum, 255]` when produced by
/// [`volume_to_pwm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct PwmLevel(u8);

impl PwmLevel {
    pub const OFF: Self = Self(0);
    pub const FULL: Self = Self(PWM_MAX);

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for PwmLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Re-map `x` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// `(x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min`, with
/// the division truncating toward zero.  Out-of-range `x` extrapolates.
/// A degenerate input range returns `out_min`.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let in_span = i64::from(in_max) - i64::from(in_min);
    if in_span == 0 {
        return out_min;
    }
    let out_span = i64::from(out_max) - i64::from(out_min);
    let scaled = (i64::from(x) - i64::from(in_min)) * out_span / in_span + i64::from(out_min);
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Duty level for a validated volume in `0..=100`.
///
/// Zero always maps to [`PwmLevel::OFF`]; anything else lands in
/// `[pwm_minimum, 255]`.
pub fn volume_to_pwm(volume: u8, pwm_minimum: u8) -> PwmLevel {
    if volume == 0 {
        return PwmLevel::OFF;
    }
    let volume = i32::from(volume).min(VOLUME_MAX);
    let mapped = map_range(volume, 0, VOLUME_MAX, i32::from(pwm_minimum), i32::from(PWM_MAX));
    PwmLevel(mapped.clamp(0, i32::from(PWM_MAX)) as u8)
}

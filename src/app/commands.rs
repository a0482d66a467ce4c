//! Inbound volume commands.
//!
//! A command arrives as one line of ASCII text from the serial link.  It is
//! parsed into a [`VolumeCommand`] (any integer) and then validated into a
//! [`Volume`] (0–100) before the controller acts on it.

use serde::Serialize;

use crate::config::ParseMode;
use crate::control::pwm_map::VOLUME_MAX;

/// A parsed, not yet range-checked command value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeCommand(pub i32);

/// A command value known to lie in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Volume(u8);

impl Volume {
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Why a line did not produce a motor write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Parsed value lies outside `0..=100`.
    OutOfRange(i32),
    /// Strict mode only: the line is not a decimal integer.
    NotNumeric,
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange(v) => write!(f, "value {} outside 0..={}", v, VOLUME_MAX),
            Self::NotNumeric => write!(f, "not a decimal integer"),
        }
    }
}

impl VolumeCommand {
    pub fn validate(self) -> Result<Volume, Rejection> {
        match u8::try_from(self.0) {
            Ok(v) if i32::from(v) <= VOLUME_MAX => Ok(Volume(v)),
            _ => Err(Rejection::OutOfRange(self.0)),
        }
    }
}

/// Parse one command line (without its `\n`) according to `mode`.
///
/// Permissive mode never fails: it skips leading ASCII whitespace, accepts an
/// optional sign, and reads digits up to the first other byte.  A line with
/// no digits reads as 0.  Magnitudes beyond `i32` saturate.
pub fn parse_command(line: &[u8], mode: ParseMode) -> Result<VolumeCommand, Rejection> {
    let (value, digits, rest) = leading_integer(line);
    match mode {
        ParseMode::Permissive => Ok(VolumeCommand(value)),
        ParseMode::Strict => {
            if digits == 0 || !rest.iter().all(u8::is_ascii_whitespace) {
                return Err(Rejection::NotNumeric);
            }
            Ok(VolumeCommand(value))
        }
    }
}

/// Returns `(value, digit_count, unconsumed_tail)`.
fn leading_integer(line: &[u8]) -> (i32, usize, &[u8]) {
    let start = line
        .iter()
        .position(|b| !is_c_space(*b))
        .unwrap_or(line.len());
    let mut rest = &line[start..];

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut magnitude: i64 = 0;
    for &b in &rest[..digits] {
        // Cap one past i32::MAX so the negative bound stays reachable.
        magnitude = (magnitude * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let signed = if negative { -magnitude } else { magnitude };
    let value = signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;

    (value, digits, &rest[digits..])
}

/// C `isspace` set: includes vertical tab, which `is_ascii_whitespace` does not.
pub(crate) fn is_c_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

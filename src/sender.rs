//! Host-side command producer.
//!
//! The far end of the link measures microphone loudness and streams it as
//! volume commands.  This module holds the pure parts of that pipeline so
//! both ends agree on the scale and the wire format:
//!
//! ```text
//!  i16 PCM chunk ─▶ rms_volume ─▶ ChangeFilter ─▶ encode_line ─▶ serial
//! ```
//!
//! Audio capture and the desktop serial port are left to the host program.

use core::fmt::Write;

use crate::control::pwm_map::VOLUME_MAX;

/// Smallest change (exclusive) worth transmitting.
pub const DEFAULT_DEADBAND: u8 = 2;

/// Capacity of an encoded command: up to three digits plus `\n`.
pub type EncodedLine = heapless::String<8>;

/// Loudness of a PCM chunk on the 0–100 command scale.
///
/// `min(100, trunc(2 * rms / 32768 * 200))`, so roughly a quarter of full
/// scale RMS already saturates.  An empty chunk is silent.
pub fn rms_volume(samples: &[i16]) -> u8 {
    if samples.is_empty() {
        return 0;
    }
    let mean_square = samples
        .iter()
        .map(|&s| {
            let s = f32::from(s);
            s * s
        })
        .sum::<f32>()
        / samples.len() as f32;
    let rms = mean_square.sqrt();
    let level = (2.0 * rms / 32_768.0) * 200.0;
    level.min(VOLUME_MAX as f32) as u8
}

/// Baseline before anything has been sent, one below the command scale.
const NOTHING_SENT: i16 = -1;

/// Suppresses sends that would not visibly change the motors.
///
/// Starts from a baseline of -1, so a first reading within the deadband of
/// it (0 or 1 with the default) is held back like any other small change.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    last_sent: i16,
    deadband: u8,
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEADBAND)
    }
}

impl ChangeFilter {
    pub fn new(deadband: u8) -> Self {
        Self {
            last_sent: NOTHING_SENT,
            deadband,
        }
    }

    /// True when `volume` should go out; records it as sent if so.
    pub fn should_send(&mut self, volume: u8) -> bool {
        let volume = i16::from(volume);
        let send = (volume - self.last_sent).unsigned_abs() > u16::from(self.deadband);
        if send {
            self.last_sent = volume;
        }
        send
    }

    pub fn last_sent(&self) -> Option<u8> {
        u8::try_from(self.last_sent).ok()
    }
}

/// Wire form of a command: decimal digits followed by `\n`.
pub fn encode_line(volume: u8) -> EncodedLine {
    let mut line = EncodedLine::new();
    // 255 + '\n' is 4 bytes; cannot overflow the 8-byte buffer.
    let _ = writeln!(line, "{}", volume);
    line
}

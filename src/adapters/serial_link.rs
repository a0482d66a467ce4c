//! Serial command link.
//!
//! Turns a raw byte stream into newline-terminated command lines and exposes
//! them through [`LinePort`].  The link never blocks: bytes are drained from
//! the [`ByteSource`] only until one line completes or the source runs dry.
//!
//! A partial line that sits idle for `line_timeout_ms` is released as if its
//! newline had arrived, so a sender that never terminates its last line still
//! gets acted on.

use log::debug;

use crate::app::commands::is_c_space;
use crate::app::ports::{ByteSource, Line, LinePort, MAX_LINE_LEN};
use crate::drivers::hw_init;
use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// Line assembler
// ───────────────────────────────────────────────────────────────

/// Accumulates bytes into a bounded line buffer.
///
/// Whitespace ahead of the first other byte is consumed without being
/// stored, so padding never pushes the digits past the buffer.
pub struct LineAssembler {
    buf: Line,
    /// A line is in progress, even if nothing of it was stored.
    pending: bool,
    /// Bytes were dropped from the current line because `buf` was full.
    overflowed: bool,
    last_byte_ms: u64,
    timeout_ms: u64,
}

impl LineAssembler {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            buf: Line::new(),
            pending: false,
            overflowed: false,
            last_byte_ms: 0,
            timeout_ms: u64::from(timeout_ms),
        }
    }

    /// Feed one byte.  Returns the finished line when `byte` is `\n`.
    pub fn push(&mut self, byte: u8, now_ms: u64) -> Option<Line> {
        self.last_byte_ms = now_ms;
        if byte == b'\n' {
            return Some(self.take());
        }
        self.pending = true;
        if self.buf.is_empty() && is_c_space(byte) {
            return None;
        }
        if self.buf.push(byte).is_err() && !self.overflowed {
            debug!("Command line longer than {} bytes, truncating", MAX_LINE_LEN);
            self.overflowed = true;
        }
        None
    }

    /// Release a stale partial line, if any.
    pub fn poll_timeout(&mut self, now_ms: u64) -> Option<Line> {
        if self.pending && now_ms.saturating_sub(self.last_byte_ms) >= self.timeout_ms {
            debug!("Partial line timed out after {} ms", self.timeout_ms);
            return Some(self.take());
        }
        None
    }

    /// Bytes buffered for the line in progress.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    fn take(&mut self) -> Line {
        self.pending = false;
        self.overflowed = false;
        core::mem::take(&mut self.buf)
    }
}

// ───────────────────────────────────────────────────────────────
// SerialLink
// ───────────────────────────────────────────────────────────────

/// [`LinePort`] over any non-blocking [`ByteSource`].
pub struct SerialLink<S> {
    source: S,
    assembler: LineAssembler,
}

impl<S: ByteSource> SerialLink<S> {
    pub fn new(source: S, line_timeout_ms: u32) -> Self {
        Self {
            source,
            assembler: LineAssembler::new(line_timeout_ms),
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: ByteSource> LinePort for SerialLink<S> {
    fn poll_line(&mut self, now_ms: u64) -> Option<Line> {
        while let Some(byte) = self.source.read_byte() {
            if let Some(line) = self.assembler.push(byte, now_ms) {
                return Some(line);
            }
        }
        self.assembler.poll_timeout(now_ms)
    }
}

// ───────────────────────────────────────────────────────────────
// UART byte source
// ───────────────────────────────────────────────────────────────

/// An installed ESP-IDF UART driver, read one byte at a time.
///
/// On host builds `open` succeeds and reads always come back empty.
pub struct UartPort {
    port: i32,
}

impl UartPort {
    /// Install the driver on `port`, route it to the given pins and set 8N1
    /// framing at `baud_rate`.
    pub fn open(port: i32, tx_gpio: i32, rx_gpio: i32, baud_rate: u32) -> Result<Self, LinkError> {
        hw_init::uart_init(port, tx_gpio, rx_gpio, baud_rate)?;
        Ok(Self { port })
    }
}

impl ByteSource for UartPort {
    fn read_byte(&mut self) -> Option<u8> {
        hw_init::uart_read_byte(self.port)
    }
}

//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `serial_link`  | LinePort           | UART command link        |
//! |                | ByteSource         | ESP-IDF UART driver      |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `time`         | —                  | ESP32 system timer       |
//!
//! The motor outputs implement `MotorPort` in [`crate::drivers::motor`].

pub mod log_sink;
pub mod serial_link;
pub mod time;

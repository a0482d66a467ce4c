//! Motor output driver, hardware initialisation, and the task watchdog.

pub mod hw_init;
pub mod motor;
pub mod watchdog;

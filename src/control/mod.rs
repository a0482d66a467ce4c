//! Control-law helpers shared by the controller and its tests.

pub mod pwm_map;

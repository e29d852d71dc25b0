//! Core building blocks shared by the device and skeleton layers.
//!
//! - [`angle`]: Wraparound-safe angle arithmetic
//! - [`readiness`]: Bitmask of limbs that have reported
//! - [`types`]: Decoded readings and their value types

pub mod angle;
pub mod readiness;
pub mod types;

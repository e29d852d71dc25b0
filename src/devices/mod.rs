//! Device implementations

pub mod limb;
pub mod wt55;

pub use limb::{BaselineMode, CalibrationBaseline, LimbSensor};

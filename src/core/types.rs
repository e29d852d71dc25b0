//! Core data types for decoded sensor readings.
//!
//! Key types:
//! - [`Reading`]: One decoded WT55 frame in physical units
//! - [`BatteryLevel`]: Discrete battery bucket reported by the device
//! - [`DeviceTimestamp`]: Calendar timestamp as sent by the device clock
//! - [`Orientation`]: Roll/pitch/yaw in radians, absolute or parent-relative

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-axis measurement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Device clock timestamp (two-digit year already offset by 2000)
///
/// Kept as raw calendar fields: the device clock is not trusted, and a
/// nonsense date must never make a frame undecodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl DeviceTimestamp {
    /// Convert to a calendar date-time, `None` if the fields are out of range
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_milli_opt(
                self.hour as u32,
                self.minute as u32,
                self.second as u32,
                self.millisecond as u32,
            )
    }

    /// Offset between the given wall-clock time and this device timestamp
    pub fn offset_from(&self, wall_clock: NaiveDateTime) -> Option<TimeDelta> {
        self.to_naive().map(|device| wall_clock - device)
    }
}

impl fmt::Display for DeviceTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// Battery charge bucket reported by the sensor
///
/// The device only resolves twelve levels; the raw quantity is a voltage-like
/// count mapped through a fixed threshold table (see [`BatteryLevel::from_raw`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BatteryLevel {
    #[default]
    Empty,
    P5,
    P10,
    P15,
    P20,
    P30,
    P40,
    P50,
    P60,
    P75,
    P90,
    Full,
}

/// Lower bounds (exclusive) of each bucket, highest first
const BATTERY_THRESHOLDS: [(u16, BatteryLevel); 11] = [
    (396, BatteryLevel::Full),
    (393, BatteryLevel::P90),
    (387, BatteryLevel::P75),
    (382, BatteryLevel::P60),
    (379, BatteryLevel::P50),
    (377, BatteryLevel::P40),
    (373, BatteryLevel::P30),
    (370, BatteryLevel::P20),
    (368, BatteryLevel::P15),
    (350, BatteryLevel::P10),
    (340, BatteryLevel::P5),
];

impl BatteryLevel {
    /// Map the raw 16-bit battery quantity to its bucket
    ///
    /// Each bucket is `(low, high]`; anything at or below 340 is empty.
    pub fn from_raw(raw: u16) -> Self {
        BATTERY_THRESHOLDS
            .iter()
            .find(|(low, _)| raw > *low)
            .map(|&(_, level)| level)
            .unwrap_or(Self::Empty)
    }

    /// Charge percentage of this bucket
    pub const fn percent(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::P5 => 5,
            Self::P10 => 10,
            Self::P15 => 15,
            Self::P20 => 20,
            Self::P30 => 30,
            Self::P40 => 40,
            Self::P50 => 50,
            Self::P60 => 60,
            Self::P75 => 75,
            Self::P90 => 90,
            Self::Full => 100,
        }
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// One decoded sensor frame in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    /// Device clock at sampling time
    pub timestamp: DeviceTimestamp,
    /// Acceleration (g)
    pub accel: Vector3,
    /// Angular rate (deg/s)
    pub gyro: Vector3,
    /// Magnetic field (µT)
    pub magnetic: Vector3,
    /// Fused orientation (degrees, each axis in [0, 360))
    pub angle: Vector3,
    /// Temperature (°C)
    pub temperature: f64,
    /// Battery bucket
    pub battery: BatteryLevel,
    /// Signal strength (dBm as reported, unscaled)
    pub rssi: i16,
    /// Firmware version
    pub version: i16,
}

/// Roll/pitch/yaw triple in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Orientation {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Apply `f` to matching axes of `self` and `other`
    #[inline]
    pub fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            roll: f(self.roll, other.roll),
            pitch: f(self.pitch, other.pitch),
            yaw: f(self.yaw, other.yaw),
        }
    }
}

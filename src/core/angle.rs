//! Wraparound-safe angle arithmetic
//!
//! Sensors report absolute orientation on a circle, so comparing two readings
//! with a plain subtraction jumps by a full period whenever one of them crosses
//! the 0/360 seam. Everything that compares orientations goes through
//! [`difference`] instead.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Angular unit, carrying its period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    /// Degrees, period 360
    #[default]
    Degree,
    /// Radians, period 2π
    Radian,
}

impl AngleUnit {
    /// Length of one full turn in this unit
    #[inline]
    pub const fn period(self) -> f64 {
        match self {
            Self::Degree => 360.0,
            Self::Radian => TAU,
        }
    }

    /// Half a turn in this unit
    #[inline]
    pub const fn half_period(self) -> f64 {
        match self {
            Self::Degree => 180.0,
            Self::Radian => PI,
        }
    }
}

/// Map any finite angle into `[0, period)`
///
/// Equivalent to `(angle + period) mod period` with a floored remainder, so
/// negative inputs of any magnitude land in range and in-range inputs come back
/// bit-for-bit unchanged.
#[inline]
pub fn normalize(angle: f64, unit: AngleUnit) -> f64 {
    let period = unit.period();
    fold(angle.rem_euclid(period), period)
}

/// Signed shortest-arc delta from `a` to `b`, in `(-half_period, half_period]`
///
/// Both inputs are normalized first, so `normalize(a + difference(a, b)) == normalize(b)`.
#[inline]
pub fn difference(a: f64, b: f64, unit: AngleUnit) -> f64 {
    let period = unit.period();
    let half = unit.half_period();

    let raw = normalize(b, unit) - normalize(a, unit);
    let delta = fold((raw + half).rem_euclid(period), period) - half;

    // -half and +half are the same point; report the upper bound
    if delta <= -half { delta + period } else { delta }
}

/// Degrees to radians
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Radians to degrees
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Round to a fixed number of decimal places, exact ties to even
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// `rem_euclid` may return exactly `period` for tiny negative inputs
#[inline]
fn fold(value: f64, period: f64) -> f64 {
    if value >= period { value - period } else { value }
}

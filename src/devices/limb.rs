//! Per-limb sensor state and calibration

use crate::core::angle::{AngleUnit, difference, to_radians};
use crate::core::types::{Orientation, Reading, Vector3};
use crate::skeleton::limbs::Limb;
use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

/// How a calibrated sensor removes its baseline
///
/// Only per-sensor `orientation()` and the root's entry in the relative
/// motion see the difference. Child-relative angles are wrapped again by the
/// skeleton, so both modes give the same joint map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// Plain `angle - baseline`; may leave `[0, 360)` near the seam
    Literal,
    /// Signed shortest arc from baseline to angle
    #[default]
    ShortestArc,
}

impl BaselineMode {
    /// Calibrated angle in degrees
    #[inline]
    pub fn apply(self, baseline: f64, angle: f64) -> f64 {
        match self {
            Self::Literal => angle - baseline,
            Self::ShortestArc => difference(baseline, angle, AngleUnit::Degree),
        }
    }
}

/// Zero pose captured by [`LimbSensor::calibrate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBaseline {
    /// Orientation angles at calibration time (degrees)
    pub angle: Vector3,
    /// Wall clock minus device clock, `None` if the device clock was invalid
    pub time_offset: Option<TimeDelta>,
}

/// One WT55 unit strapped to a limb
#[derive(Debug, Clone)]
pub struct LimbSensor {
    robot_name: String,
    limb: Limb,
    device_id: &'static str,
    mode: BaselineMode,
    address: Option<SocketAddr>,
    is_open: bool,
    reading: Option<Reading>,
    baseline: Option<CalibrationBaseline>,
    orientation: Orientation,
}

impl LimbSensor {
    pub fn new(
        robot_name: impl Into<String>,
        limb: Limb,
        device_id: &'static str,
        mode: BaselineMode,
    ) -> Self {
        Self {
            robot_name: robot_name.into(),
            limb,
            device_id,
            mode,
            address: None,
            is_open: false,
            reading: None,
            baseline: None,
            orientation: Orientation::ZERO,
        }
    }

    /// Store a new reading and recompute roll/pitch/yaw
    pub fn update(&mut self, reading: Reading) {
        self.reading = Some(reading);
        self.recompute();
    }

    /// Capture the current orientation as the zero pose
    ///
    /// Returns `false` without changing anything if no reading has arrived yet.
    pub fn calibrate(&mut self) -> bool {
        self.calibrate_at(Local::now().naive_local())
    }

    /// [`calibrate`](Self::calibrate) against an explicit wall-clock time
    pub fn calibrate_at(&mut self, wall_clock: NaiveDateTime) -> bool {
        let Some(reading) = self.reading else {
            return false;
        };
        self.baseline = Some(CalibrationBaseline {
            angle: reading.angle,
            time_offset: reading.timestamp.offset_from(wall_clock),
        });
        self.recompute();
        true
    }

    /// Drop the baseline; orientation reverts to absolute angles
    pub fn clear_calibration(&mut self) {
        self.baseline = None;
        self.recompute();
    }

    /// Record the sender of the latest frame
    pub fn set_address(&mut self, address: SocketAddr) {
        if self.address != Some(address) {
            log::debug!("{} ({}) reporting from {}", self.limb, self.device_id, address);
        }
        self.address = Some(address);
        self.is_open = true;
    }

    /// Forget the sender; reading and calibration are kept
    pub fn close(&mut self) {
        self.address = None;
        self.is_open = false;
    }

    fn recompute(&mut self) {
        let Some(reading) = self.reading else {
            self.orientation = Orientation::ZERO;
            return;
        };
        // Sensor frame: roll about Y, pitch about X, yaw about Z
        let (roll, pitch, yaw) = match self.baseline {
            Some(base) => (
                self.mode.apply(base.angle.y, reading.angle.y),
                self.mode.apply(base.angle.x, reading.angle.x),
                self.mode.apply(base.angle.z, reading.angle.z),
            ),
            None => (reading.angle.y, reading.angle.x, reading.angle.z),
        };
        self.orientation = Orientation::new(to_radians(roll), to_radians(pitch), to_radians(yaw));
    }

    pub fn limb(&self) -> Limb {
        self.limb
    }

    pub fn device_id(&self) -> &'static str {
        self.device_id
    }

    pub fn address(&self) -> Option<SocketAddr> {
        self.address
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn baseline(&self) -> Option<&CalibrationBaseline> {
        self.baseline.as_ref()
    }

    /// Roll/pitch/yaw in radians, baseline removed when calibrated
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl fmt::Display for LimbSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - Roll/Pitch/Yaw: {:.3}/{:.3}/{:.3}",
            self.robot_name,
            self.limb,
            self.device_id,
            self.orientation.roll,
            self.orientation.pitch,
            self.orientation.yaw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DeviceTimestamp;
    use crate::skeleton::tree::SkeletonTree;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn sensor(mode: BaselineMode) -> LimbSensor {
        LimbSensor::new("AzureLoong", Limb::Head, "WT5500006896", mode)
    }

    fn reading(x: f64, y: f64, z: f64) -> Reading {
        Reading {
            angle: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    #[test]
    fn test_axis_binding() {
        let mut s = sensor(BaselineMode::ShortestArc);
        s.update(reading(10.0, 20.0, 30.0));

        let o = s.orientation();
        assert_relative_eq!(o.roll, 20f64.to_radians());
        assert_relative_eq!(o.pitch, 10f64.to_radians());
        assert_relative_eq!(o.yaw, 30f64.to_radians());
        assert!(!s.is_calibrated());
    }

    #[test]
    fn test_calibrate_requires_reading() {
        let mut s = sensor(BaselineMode::ShortestArc);
        assert!(!s.calibrate());
        assert!(!s.is_calibrated());
    }

    #[test]
    fn test_calibrate_zeroes_pose() {
        let mut s = sensor(BaselineMode::ShortestArc);
        s.update(reading(10.0, 20.0, 30.0));
        assert!(s.calibrate());
        assert!(s.is_calibrated());
        assert_eq!(s.orientation(), Orientation::ZERO);

        s.update(reading(15.0, 20.0, 25.0));
        let o = s.orientation();
        assert_relative_eq!(o.roll, 0.0);
        assert_relative_eq!(o.pitch, 5f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(o.yaw, (-5f64).to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_modes_across_seam() {
        for (mode, expected_pitch) in [
            (BaselineMode::ShortestArc, 20.0),
            (BaselineMode::Literal, -340.0),
        ] {
            let mut s = sensor(mode);
            s.update(reading(350.0, 0.0, 0.0));
            s.calibrate();
            s.update(reading(10.0, 0.0, 0.0));
            assert_relative_eq!(
                s.orientation().pitch,
                f64::to_radians(expected_pitch),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_baseline_modes_agree_on_child_relative_motion() {
        let tree = SkeletonTree::new();
        let mut motions = Vec::new();
        for mode in [BaselineMode::ShortestArc, BaselineMode::Literal] {
            let mut body = LimbSensor::new("AzureLoong", Limb::Body, "WT5500002652", mode);
            let mut waist = LimbSensor::new("AzureLoong", Limb::Waist, "WT5500006713", mode);
            body.update(reading(0.0, 0.0, 0.0));
            waist.update(reading(350.0, 0.0, 0.0));
            body.calibrate();
            waist.calibrate();
            body.update(reading(10.0, 0.0, 0.0));
            waist.update(reading(10.0, 0.0, 0.0));

            let absolute: BTreeMap<Limb, Orientation> = [
                (Limb::Body, body.orientation()),
                (Limb::Waist, waist.orientation()),
            ]
            .into_iter()
            .collect();
            motions.push(tree.relative_motion(&absolute)[&Limb::Waist]);
        }

        assert_relative_eq!(motions[0].pitch, 10f64.to_radians(), epsilon = 1e-9);
        assert_relative_eq!(motions[1].pitch, motions[0].pitch, epsilon = 1e-9);
    }

    #[test]
    fn test_clear_calibration() {
        let mut s = sensor(BaselineMode::ShortestArc);
        s.update(reading(10.0, 20.0, 30.0));
        s.calibrate();
        s.clear_calibration();

        assert!(!s.is_calibrated());
        assert_relative_eq!(s.orientation().roll, 20f64.to_radians());
    }

    #[test]
    fn test_time_offset_captured() {
        let mut s = sensor(BaselineMode::ShortestArc);
        let mut r = reading(0.0, 0.0, 0.0);
        r.timestamp = DeviceTimestamp {
            year: 2024,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        };
        s.update(r);

        let wall = r.timestamp.to_naive().unwrap() + TimeDelta::milliseconds(1500);
        s.calibrate_at(wall);
        assert_eq!(
            s.baseline().unwrap().time_offset,
            Some(TimeDelta::milliseconds(1500))
        );
    }

    #[test]
    fn test_address_and_display() {
        let mut s = sensor(BaselineMode::ShortestArc);
        assert!(!s.is_open());
        let addr: SocketAddr = "192.168.1.20:1399".parse().unwrap();
        s.set_address(addr);
        assert!(s.is_open());
        assert_eq!(s.address(), Some(addr));
        assert_eq!(
            s.to_string(),
            "AzureLoong - robot_head - WT5500006896 - Roll/Pitch/Yaw: 0.000/0.000/0.000"
        );
    }
}

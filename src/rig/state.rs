//! Shared rig state
//!
//! Everything the receiver thread mutates and the control API reads lives in
//! one [`RigState`] behind a single mutex. The receiver holds the lock once per
//! datagram.

use crate::core::readiness::{LIMB_COUNT, ReadinessTracker};
use crate::core::types::{BatteryLevel, Orientation};
use crate::devices::limb::{BaselineMode, LimbSensor};
use crate::devices::wt55::decoder;
use crate::devices::wt55::framer::{FramerStats, RawFrame};
use crate::error::{Error, Result};
use crate::skeleton::joints::{JointAngleMap, JointMapper};
use crate::skeleton::limbs::Limb;
use crate::skeleton::registry::DeviceRegistry;
use crate::skeleton::tree::{LimbMotion, SkeletonTree};
use chrono::Local;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;

/// Sensors, readiness and derived motion of the whole rig
pub struct RigState {
    sensors: BTreeMap<Limb, LimbSensor>,
    readiness: ReadinessTracker,
    calibrated: bool,
    motion: LimbMotion,
    joints: JointAngleMap,
    tree: SkeletonTree,
    mapper: JointMapper,
    framer_stats: FramerStats,
}

impl RigState {
    pub fn new(robot_name: &str, mode: BaselineMode, registry: &DeviceRegistry) -> Self {
        let sensors = registry
            .entries()
            .map(|(device_id, limb)| (limb, LimbSensor::new(robot_name, limb, device_id, mode)))
            .collect();

        Self {
            sensors,
            readiness: ReadinessTracker::new(),
            calibrated: false,
            motion: LimbMotion::new(),
            joints: JointAngleMap::zeroed(),
            tree: SkeletonTree::new(),
            mapper: JointMapper::new(),
            framer_stats: FramerStats::default(),
        }
    }

    /// Decode a frame into its limb's sensor and mark the limb as seen
    pub fn apply_frame(&mut self, frame: &RawFrame, from: SocketAddr) -> Result<Limb> {
        let reading = decoder::decode(&frame.bytes)?;
        let sensor = self
            .sensors
            .get_mut(&frame.limb)
            .ok_or_else(|| Error::UnknownDevice(frame.device_id.clone()))?;

        sensor.update(reading);
        sensor.set_address(from);
        log::trace!("{}", sensor);

        let was_full = self.readiness.is_full();
        self.readiness.mark_seen(frame.limb.index());
        if !was_full && self.readiness.is_full() {
            log::info!("All {} limbs reporting", LIMB_COUNT);
        }
        Ok(frame.limb)
    }

    /// Recompute derived motion after a datagram
    ///
    /// Returns the joint map to publish once the rig is ready and calibrated.
    pub fn refresh(&mut self) -> Option<JointAngleMap> {
        if !self.readiness.is_full() {
            return None;
        }
        self.motion = self.tree.relative_motion(&self.absolute());
        if !self.calibrated {
            return None;
        }
        self.mapper.apply(&self.motion, &mut self.joints);
        Some(self.joints.clone())
    }

    /// Zero every limb at its current pose
    ///
    /// Fails without touching any limb unless every limb has reported.
    pub fn calibrate(&mut self) -> Result<()> {
        if !self.readiness.is_full() {
            return Err(Error::NotReady {
                missing: self.missing(),
            });
        }

        let now = Local::now().naive_local();
        for sensor in self.sensors.values_mut() {
            sensor.calibrate_at(now);
        }
        self.calibrated = true;
        self.motion = self.tree.relative_motion(&self.absolute());
        self.mapper.apply(&self.motion, &mut self.joints);
        log::info!("Rig calibrated");
        Ok(())
    }

    /// Drop every baseline; joint output stops until the next calibration
    pub fn clear_calibration(&mut self) {
        for sensor in self.sensors.values_mut() {
            sensor.clear_calibration();
        }
        self.calibrated = false;
        self.joints = JointAngleMap::zeroed();
        log::info!("Rig calibration cleared");
    }

    /// Forget which limbs have reported and who sent them
    pub fn reset_readiness(&mut self) {
        self.readiness.reset();
        for sensor in self.sensors.values_mut() {
            sensor.close();
        }
    }

    pub fn set_framer_stats(&mut self, stats: FramerStats) {
        self.framer_stats = stats;
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_full()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Limbs not seen since the last reset, in topology order
    pub fn missing(&self) -> Vec<Limb> {
        self.readiness
            .missing()
            .into_iter()
            .filter_map(Limb::from_index)
            .collect()
    }

    pub fn joints(&self) -> &JointAngleMap {
        &self.joints
    }

    pub fn motion(&self) -> &LimbMotion {
        &self.motion
    }

    pub fn sensor(&self, limb: Limb) -> Option<&LimbSensor> {
        self.sensors.get(&limb)
    }

    fn absolute(&self) -> BTreeMap<Limb, Orientation> {
        self.sensors
            .iter()
            .map(|(&limb, sensor)| (limb, sensor.orientation()))
            .collect()
    }

    pub fn status(&self, running: bool) -> RigStatus {
        RigStatus {
            running,
            ready_mask: self.readiness.mask(),
            reporting: self.readiness.seen_count(),
            missing: self.missing(),
            calibrated: self.calibrated,
            limbs: self
                .sensors
                .values()
                .map(|sensor| LimbStatus {
                    limb: sensor.limb(),
                    device_id: sensor.device_id(),
                    address: sensor.address(),
                    is_open: sensor.is_open(),
                    calibrated: sensor.is_calibrated(),
                    battery: sensor.reading().map(|r| r.battery),
                    orientation: sensor.orientation(),
                })
                .collect(),
            framer: self.framer_stats,
        }
    }
}

/// Snapshot of one limb
#[derive(Debug, Clone, PartialEq)]
pub struct LimbStatus {
    pub limb: Limb,
    pub device_id: &'static str,
    pub address: Option<SocketAddr>,
    pub is_open: bool,
    pub calibrated: bool,
    pub battery: Option<BatteryLevel>,
    pub orientation: Orientation,
}

/// Snapshot of the rig, for status reporting
#[derive(Debug, Clone, PartialEq)]
pub struct RigStatus {
    pub running: bool,
    /// Readiness bitmask, bit `n - 1` for topology index `n`
    pub ready_mask: u16,
    /// Limbs that have reported since start
    pub reporting: u32,
    pub missing: Vec<Limb>,
    pub calibrated: bool,
    pub limbs: Vec<LimbStatus>,
    pub framer: FramerStats,
}

impl RigStatus {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

impl fmt::Display for RigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | limbs {}/{} (mask 0x{:04X}) | {} | frames {} resync {} unknown {}",
            if self.running { "running" } else { "stopped" },
            self.reporting,
            LIMB_COUNT,
            self.ready_mask,
            if self.calibrated { "calibrated" } else { "uncalibrated" },
            self.framer.frames,
            self.framer.resync_bytes,
            self.framer.unknown_ids,
        )?;
        if let Some(low) = self.limbs.iter().filter_map(|l| l.battery).min() {
            write!(f, " | lowest battery {}", low)?;
        }
        Ok(())
    }
}

//! Projection of relative limb motion onto named robot joints
//!
//! Each limb drives up to three joints, bound positionally to its relative
//! roll, pitch and yaw. Axes without a joint are not actuated on the physical
//! robot and are dropped.

use super::limbs::Limb;
use super::tree::LimbMotion;
use crate::core::types::Orientation;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rotation axis of a limb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Roll,
    Pitch,
    Yaw,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Roll, Axis::Pitch, Axis::Yaw];

    /// Component of an orientation along this axis
    #[inline]
    pub fn of(self, orientation: &Orientation) -> f64 {
        match self {
            Self::Roll => orientation.roll,
            Self::Pitch => orientation.pitch,
            Self::Yaw => orientation.yaw,
        }
    }
}

/// Joint names bound to a limb's roll/pitch/yaw slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JointSpec {
    pub roll: Option<&'static str>,
    pub pitch: Option<&'static str>,
    pub yaw: Option<&'static str>,
}

impl JointSpec {
    /// Limb with no actuated degrees of freedom
    pub const NONE: Self = Self::new(None, None, None);

    pub const fn new(
        roll: Option<&'static str>,
        pitch: Option<&'static str>,
        yaw: Option<&'static str>,
    ) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Joint bound to an axis, if any
    #[inline]
    pub fn joint(&self, axis: Axis) -> Option<&'static str> {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
        }
    }

    /// `(axis, joint)` pairs for every bound slot
    pub fn bindings(&self) -> impl Iterator<Item = (Axis, &'static str)> + '_ {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| self.joint(axis).map(|name| (axis, name)))
    }

    /// Names of every bound joint
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings().map(|(_, name)| name)
    }
}

/// Joint name to rotation angle (radians)
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct JointAngleMap {
    angles: BTreeMap<&'static str, f64>,
}

impl JointAngleMap {
    /// Map with every actuated joint of the skeleton at zero
    pub fn zeroed() -> Self {
        let angles = Limb::ALL
            .iter()
            .flat_map(|limb| limb.joints().names().collect::<Vec<_>>())
            .map(|name| (name, 0.0))
            .collect();
        Self { angles }
    }

    /// Angle of a joint
    #[inline]
    pub fn get(&self, joint: &str) -> Option<f64> {
        self.angles.get(joint).copied()
    }

    /// Iterate `(joint, radians)` in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.angles.iter().map(|(&name, &angle)| (name, angle))
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    #[inline]
    fn set(&mut self, joint: &'static str, angle: f64) {
        self.angles.insert(joint, angle);
    }
}

/// Writes relative limb motion into a [`JointAngleMap`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JointMapper;

impl JointMapper {
    pub const fn new() -> Self {
        Self
    }

    /// Update every bound joint from the limb's relative orientation
    ///
    /// Limbs missing from `motion` leave their joints untouched.
    pub fn apply(&self, motion: &LimbMotion, joints: &mut JointAngleMap) {
        for limb in Limb::ALL {
            let Some(relative) = motion.get(&limb) else {
                continue;
            };
            for (axis, joint) in limb.joints().bindings() {
                joints.set(joint, axis.of(relative));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zeroed_contains_only_bound_joints() {
        let map = JointAngleMap::zeroed();
        assert_eq!(map.len(), 31);
        assert!(map.iter().all(|(_, angle)| angle == 0.0));
        assert_eq!(map.get("robot_head_pitch_joint"), Some(0.0));
        // Head roll and body axes are not actuated
        assert_eq!(map.get("robot_head_roll_joint"), None);
        assert!(map.iter().all(|(name, _)| !name.starts_with("robot_body")));
    }

    #[test]
    fn test_joint_bindings() {
        let calf = Limb::CalfR.joints();
        let bound: Vec<_> = calf.bindings().collect();
        assert_eq!(bound, vec![(Axis::Pitch, "robot_calf_r_pitch_joint")]);
        assert_eq!(calf.joint(Axis::Roll), None);
        assert_eq!(JointSpec::NONE.bindings().count(), 0);
    }

    #[test]
    fn test_apply_positional_binding() {
        let mut motion = LimbMotion::new();
        motion.insert(Limb::Head, Orientation::new(0.1, 0.2, 0.3));
        motion.insert(Limb::ArmL, Orientation::new(-0.4, 0.5, 0.6));

        let mut map = JointAngleMap::zeroed();
        JointMapper::new().apply(&motion, &mut map);

        // Head roll is unbound and dropped
        assert_relative_eq!(map.get("robot_head_pitch_joint").unwrap(), 0.2);
        assert_relative_eq!(map.get("robot_head_yaw_joint").unwrap(), 0.3);
        assert_relative_eq!(map.get("robot_arm_l_roll_joint").unwrap(), -0.4);
        assert_relative_eq!(map.get("robot_arm_l_pitch_joint").unwrap(), 0.5);
        // Untouched limbs keep their previous value
        assert_eq!(map.get("robot_waist_yaw_joint"), Some(0.0));
        assert_eq!(map.len(), 31);
    }
}

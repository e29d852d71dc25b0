//! Static limb topology of the AzureLoong humanoid
//!
//! ```text
//! robot_body (1)
//! ├── robot_head (2)
//! ├── robot_waist (3)
//! │   ├── robot_thigh_r (10) ── robot_calf_r (12) ── robot_foot_r (14)
//! │   └── robot_thigh_l (11) ── robot_calf_l (13) ── robot_foot_l (15)
//! ├── robot_arm_r (4) ── robot_forearm_r (6) ── robot_hand_r (8)
//! └── robot_arm_l (5) ── robot_forearm_l (7) ── robot_hand_l (9)
//! ```

use super::joints::JointSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fifteen instrumented skeletal segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    Body,
    Head,
    Waist,
    ArmR,
    ArmL,
    ForearmR,
    ForearmL,
    HandR,
    HandL,
    ThighR,
    ThighL,
    CalfR,
    CalfL,
    FootR,
    FootL,
}

impl Limb {
    /// All limbs in topology order (index 1..=15); parents precede children
    pub const ALL: [Limb; 15] = [
        Limb::Body,
        Limb::Head,
        Limb::Waist,
        Limb::ArmR,
        Limb::ArmL,
        Limb::ForearmR,
        Limb::ForearmL,
        Limb::HandR,
        Limb::HandL,
        Limb::ThighR,
        Limb::ThighL,
        Limb::CalfR,
        Limb::CalfL,
        Limb::FootR,
        Limb::FootL,
    ];

    /// Root of the tree
    pub const ROOT: Limb = Limb::Body;

    /// Fixed topology index in `1..=15`
    pub const fn index(self) -> u8 {
        match self {
            Self::Body => 1,
            Self::Head => 2,
            Self::Waist => 3,
            Self::ArmR => 4,
            Self::ArmL => 5,
            Self::ForearmR => 6,
            Self::ForearmL => 7,
            Self::HandR => 8,
            Self::HandL => 9,
            Self::ThighR => 10,
            Self::ThighL => 11,
            Self::CalfR => 12,
            Self::CalfL => 13,
            Self::FootR => 14,
            Self::FootL => 15,
        }
    }

    /// Look up a limb by topology index
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|limb| limb.index() == index)
    }

    /// Link name used by the robot description
    pub const fn name(self) -> &'static str {
        match self {
            Self::Body => "robot_body",
            Self::Head => "robot_head",
            Self::Waist => "robot_waist",
            Self::ArmR => "robot_arm_r",
            Self::ArmL => "robot_arm_l",
            Self::ForearmR => "robot_forearm_r",
            Self::ForearmL => "robot_forearm_l",
            Self::HandR => "robot_hand_r",
            Self::HandL => "robot_hand_l",
            Self::ThighR => "robot_thigh_r",
            Self::ThighL => "robot_thigh_l",
            Self::CalfR => "robot_calf_r",
            Self::CalfL => "robot_calf_l",
            Self::FootR => "robot_foot_r",
            Self::FootL => "robot_foot_l",
        }
    }

    /// Look up a limb by link name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|limb| limb.name() == name)
    }

    /// Parent limb, `None` for the root
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Body => None,
            Self::Head | Self::Waist | Self::ArmR | Self::ArmL => Some(Self::Body),
            Self::ForearmR => Some(Self::ArmR),
            Self::ForearmL => Some(Self::ArmL),
            Self::HandR => Some(Self::ForearmR),
            Self::HandL => Some(Self::ForearmL),
            Self::ThighR | Self::ThighL => Some(Self::Waist),
            Self::CalfR => Some(Self::ThighR),
            Self::CalfL => Some(Self::ThighL),
            Self::FootR => Some(Self::CalfR),
            Self::FootL => Some(Self::CalfL),
        }
    }

    /// Direct children in topology order
    pub const fn children(self) -> &'static [Limb] {
        match self {
            Self::Body => &[Self::Head, Self::Waist, Self::ArmR, Self::ArmL],
            Self::Waist => &[Self::ThighR, Self::ThighL],
            Self::ArmR => &[Self::ForearmR],
            Self::ArmL => &[Self::ForearmL],
            Self::ForearmR => &[Self::HandR],
            Self::ForearmL => &[Self::HandL],
            Self::ThighR => &[Self::CalfR],
            Self::ThighL => &[Self::CalfL],
            Self::CalfR => &[Self::FootR],
            Self::CalfL => &[Self::FootL],
            Self::Head | Self::HandR | Self::HandL | Self::FootR | Self::FootL => &[],
        }
    }

    /// Actuated joints driven by this limb's relative roll/pitch/yaw
    pub const fn joints(self) -> JointSpec {
        match self {
            Self::Body => JointSpec::NONE,
            Self::Head => JointSpec::new(
                None,
                Some("robot_head_pitch_joint"),
                Some("robot_head_yaw_joint"),
            ),
            Self::Waist => JointSpec::new(
                Some("robot_waist_roll_joint"),
                Some("robot_waist_pitch_joint"),
                Some("robot_waist_yaw_joint"),
            ),
            Self::ArmR => JointSpec::new(
                Some("robot_arm_r_roll_joint"),
                Some("robot_arm_r_pitch_joint"),
                None,
            ),
            Self::ArmL => JointSpec::new(
                Some("robot_arm_l_roll_joint"),
                Some("robot_arm_l_pitch_joint"),
                None,
            ),
            Self::ForearmR => JointSpec::new(
                Some("robot_forearm_r_roll_joint"),
                Some("robot_forearm_r_pitch_joint"),
                None,
            ),
            Self::ForearmL => JointSpec::new(
                Some("robot_forearm_l_roll_joint"),
                Some("robot_forearm_l_pitch_joint"),
                None,
            ),
            Self::HandR => JointSpec::new(
                Some("robot_hand_r_roll_joint"),
                Some("robot_hand_r_pitch_joint"),
                Some("robot_hand_r_yaw_joint"),
            ),
            Self::HandL => JointSpec::new(
                Some("robot_hand_l_roll_joint"),
                Some("robot_hand_l_pitch_joint"),
                Some("robot_hand_l_yaw_joint"),
            ),
            Self::ThighR => JointSpec::new(
                Some("robot_thigh_r_roll_joint"),
                Some("robot_thigh_r_pitch_joint"),
                Some("robot_thigh_r_yaw_joint"),
            ),
            Self::ThighL => JointSpec::new(
                Some("robot_thigh_l_roll_joint"),
                Some("robot_thigh_l_pitch_joint"),
                Some("robot_thigh_l_yaw_joint"),
            ),
            Self::CalfR => JointSpec::new(None, Some("robot_calf_r_pitch_joint"), None),
            Self::CalfL => JointSpec::new(None, Some("robot_calf_l_pitch_joint"), None),
            Self::FootR => JointSpec::new(
                Some("robot_foot_r_roll_joint"),
                Some("robot_foot_r_pitch_joint"),
                None,
            ),
            Self::FootL => JointSpec::new(
                Some("robot_foot_l_roll_joint"),
                Some("robot_foot_l_pitch_joint"),
                None,
            ),
        }
    }
}

impl fmt::Display for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_indices_are_one_to_fifteen() {
        let indices: Vec<u8> = Limb::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, (1..=15).collect::<Vec<u8>>());
        for limb in Limb::ALL {
            assert_eq!(Limb::from_index(limb.index()), Some(limb));
        }
        assert_eq!(Limb::from_index(0), None);
        assert_eq!(Limb::from_index(16), None);
    }

    #[test]
    fn test_names_unique_and_round_trip() {
        let names: HashSet<&str> = Limb::ALL.iter().map(|l| l.name()).collect();
        assert_eq!(names.len(), 15);
        for limb in Limb::ALL {
            assert_eq!(Limb::from_name(limb.name()), Some(limb));
        }
        assert_eq!(Limb::from_name("robot_tail"), None);
    }

    #[test]
    fn test_parent_child_consistency() {
        for limb in Limb::ALL {
            for child in limb.children() {
                assert_eq!(child.parent(), Some(limb), "{child} should point back to {limb}");
            }
            if let Some(parent) = limb.parent() {
                assert!(parent.children().contains(&limb));
                // Parents come first in topology order
                assert!(parent.index() < limb.index());
            }
        }
        assert_eq!(Limb::ROOT.parent(), None);
        assert_eq!(Limb::ALL.iter().filter(|l| l.parent().is_none()).count(), 1);
    }

    #[test]
    fn test_root_has_no_joints() {
        assert_eq!(Limb::Body.joints().names().count(), 0);
        assert_eq!(Limb::Waist.joints().names().count(), 3);
        assert_eq!(Limb::CalfL.joints().names().count(), 1);
    }
}

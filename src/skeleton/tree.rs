//! Skeleton tree and parent-relative limb motion
//!
//! Sensors report absolute orientation. A joint only sees the rotation of its
//! limb relative to the limb it hangs from, so each limb's orientation is
//! differenced against its parent's, axis by axis, on the circle.

use super::limbs::Limb;
use crate::core::angle::{AngleUnit, difference};
use crate::core::types::Orientation;
use std::collections::BTreeMap;

/// Relative orientation per limb (radians)
pub type LimbMotion = BTreeMap<Limb, Orientation>;

/// One node of the skeleton tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonNode {
    pub limb: Limb,
    /// Topology index in `1..=15`, also the readiness bit position
    pub index: u8,
    pub parent: Option<Limb>,
    pub children: Vec<Limb>,
}

/// Immutable skeleton built once from the static limb tables
#[derive(Debug, Clone)]
pub struct SkeletonTree {
    /// Nodes in topology order; every parent precedes its children
    nodes: Vec<SkeletonNode>,
}

impl SkeletonTree {
    /// Build the tree from [`Limb::ALL`]
    pub fn new() -> Self {
        let mut nodes: Vec<SkeletonNode> = Vec::with_capacity(Limb::ALL.len());
        for limb in Limb::ALL {
            debug_assert!(
                limb.parent()
                    .is_none_or(|parent| nodes.iter().any(|node| node.limb == parent)),
                "{limb} listed before its parent"
            );
            nodes.push(SkeletonNode {
                limb,
                index: limb.index(),
                parent: limb.parent(),
                children: limb.children().to_vec(),
            });
        }
        Self { nodes }
    }

    /// Root node (the torso)
    pub fn root(&self) -> &SkeletonNode {
        &self.nodes[0]
    }

    /// Node for a limb
    pub fn node(&self, limb: Limb) -> &SkeletonNode {
        // Topology indices are dense and 1-based
        &self.nodes[limb.index() as usize - 1]
    }

    /// Nodes in topology order
    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    /// Parent-relative orientation of every limb present in `absolute`
    ///
    /// The root keeps its absolute orientation. A child whose parent is missing
    /// from `absolute` is skipped.
    pub fn relative_motion(&self, absolute: &BTreeMap<Limb, Orientation>) -> LimbMotion {
        let mut motion = LimbMotion::new();
        for node in &self.nodes {
            let Some(&own) = absolute.get(&node.limb) else {
                continue;
            };
            let relative = match node.parent {
                None => own,
                Some(parent) => match absolute.get(&parent) {
                    Some(&base) => base.zip_with(own, |p, c| difference(p, c, AngleUnit::Radian)),
                    None => continue,
                },
            };
            motion.insert(node.limb, relative);
        }
        motion
    }
}

impl Default for SkeletonTree {
    fn default() -> Self {
        Self::new()
    }
}

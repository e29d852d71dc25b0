//! Static skeleton of the instrumented robot.
//!
//! - [`limbs`]: The fifteen limbs, their topology and joint bindings
//! - [`registry`]: Which sensor unit sits on which limb
//! - [`tree`]: Parent-relative motion over the limb tree
//! - [`joints`]: Projection of relative motion onto named joints

pub mod joints;
pub mod limbs;
pub mod registry;
pub mod tree;

pub use joints::{Axis, JointAngleMap, JointMapper, JointSpec};
pub use limbs::Limb;
pub use registry::DeviceRegistry;
pub use tree::{LimbMotion, SkeletonNode, SkeletonTree};

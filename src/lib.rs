//! KinesisIO - Motion-capture bridge for the AzureLoong humanoid
//!
//! Fifteen WT55 wireless IMUs, one per limb, stream orientation frames over
//! UDP. This library turns that stream into named joint angles for a
//! motion-control consumer.
//!
//! ```text
//! UDP datagrams -> PacketFramer -> decode -> LimbSensor (calibrated RPY)
//!     -> SkeletonTree (parent-relative motion) -> JointMapper -> joint map
//! ```
//!
//! Joint output is gated: nothing is published until every limb has reported
//! and the rig has been calibrated.

pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod rig;
pub mod skeleton;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use rig::{RigService, RigStatus};
pub use skeleton::{JointAngleMap, Limb};

//! WT55 wireless IMU protocol
//!
//! Each limb carries one WT55 unit that streams fixed 54-byte frames over UDP.
//!
//! - [`framer`]: Finds frame boundaries in the datagram byte stream
//! - [`decoder`]: Converts a frame into a [`Reading`](crate::core::types::Reading)

pub mod constants;
pub mod decoder;
pub mod framer;
pub mod ring_buffer;

pub use decoder::{FrameBuilder, decode};
pub use framer::{FramerState, FramerStats, PacketFramer, RawFrame};

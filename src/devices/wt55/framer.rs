//! WT55 stream framer
//!
//! Frames arrive over UDP, but a datagram is not guaranteed to hold exactly
//! one frame: frames may be split across datagrams, several may share one, and
//! stray bytes may precede them. The framer treats the transport as a single
//! continuous byte stream and carries its state across `feed` calls.
//!
//! ```text
//! SeekHeader --"WT"--> ReadId --registered id--> ReadBody --54 bytes--> emit
//!     ^   |                |                                             |
//!     +---+ slide by 1     +--- unknown id: clear ---+                   |
//!     +-----------------------------------------------+-------------------+
//! ```

use super::constants::{DEVICE_ID_LEN, FRAME_LEN, FRAMER_CAPACITY, MARKER};
use super::ring_buffer::RingBuffer;
use crate::skeleton::limbs::Limb;
use crate::skeleton::registry::DeviceRegistry;

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramerState {
    /// Waiting for the 2-byte marker
    #[default]
    SeekHeader,
    /// Marker found, accumulating the device id
    ReadId,
    /// Registered id, accumulating the rest of the frame
    ReadBody,
}

/// One complete frame from a registered device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub device_id: String,
    pub limb: Limb,
    pub bytes: [u8; FRAME_LEN],
}

/// Framer counters, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramerStats {
    /// Frames emitted
    pub frames: u64,
    /// Bytes dropped while searching for the marker
    pub resync_bytes: u64,
    /// Candidate frames dropped for an unregistered id
    pub unknown_ids: u64,
}

/// Byte-stream framer with single-byte resynchronization
pub struct PacketFramer {
    buffer: RingBuffer<FRAMER_CAPACITY>,
    state: FramerState,
    registry: &'static DeviceRegistry,
    /// Id and limb of the frame being accumulated in `ReadBody`
    current: Option<(String, Limb)>,
    stats: FramerStats,
}

impl PacketFramer {
    /// Framer over the global device registry
    pub fn new() -> Self {
        Self::with_registry(DeviceRegistry::global())
    }

    pub fn with_registry(registry: &'static DeviceRegistry) -> Self {
        Self {
            buffer: RingBuffer::new(),
            state: FramerState::SeekHeader,
            registry,
            current: None,
            stats: FramerStats::default(),
        }
    }

    /// Process a chunk of bytes, returning every frame it completes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<RawFrame> {
        bytes.iter().filter_map(|&b| self.push(b)).collect()
    }

    /// Process a single byte
    pub fn push(&mut self, byte: u8) -> Option<RawFrame> {
        if !self.buffer.push(byte) {
            // Unreachable while every state drains before FRAME_LEN
            log::warn!("WT55 framer overflow, dropping {} bytes", self.buffer.len());
            self.reset();
            self.buffer.push(byte);
        }

        match self.state {
            FramerState::SeekHeader => {
                if self.buffer.len() == MARKER.len() {
                    if self.buffer.starts_with(&MARKER) {
                        self.state = FramerState::ReadId;
                    } else {
                        self.buffer.advance(1);
                        self.stats.resync_bytes += 1;
                        log::trace!("WT55 resync: dropped 1 byte");
                    }
                }
                None
            }
            FramerState::ReadId => {
                if self.buffer.len() == DEVICE_ID_LEN {
                    self.check_id();
                }
                None
            }
            FramerState::ReadBody => {
                if self.buffer.len() == FRAME_LEN {
                    self.emit()
                } else {
                    None
                }
            }
        }
    }

    fn check_id(&mut self) {
        let registry = self.registry;
        let known = self
            .buffer
            .get_slice(0, DEVICE_ID_LEN)
            .and_then(|id| std::str::from_utf8(id).ok())
            .filter(|id| id.is_ascii())
            .and_then(|id| registry.limb_for(id).map(|limb| (id.to_string(), limb)));

        match known {
            Some(current) => {
                self.current = Some(current);
                self.state = FramerState::ReadBody;
            }
            None => {
                self.stats.unknown_ids += 1;
                log::debug!(
                    "WT55 unknown device id {:02X?}, discarding",
                    self.buffer.as_slice()
                );
                self.buffer.clear();
                self.state = FramerState::SeekHeader;
            }
        }
    }

    fn emit(&mut self) -> Option<RawFrame> {
        let mut bytes = [0u8; FRAME_LEN];
        let copied = match self.buffer.get_slice(0, FRAME_LEN) {
            Some(slice) => {
                bytes.copy_from_slice(slice);
                true
            }
            None => false,
        };
        let current = self.current.take();
        self.buffer.clear();
        self.state = FramerState::SeekHeader;

        let (device_id, limb) = current.filter(|_| copied)?;
        self.stats.frames += 1;
        Some(RawFrame {
            device_id,
            limb,
            bytes,
        })
    }

    /// Current scanner state
    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Number of bytes held in the accumulator
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial frame and return to `SeekHeader`
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.current = None;
        self.state = FramerState::SeekHeader;
    }

    pub fn stats(&self) -> FramerStats {
        self.stats
    }
}

impl Default for PacketFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::wt55::decoder::FrameBuilder;

    const HEAD_ID: &str = "WT5500006896";

    fn head_frame() -> [u8; FRAME_LEN] {
        FrameBuilder::new(HEAD_ID).rssi(-42).version(7).build()
    }

    #[test]
    fn test_single_frame() {
        let mut framer = PacketFramer::new();
        let frames = framer.feed(&head_frame());

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].device_id, HEAD_ID);
        assert_eq!(frames[0].limb, Limb::Head);
        assert_eq!(frames[0].bytes, head_frame());
        assert_eq!(framer.state(), FramerState::SeekHeader);
        assert_eq!(framer.buffered(), 0);
        assert_eq!(framer.stats().frames, 1);
    }

    #[test]
    fn test_split_anywhere() {
        let frame = head_frame();
        for split in 1..FRAME_LEN {
            let mut framer = PacketFramer::new();
            let mut frames = framer.feed(&frame[..split]);
            assert!(frames.is_empty(), "premature frame at split {split}");
            frames.extend(framer.feed(&frame[split..]));

            assert_eq!(frames.len(), 1, "split {split}");
            assert_eq!(frames[0].device_id, HEAD_ID);
            assert_eq!(frames[0].bytes, frame);
        }
    }

    #[test]
    fn test_three_way_split_and_byte_at_a_time() {
        let frame = head_frame();
        let mut framer = PacketFramer::new();
        assert!(framer.feed(&frame[..1]).is_empty());
        assert!(framer.feed(&frame[1..13]).is_empty());
        assert_eq!(framer.state(), FramerState::ReadBody);
        assert_eq!(framer.feed(&frame[13..]).len(), 1);

        let emitted: Vec<_> = frame.iter().filter_map(|&b| framer.push(b)).collect();
        assert_eq!(emitted.len(), 1);
    }

    #[test]
    fn test_noise_before_marker() {
        let mut framer = PacketFramer::new();
        let mut stream = vec![0xFF, 0x00, 0x57];
        stream.extend_from_slice(&head_frame());

        let frames = framer.feed(&stream);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].device_id, HEAD_ID);
        assert_eq!(framer.stats().resync_bytes, 3);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut framer = PacketFramer::new();
        let body = FrameBuilder::new("WT5500002652").build();
        let mut stream = head_frame().to_vec();
        stream.extend_from_slice(&body);

        let limbs: Vec<Limb> = framer.feed(&stream).into_iter().map(|f| f.limb).collect();
        assert_eq!(limbs, vec![Limb::Head, Limb::Body]);
    }

    #[test]
    fn test_unknown_id_clears_accumulator() {
        let mut framer = PacketFramer::new();
        let frames = framer.feed(b"WT5599999999");

        assert!(frames.is_empty());
        assert_eq!(framer.buffered(), 0);
        assert_eq!(framer.state(), FramerState::SeekHeader);
        assert_eq!(framer.stats().unknown_ids, 1);

        // Rest of the foreign frame is scanned as noise, next real frame still decodes
        let mut stream = vec![0u8; FRAME_LEN - DEVICE_ID_LEN];
        stream.extend_from_slice(&head_frame());
        assert_eq!(framer.feed(&stream).len(), 1);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut framer = PacketFramer::new();
        framer.feed(&head_frame()[..30]);
        assert_eq!(framer.buffered(), 30);

        framer.reset();
        assert_eq!(framer.buffered(), 0);
        assert_eq!(framer.state(), FramerState::SeekHeader);
        assert!(framer.feed(&head_frame()[30..]).is_empty());
    }
}

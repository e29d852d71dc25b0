//! WT55 frame codec
//!
//! Frame layout (54 bytes, multi-byte fields little-endian):
//!
//! | Offset | Size | Field                                    |
//! |--------|------|------------------------------------------|
//! | 0      | 12   | Device id, ASCII (starts with "WT")      |
//! | 12     | 8    | YY MM DD hh mm ss, millisecond (u16)     |
//! | 20     | 6    | Acceleration x/y/z (i16, ±16 g)          |
//! | 26     | 6    | Angular rate x/y/z (i16, ±2000 °/s)      |
//! | 32     | 6    | Magnetic field x/y/z (i16, raw*100/1024) |
//! | 38     | 6    | Angle x/y/z (i16, ±180 °)                |
//! | 44     | 2    | Temperature (i16, /100 °C)               |
//! | 46     | 2    | Battery (u16, bucketed)                  |
//! | 48     | 2    | RSSI (i16)                               |
//! | 50     | 2    | Firmware version (i16)                   |
//! | 52     | 2    | Reserved                                 |

use super::constants::*;
use crate::core::angle::{AngleUnit, difference, normalize, round_to};
use crate::core::types::{BatteryLevel, DeviceTimestamp, Reading, Vector3};
use crate::error::{Error, Result};

/// Decode one complete frame into physical units
///
/// Pure; fails only when `frame` is not exactly [`FRAME_LEN`] bytes.
pub fn decode(frame: &[u8]) -> Result<Reading> {
    if frame.len() != FRAME_LEN {
        return Err(Error::FrameLength {
            expected: FRAME_LEN,
            actual: frame.len(),
        });
    }

    let angle = vector(frame, OFFSET_ANGLE, |raw| {
        let degrees = round_to(raw / RAW_FULL_SCALE * ANGLE_RANGE_DEG, ANGLE_DECIMALS);
        normalize(degrees, AngleUnit::Degree)
    });

    Ok(Reading {
        timestamp: timestamp(frame),
        accel: vector(frame, OFFSET_ACC, |raw| {
            round_to(raw / RAW_FULL_SCALE * ACC_RANGE_G, MOTION_DECIMALS)
        }),
        gyro: vector(frame, OFFSET_GYRO, |raw| {
            round_to(raw / RAW_FULL_SCALE * GYRO_RANGE_DPS, MOTION_DECIMALS)
        }),
        magnetic: vector(frame, OFFSET_MAG, |raw| {
            round_to(raw * MAG_UT_PER_1024 / 1024.0, MOTION_DECIMALS)
        }),
        angle,
        temperature: round_to(
            word(frame, OFFSET_TEMPERATURE) as f64 / TEMPERATURE_DIVISOR,
            TEMPERATURE_DECIMALS,
        ),
        battery: BatteryLevel::from_raw(u16::from_le_bytes([
            frame[OFFSET_BATTERY],
            frame[OFFSET_BATTERY + 1],
        ])),
        rssi: word(frame, OFFSET_RSSI),
        version: word(frame, OFFSET_VERSION),
    })
}

/// ASCII device id of a frame, if well formed
pub fn device_id(frame: &[u8]) -> Option<&str> {
    let id = frame.get(..DEVICE_ID_LEN)?;
    std::str::from_utf8(id).ok().filter(|id| id.is_ascii())
}

/// Signed 16-bit little-endian word
#[inline]
fn word(frame: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([frame[offset], frame[offset + 1]])
}

#[inline]
fn vector(frame: &[u8], offset: usize, scale: impl Fn(f64) -> f64) -> Vector3 {
    Vector3::new(
        scale(word(frame, offset) as f64),
        scale(word(frame, offset + 2) as f64),
        scale(word(frame, offset + 4) as f64),
    )
}

fn timestamp(frame: &[u8]) -> DeviceTimestamp {
    let t = &frame[OFFSET_TIMESTAMP..OFFSET_TIMESTAMP + 8];
    DeviceTimestamp {
        year: TIMESTAMP_YEAR_BASE + t[0] as u16,
        month: t[1],
        day: t[2],
        hour: t[3],
        minute: t[4],
        second: t[5],
        millisecond: u16::from_le_bytes([t[6], t[7]]),
    }
}

/// Encoder for WT55 frames, the inverse of [`decode`]
///
/// Values are given in physical units and quantized to the wire resolution;
/// out-of-range values saturate.
///
/// ```ignore
/// let frame = FrameBuilder::new("WT5500006896")
///     .angle(Vector3::new(10.0, 0.0, 270.0))
///     .battery_raw(390)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    data: [u8; FRAME_LEN],
}

impl FrameBuilder {
    /// Start a frame for `device_id` (truncated or zero-padded to 12 bytes)
    pub fn new(device_id: &str) -> Self {
        let mut data = [0u8; FRAME_LEN];
        let id = device_id.as_bytes();
        let n = id.len().min(DEVICE_ID_LEN);
        data[..n].copy_from_slice(&id[..n]);
        Self { data }
    }

    pub fn timestamp(mut self, ts: DeviceTimestamp) -> Self {
        let t = &mut self.data[OFFSET_TIMESTAMP..OFFSET_TIMESTAMP + 8];
        t[0] = ts.year.saturating_sub(TIMESTAMP_YEAR_BASE).min(u8::MAX as u16) as u8;
        t[1] = ts.month;
        t[2] = ts.day;
        t[3] = ts.hour;
        t[4] = ts.minute;
        t[5] = ts.second;
        t[6..8].copy_from_slice(&ts.millisecond.to_le_bytes());
        self
    }

    /// Acceleration in g
    pub fn accel(self, g: Vector3) -> Self {
        self.vector(OFFSET_ACC, g, |v| v / ACC_RANGE_G * RAW_FULL_SCALE)
    }

    /// Angular rate in °/s
    pub fn gyro(self, dps: Vector3) -> Self {
        self.vector(OFFSET_GYRO, dps, |v| v / GYRO_RANGE_DPS * RAW_FULL_SCALE)
    }

    /// Magnetic field in µT
    pub fn magnetic(self, ut: Vector3) -> Self {
        self.vector(OFFSET_MAG, ut, |v| v * 1024.0 / MAG_UT_PER_1024)
    }

    /// Orientation in degrees, any range
    pub fn angle(self, degrees: Vector3) -> Self {
        self.vector(OFFSET_ANGLE, degrees, |v| {
            difference(0.0, v, AngleUnit::Degree) / ANGLE_RANGE_DEG * RAW_FULL_SCALE
        })
    }

    /// Orientation as raw wire counts
    pub fn angle_raw(mut self, raw: [i16; 3]) -> Self {
        for (i, r) in raw.into_iter().enumerate() {
            self.put_word(OFFSET_ANGLE + 2 * i, r);
        }
        self
    }

    /// Temperature in °C
    pub fn temperature(mut self, celsius: f64) -> Self {
        self.put_word(OFFSET_TEMPERATURE, quantize(celsius * TEMPERATURE_DIVISOR));
        self
    }

    pub fn battery_raw(mut self, raw: u16) -> Self {
        self.data[OFFSET_BATTERY..OFFSET_BATTERY + 2].copy_from_slice(&raw.to_le_bytes());
        self
    }

    pub fn rssi(mut self, rssi: i16) -> Self {
        self.put_word(OFFSET_RSSI, rssi);
        self
    }

    pub fn version(mut self, version: i16) -> Self {
        self.put_word(OFFSET_VERSION, version);
        self
    }

    pub fn build(&self) -> [u8; FRAME_LEN] {
        self.data
    }

    fn vector(mut self, offset: usize, value: Vector3, to_raw: impl Fn(f64) -> f64) -> Self {
        self.put_word(offset, quantize(to_raw(value.x)));
        self.put_word(offset + 2, quantize(to_raw(value.y)));
        self.put_word(offset + 4, quantize(to_raw(value.z)));
        self
    }

    #[inline]
    fn put_word(&mut self, offset: usize, value: i16) {
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }
}

/// Round to the nearest count, saturating at the i16 range
#[inline]
fn quantize(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

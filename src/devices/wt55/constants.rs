//! Constants for the WT55 wireless IMU frame

// Marker bytes ("WT"), also the first two characters of every device id
pub const MARKER_BYTE_1: u8 = 0x57;
pub const MARKER_BYTE_2: u8 = 0x54;
pub const MARKER: [u8; 2] = [MARKER_BYTE_1, MARKER_BYTE_2];

// Frame sizes
pub const FRAME_LEN: usize = 54;
pub const DEVICE_ID_LEN: usize = 12; // ASCII, includes the marker

// Field offsets (little-endian 16-bit words unless noted)
pub const OFFSET_TIMESTAMP: usize = 12; // YY MM DD hh mm ss (1 byte each) + ms (u16)
pub const OFFSET_ACC: usize = 20; // x, y, z
pub const OFFSET_GYRO: usize = 26; // x, y, z
pub const OFFSET_MAG: usize = 32; // x, y, z
pub const OFFSET_ANGLE: usize = 38; // x, y, z
pub const OFFSET_TEMPERATURE: usize = 44;
pub const OFFSET_BATTERY: usize = 46; // unsigned
pub const OFFSET_RSSI: usize = 48;
pub const OFFSET_VERSION: usize = 50;

pub const TIMESTAMP_YEAR_BASE: u16 = 2000;

// Scaling (full-scale value per 32768 counts)
pub const RAW_FULL_SCALE: f64 = 32768.0;
pub const ACC_RANGE_G: f64 = 16.0;
pub const GYRO_RANGE_DPS: f64 = 2000.0;
pub const ANGLE_RANGE_DEG: f64 = 180.0;
pub const MAG_UT_PER_1024: f64 = 100.0; // raw * 100 / 1024
pub const TEMPERATURE_DIVISOR: f64 = 100.0;

// Rounding (decimal places)
pub const MOTION_DECIMALS: i32 = 3;
pub const ANGLE_DECIMALS: i32 = 2;
pub const TEMPERATURE_DECIMALS: i32 = 2;

// Transport
pub const DEFAULT_PORT: u16 = 1399;
/// Accumulator capacity; one frame plus slack
pub const FRAMER_CAPACITY: usize = 64;

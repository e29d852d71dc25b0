//! Error types for KinesisIO

use crate::skeleton::limbs::Limb;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// KinesisIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error (socket bind, receive, config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Frame buffer is not exactly one device frame long
    #[error("Invalid frame length: expected {expected} bytes, got {actual}")]
    FrameLength {
        /// Required frame length
        expected: usize,
        /// Length of the rejected buffer
        actual: usize,
    },

    /// Device identifier is not bound to any limb
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// Calibration requested before every limb has reported
    #[error("Rig not ready: {} limb(s) still silent ({})", .missing.len(), format_limbs(.missing))]
    NotReady {
        /// Limbs that have not delivered a frame since the last reset
        missing: Vec<Limb>,
    },

    /// Service is already running
    #[error("Service already running")]
    AlreadyRunning,

    /// Service is not running
    #[error("Service not running")]
    NotRunning,

    /// Background thread panicked
    #[error("Thread panicked")]
    ThreadPanic,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

fn format_limbs(limbs: &[Limb]) -> String {
    limbs
        .iter()
        .map(|limb| limb.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_message() {
        let err = Error::NotReady {
            missing: vec![Limb::HandL, Limb::FootR],
        };
        assert_eq!(
            err.to_string(),
            "Rig not ready: 2 limb(s) still silent (robot_hand_l, robot_foot_r)"
        );
    }

    #[test]
    fn test_frame_length_message() {
        let err = Error::FrameLength {
            expected: 54,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Invalid frame length: expected 54 bytes, got 12"
        );
    }
}

//! Configuration for KinesisIO
//!
//! Loads configuration from a TOML file. Every section and field is optional;
//! missing values fall back to the AzureLoong defaults.

use crate::devices::limb::BaselineMode;
use crate::devices::wt55::constants::DEFAULT_PORT;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Robot identity
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RobotConfig {
    /// Robot name, shown in sensor descriptions
    #[serde(default = "default_robot_name")]
    pub name: String,
}

/// UDP receive configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Interface to bind (`0.0.0.0` for all)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// UDP port the sensors send to (0 picks an ephemeral port)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Socket read timeout; bounds how long `stop()` waits for the worker
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Datagram receive buffer size in bytes
    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,

    /// Queue depth of each joint-angle subscriber
    #[serde(default = "default_subscriber_capacity")]
    pub subscriber_capacity: usize,
}

/// Calibration behaviour
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// How the zero pose is removed from calibrated angles
    #[serde(default)]
    pub baseline_mode: BaselineMode,

    /// Calibrate automatically as soon as every limb has reported (daemon only)
    #[serde(default)]
    pub auto_calibrate: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Period of the daemon's status line, 0 disables it
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
}

fn default_robot_name() -> String {
    "AzureLoong".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_read_timeout_ms() -> u64 {
    100
}

fn default_recv_buffer_size() -> usize {
    1024
}

fn default_subscriber_capacity() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_status_interval_secs() -> u64 {
    5
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: default_robot_name(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            read_timeout_ms: default_read_timeout_ms(),
            recv_buffer_size: default_recv_buffer_size(),
            subscriber_capacity: default_subscriber_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            status_interval_secs: default_status_interval_secs(),
        }
    }
}

impl NetworkConfig {
    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| Error::Other(format!("Invalid bind address '{}': {}", self.bind_address, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Read timeout, never zero (a zero timeout is rejected by the socket)
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.max(1))
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use kinesis_io::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("kinesis.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.robot.name, "AzureLoong");
        assert_eq!(config.network.bind_address, "0.0.0.0");
        assert_eq!(config.network.port, 1399);
        assert_eq!(config.network.read_timeout_ms, 100);
        assert_eq!(config.network.subscriber_capacity, 8);
        assert_eq!(config.calibration.baseline_mode, BaselineMode::ShortestArc);
        assert!(!config.calibration.auto_calibrate);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.network.bind_addr().unwrap(),
            "0.0.0.0:1399".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config: AppConfig = toml::from_str(include_str!("../kinesis.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let toml_str = r#"
            [network]
            port = 2400
            bind_address = "127.0.0.1"

            [calibration]
            baseline_mode = "literal"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.port, 2400);
        assert_eq!(config.network.read_timeout_ms, 100);
        assert_eq!(config.calibration.baseline_mode, BaselineMode::Literal);
        assert_eq!(config.robot.name, "AzureLoong");
        assert_eq!(
            config.network.bind_addr().unwrap(),
            "127.0.0.1:2400".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_bind_address() {
        let network = NetworkConfig {
            bind_address: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(network.bind_addr().is_err());
    }

    #[test]
    fn test_unknown_baseline_mode_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[calibration]\nbaseline_mode = \"sideways\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinesis.toml");

        let mut config = AppConfig::default();
        config.robot.name = "TestRig".to_string();
        config.logging.status_interval_secs = 0;
        config.to_file(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file("/nonexistent/kinesis.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

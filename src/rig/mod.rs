//! Rig service: owns the UDP endpoint, the receiver thread and the shared
//! [`RigState`].
//!
//! # Lifecycle
//!
//! ```text
//! new() --start()--> running --stop()--> stopped --start()--> running ...
//! ```
//!
//! - `start()` binds the socket and spawns the `wt55-receiver` thread
//! - Joint output begins once every limb has reported and `calibrate()` succeeded
//! - `stop()` joins the thread, closes the socket and forgets which limbs reported;
//!   after a restart all limbs must report again before output resumes
//! - Dropping a running service stops it
//!
//! # Example
//!
//! ```no_run
//! use kinesis_io::config::AppConfig;
//! use kinesis_io::rig::RigService;
//!
//! let mut rig = RigService::new(AppConfig::default());
//! rig.set_callback(|joints| {
//!     for (name, radians) in joints.iter() {
//!         println!("{name}: {radians:.3}");
//!     }
//! });
//! rig.start()?;
//! # Ok::<(), kinesis_io::error::Error>(())
//! ```

mod receiver;
pub mod state;

pub use state::{LimbStatus, RigState, RigStatus};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::skeleton::joints::JointAngleMap;
use crate::skeleton::registry::DeviceRegistry;
use crate::skeleton::tree::LimbMotion;
use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use receiver::ReceiverContext;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Consumer of each published joint map
///
/// Called on the receiver thread; a slow callback delays the next datagram.
pub type JointCallback = Arc<dyn Fn(&JointAngleMap) + Send + Sync>;

type Subscribers = Arc<Mutex<Vec<Sender<JointAngleMap>>>>;

/// Motion-capture rig service
pub struct RigService {
    config: AppConfig,
    state: Arc<Mutex<RigState>>,
    /// Cleared to stop the receiver thread
    running: Arc<AtomicBool>,
    /// Receiver thread handle - joined on stop
    handle: Option<JoinHandle<()>>,
    callback: Arc<Mutex<Option<JointCallback>>>,
    subscribers: Subscribers,
    local_addr: Option<SocketAddr>,
}

impl RigService {
    pub fn new(config: AppConfig) -> Self {
        let state = RigState::new(
            &config.robot.name,
            config.calibration.baseline_mode,
            DeviceRegistry::global(),
        );

        Self {
            config,
            state: Arc::new(Mutex::new(state)),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            callback: Arc::new(Mutex::new(None)),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            local_addr: None,
        }
    }

    /// Service with a joint callback already registered
    pub fn with_callback<F>(config: AppConfig, callback: F) -> Self
    where
        F: Fn(&JointAngleMap) + Send + Sync + 'static,
    {
        let service = Self::new(config);
        service.set_callback(callback);
        service
    }

    /// Register the joint callback, replacing any previous one
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&JointAngleMap) + Send + Sync + 'static,
    {
        *self.callback.lock() = Some(Arc::new(callback));
    }

    /// Bind the endpoint and spawn the receiver thread
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }

        let network = &self.config.network;
        let bind_addr = network.bind_addr()?;
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_read_timeout(Some(network.read_timeout()))?;
        let local_addr = socket.local_addr()?;

        let ctx = ReceiverContext {
            socket,
            running: Arc::clone(&self.running),
            state: Arc::clone(&self.state),
            callback: Arc::clone(&self.callback),
            subscribers: Arc::clone(&self.subscribers),
            buffer_size: network.recv_buffer_size,
        };

        self.running.store(true, Ordering::Relaxed);
        let spawned = thread::Builder::new()
            .name("wt55-receiver".to_string())
            .spawn(move || receiver::receiver_loop(ctx));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                self.local_addr = Some(local_addr);
                log::info!("Rig service listening on {}", local_addr);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Relaxed);
                Err(Error::Other(format!("Failed to spawn receiver thread: {}", e)))
            }
        }
    }

    /// Stop the receiver thread and close the endpoint
    ///
    /// Readiness is cleared; calibration is kept.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Err(Error::NotRunning);
        };

        log::info!("Stopping rig service...");
        self.running.store(false, Ordering::Relaxed);
        let joined = handle.join();

        // Socket and framer were owned by the thread and are gone now
        self.local_addr = None;
        self.state.lock().reset_readiness();

        joined.map_err(|_| Error::ThreadPanic)?;
        log::info!("Rig service stopped");
        Ok(())
    }

    /// Zero every limb at its current pose
    ///
    /// Fails with [`Error::NotReady`] and changes nothing unless every limb has
    /// reported since the last start.
    pub fn calibrate(&self) -> Result<()> {
        self.state.lock().calibrate()
    }

    /// Exit calibration on every limb
    pub fn clear_calibration(&self) {
        self.state.lock().clear_calibration();
    }

    /// Latest joint map (all zero until ready and calibrated)
    pub fn joint_angles(&self) -> JointAngleMap {
        self.state.lock().joints().clone()
    }

    /// Latest parent-relative limb motion
    pub fn limb_motion(&self) -> LimbMotion {
        self.state.lock().motion().clone()
    }

    pub fn status(&self) -> RigStatus {
        self.state.lock().status(self.is_running())
    }

    /// Channel receiving every published joint map
    ///
    /// Maps are dropped, not queued, while the channel is full.
    pub fn subscribe(&self) -> Receiver<JointAngleMap> {
        let (tx, rx) = bounded(self.config.network.subscriber_capacity.max(1));
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock().is_ready()
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.lock().is_calibrated()
    }

    /// Address the endpoint is bound to, while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Drop for RigService {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.network.bind_address = "127.0.0.1".to_string();
        config.network.port = 0;
        config.network.read_timeout_ms = 20;
        config
    }

    #[test]
    fn test_start_stop() {
        let mut rig = RigService::new(loopback_config());
        assert!(!rig.is_running());
        assert!(rig.local_addr().is_none());

        rig.start().unwrap();
        assert!(rig.is_running());
        assert!(rig.local_addr().is_some());
        assert!(matches!(rig.start(), Err(Error::AlreadyRunning)));

        rig.stop().unwrap();
        assert!(!rig.is_running());
        assert!(rig.local_addr().is_none());
        assert!(matches!(rig.stop(), Err(Error::NotRunning)));
    }

    #[test]
    fn test_calibrate_before_any_frame() {
        let rig = RigService::new(loopback_config());
        match rig.calibrate() {
            Err(Error::NotReady { missing }) => assert_eq!(missing.len(), 15),
            other => panic!("expected NotReady, got {other:?}"),
        }
        assert!(!rig.is_calibrated());
        assert_eq!(rig.joint_angles(), JointAngleMap::zeroed());
    }

    #[test]
    fn test_invalid_bind_address() {
        let mut config = loopback_config();
        config.network.bind_address = "localhost:x".to_string();
        let mut rig = RigService::new(config);
        assert!(rig.start().is_err());
        assert!(!rig.is_running());
    }

    #[test]
    fn test_drop_stops_thread() {
        let mut rig = RigService::new(loopback_config());
        rig.start().unwrap();
        let addr = rig.local_addr().unwrap();
        drop(rig);

        // Port is released once the thread has been joined
        assert!(UdpSocket::bind(addr).is_ok());
    }
}

//! KinesisIO - Motion-capture daemon
//!
//! Listens for WT55 frames on UDP (default `0.0.0.0:1399`), tracks every limb
//! of the rig and logs the resulting joint angles.
//!
//! ```bash
//! kinesis-io --config /etc/kinesis.toml --auto-calibrate
//! RUST_LOG=debug kinesis-io --port 1400
//! ```

use clap::Parser;
use kinesis_io::config::AppConfig;
use kinesis_io::error::{Error, Result};
use kinesis_io::rig::RigService;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "kinesis-io")]
#[command(about = "WT55 motion-capture bridge for the AzureLoong humanoid")]
struct Args {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the UDP listen port
    #[arg(long)]
    port: Option<u16>,

    /// Calibrate as soon as every limb has reported
    #[arg(long)]
    auto_calibrate: bool,
}

/// Main loop tick
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(port) = args.port {
        config.network.port = port;
    }
    if args.auto_calibrate {
        config.calibration.auto_calibrate = true;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("KinesisIO v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => log::info!("Using config: {}", path.display()),
        None => log::info!("No config file given, using defaults"),
    }
    log::info!(
        "Robot: {} | baseline mode: {:?}",
        config.robot.name,
        config.calibration.baseline_mode
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let auto_calibrate = config.calibration.auto_calibrate;
    let status_interval = Duration::from_secs(config.logging.status_interval_secs);

    let mut rig = RigService::with_callback(config, |joints| {
        if log::log_enabled!(log::Level::Debug) {
            let line = joints
                .iter()
                .map(|(name, radians)| format!("{}={:.3}", name, radians))
                .collect::<Vec<_>>()
                .join(" ");
            log::debug!("Joints: {}", line);
        }
    });
    rig.start()?;

    let mut last_status = Instant::now();
    while running.load(Ordering::Relaxed) {
        thread::sleep(POLL_INTERVAL);

        if auto_calibrate && !rig.is_calibrated() && rig.is_ready() {
            match rig.calibrate() {
                Ok(()) => log::info!("Auto-calibration complete"),
                Err(e) => log::warn!("Auto-calibration failed: {}", e),
            }
        }

        if !status_interval.is_zero() && last_status.elapsed() >= status_interval {
            last_status = Instant::now();
            let status = rig.status();
            log::info!("Status: {}", status);
            if !status.is_ready() {
                let missing = status
                    .missing
                    .iter()
                    .map(|limb| limb.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                log::info!("Waiting for: {}", missing);
            }
        }
    }

    rig.stop()?;
    log::info!("KinesisIO shutdown complete");
    Ok(())
}

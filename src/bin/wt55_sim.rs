//! WT55 rig simulator
//!
//! Streams synthetic frames for every registered device to a KinesisIO
//! daemon, so the full pipeline can be exercised without hardware. Each limb
//! sways slowly around a fixed pose with a little Gaussian jitter.
//!
//! ```bash
//! wt55-sim --target 127.0.0.1:1399 --rate 50 --noise 0.1 --split
//! ```

use chrono::{Datelike, Local, Timelike};
use clap::Parser;
use kinesis_io::core::types::{DeviceTimestamp, Vector3};
use kinesis_io::devices::wt55::constants::FRAME_LEN;
use kinesis_io::devices::wt55::decoder::FrameBuilder;
use kinesis_io::skeleton::registry::DeviceRegistry;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::StandardNormal;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "wt55-sim")]
#[command(about = "Stream synthetic WT55 frames for all fifteen limbs")]
struct Args {
    /// Daemon address
    #[arg(short, long, default_value = "127.0.0.1:1399")]
    target: SocketAddr,

    /// Frames per second per device
    #[arg(short, long, default_value = "50")]
    rate: f64,

    /// Stop after this many seconds (0 = run until Ctrl-C)
    #[arg(short, long, default_value = "0")]
    duration: u64,

    /// Probability of garbage bytes before each frame
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// Cut the stream into random-sized datagrams instead of one frame each
    #[arg(long)]
    split: bool,

    /// Sway amplitude (degrees)
    #[arg(long, default_value = "20.0")]
    amplitude: f64,

    /// Angle jitter standard deviation (degrees)
    #[arg(long, default_value = "0.2")]
    jitter: f64,

    /// RNG seed (0 = random)
    #[arg(long, default_value = "0")]
    seed: u64,
}

/// Sway frequency (Hz)
const SWAY_HZ: f64 = 0.2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.rate.is_nan() || args.rate <= 0.0 {
        return Err(format!("rate must be positive, got {}", args.rate).into());
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || r.store(false, Ordering::Relaxed))?;

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(args.target)?;
    let mut rng = if args.seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(args.seed)
    };

    let registry = DeviceRegistry::global();
    let devices = registry.entries().count();
    let period = Duration::from_secs_f64(1.0 / args.rate);
    let deadline = (args.duration > 0).then(|| Instant::now() + Duration::from_secs(args.duration));
    let start = Instant::now();
    let mut sent_frames = 0u64;
    let mut sent_datagrams = 0u64;

    log::info!(
        "Streaming {} devices to {} at {} Hz{}{}",
        devices,
        args.target,
        args.rate,
        if args.noise > 0.0 { ", with noise" } else { "" },
        if args.split { ", split datagrams" } else { "" },
    );

    while running.load(Ordering::Relaxed) && deadline.is_none_or(|d| Instant::now() < d) {
        let tick = Instant::now();
        let t = start.elapsed().as_secs_f64();
        let timestamp = device_now();

        let mut stream = Vec::with_capacity(devices * (FRAME_LEN + 4));
        for (device_id, limb) in registry.entries() {
            let phase = limb.index() as f64 * 0.4;
            let sway = args.amplitude * (std::f64::consts::TAU * SWAY_HZ * t + phase).sin();
            let mut jitter = || {
                let n: f64 = rng.sample(StandardNormal);
                n * args.jitter
            };
            let angle = Vector3::new(sway + jitter(), 0.5 * sway + jitter(), 90.0 + jitter());

            if args.noise > 0.0 && rng.gen_bool(args.noise.clamp(0.0, 1.0)) {
                let count = rng.gen_range(1..=4);
                stream.extend((0..count).map(|_| rng.r#gen::<u8>()));
            }

            let frame = FrameBuilder::new(device_id)
                .timestamp(timestamp)
                .accel(Vector3::new(0.0, 0.0, 1.0))
                .angle(angle)
                .temperature(31.5)
                .battery_raw(390)
                .rssi(-48)
                .version(100)
                .build();

            stream.extend_from_slice(&frame);
            if !args.split {
                socket.send(&stream)?;
                stream.clear();
                sent_datagrams += 1;
            }
            sent_frames += 1;
        }

        let mut rest = stream.as_slice();
        while !rest.is_empty() {
            let cut = rng.gen_range(1..=(2 * FRAME_LEN)).min(rest.len());
            socket.send(&rest[..cut])?;
            rest = &rest[cut..];
            sent_datagrams += 1;
        }

        if let Some(remaining) = period.checked_sub(tick.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log::info!(
        "Sent {} frames in {} datagrams over {:.1}s",
        sent_frames,
        sent_datagrams,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Wall clock as the device would report it
fn device_now() -> DeviceTimestamp {
    let now = Local::now();
    DeviceTimestamp {
        year: now.year().clamp(2000, 2255) as u16,
        month: now.month() as u8,
        day: now.day() as u8,
        hour: now.hour() as u8,
        minute: now.minute() as u8,
        second: now.second().min(59) as u8,
        millisecond: (now.timestamp_subsec_millis() % 1000) as u16,
    }
}

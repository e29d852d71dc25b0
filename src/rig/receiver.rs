//! Receiver thread for the rig service
//!
//! One thread runs the whole pipeline per datagram:
//! receive -> frame -> decode -> update limbs -> relative motion -> joints -> publish.
//! Errors are logged and skipped; only the running flag ends the loop.

use super::state::RigState;
use super::{JointCallback, Subscribers};
use crate::devices::wt55::constants::FRAME_LEN;
use crate::devices::wt55::framer::PacketFramer;
use crate::skeleton::joints::JointAngleMap;
use crossbeam_channel::TrySendError;
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Pause after a hard receive error
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// While errors repeat, log only every this many
const RECV_ERROR_LOG_EVERY: u32 = 100;

/// Everything the receiver thread owns or shares
pub(super) struct ReceiverContext {
    pub socket: UdpSocket,
    pub running: Arc<AtomicBool>,
    pub state: Arc<Mutex<RigState>>,
    pub callback: Arc<Mutex<Option<JointCallback>>>,
    pub subscribers: Subscribers,
    pub buffer_size: usize,
}

/// Receive loop; returns once `running` is cleared
///
/// The socket read timeout bounds how long that takes.
pub(super) fn receiver_loop(ctx: ReceiverContext) {
    let mut framer = PacketFramer::new();
    let mut buffer = vec![0u8; ctx.buffer_size.max(FRAME_LEN)];

    let mut recv_errors = 0u32;

    log::info!("Receiver thread started");

    while ctx.running.load(Ordering::Relaxed) {
        let (len, src) = match ctx.socket.recv_from(&mut buffer) {
            Ok(result) => result,
            Err(e) if e.kind() == ErrorKind::WouldBlock => continue,
            Err(e) if e.kind() == ErrorKind::TimedOut => continue,
            Err(e) => {
                recv_errors = recv_errors.saturating_add(1);
                if should_log_recv_error(recv_errors) {
                    log::error!("UDP recv error ({} in a row): {}", recv_errors, e);
                }
                thread::sleep(RECV_ERROR_BACKOFF);
                continue;
            }
        };
        if recv_errors > 0 {
            log::info!("UDP receive recovered after {} error(s)", recv_errors);
            recv_errors = 0;
        }

        let frames = framer.feed(&buffer[..len]);
        log::trace!("{} bytes from {}: {} frame(s)", len, src, frames.len());

        let output = {
            let mut state = ctx.state.lock();
            for frame in &frames {
                if let Err(e) = state.apply_frame(frame, src) {
                    log::warn!("Dropping frame from {}: {}", frame.device_id, e);
                }
            }
            state.set_framer_stats(framer.stats());
            state.refresh()
        };

        if let Some(joints) = output {
            publish(&ctx, &joints);
        }
    }

    log::info!("Receiver thread exiting");
}

/// First error of a run, then every `RECV_ERROR_LOG_EVERY`th
fn should_log_recv_error(consecutive: u32) -> bool {
    consecutive == 1 || consecutive % RECV_ERROR_LOG_EVERY == 0
}

/// Hand a joint map to the callback and every live subscriber
///
/// Runs outside the state lock. A full subscriber queue drops the map; a
/// disconnected subscriber is removed.
fn publish(ctx: &ReceiverContext, joints: &JointAngleMap) {
    let callback = ctx.callback.lock().clone();
    if let Some(callback) = callback {
        callback(joints);
    }

    let mut subscribers = ctx.subscribers.lock();
    if subscribers.is_empty() {
        return;
    }
    subscribers.retain(|tx| match tx.try_send(joints.clone()) {
        Ok(()) | Err(TrySendError::Full(_)) => true,
        Err(TrySendError::Disconnected(_)) => {
            log::debug!("Joint subscriber disconnected");
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recv_error_logging_is_rate_limited() {
        let logged: Vec<u32> = (1..=350).filter(|&n| should_log_recv_error(n)).collect();
        assert_eq!(logged, vec![1, 100, 200, 300]);
    }
}

//! Frame pacing and per-frame isolation
//!
//! Every frame runs inside `catch_unwind`: a panic is logged and counted,
//! and the next frame runs as usual.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use graphite_audio::{AudioBackend, AudioLevel};
use graphite_tracking::LandmarkTracker;
use painting::RandomSource;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::session::Session;

/// Milliseconds since the loop started
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Frame counts from a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub completed: u64,
    pub failed: u64,
}

/// Run `frame`, turning a panic into a logged failure.
/// Returns `false` if the frame panicked.
pub fn run_isolated(index: u64, frame: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(frame)) {
        Ok(()) => true,
        Err(payload) => {
            error!("Frame {index} failed: {}", panic_message(payload.as_ref()));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Drive `frames` session frames, one per `period`
pub async fn run_frames<T, B, R>(
    session: &mut Session<T, B, R>,
    level: &AudioLevel,
    frames: u64,
    period: Duration,
) -> FrameStats
where
    T: LandmarkTracker,
    B: AudioBackend,
    R: RandomSource,
{
    let clock = FrameClock::new();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stats = FrameStats::default();

    for index in 0..frames {
        ticker.tick().await;
        let now_ms = clock.now_ms();
        let audio_level = level.get();
        if run_isolated(index, || session.frame(now_ms, audio_level)) {
            stats.completed += 1;
        } else {
            stats.failed += 1;
        }
    }

    debug!(
        "Frame loop done: {} completed, {} failed",
        stats.completed, stats.failed
    );
    stats
}

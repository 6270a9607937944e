//! Microphone level metering
//!
//! A tokio interval task reads byte frequency bins from a [`SpectrumSource`]
//! and publishes their mean as a single lock-free scalar. The frame loop
//! reads whatever value is current.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Frequency bins per read (FFT size 256)
pub const SPECTRUM_BINS: usize = 128;

/// Mean of byte frequency bins, scaled to 0.0-1.0
pub fn level_from_spectrum(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32 / 255.0
}

/// Analyser feeding the level meter
pub trait SpectrumSource: Send {
    /// Fill `bins` with the current byte frequency data
    fn frequency_data(&mut self, bins: &mut [u8]);
}

/// Shared audio level, f32 bits in an atomic
#[derive(Debug, Clone, Default)]
pub struct AudioLevel(Arc<AtomicU32>);

impl AudioLevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: f32) {
        self.0.store(level.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }
}

/// Poll `source` every `period` until the returned task is aborted
pub fn spawn_level_poller<S>(mut source: S, level: AudioLevel, period: Duration) -> JoinHandle<()>
where
    S: SpectrumSource + 'static,
{
    debug!("Audio level poller every {} ms", period.as_millis());
    tokio::spawn(async move {
        let mut bins = [0u8; SPECTRUM_BINS];
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            source.frequency_data(&mut bins);
            level.set(level_from_spectrum(&bins));
        }
    })
}

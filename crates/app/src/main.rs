//! Graphite - headless charcoal drawing run
//!
//! Starts a tracker (recorded session or synthetic hand), meters a
//! synthetic microphone, runs the frame loop and exports the drawing.

use std::f32::consts::TAU;
use std::time::Instant;

use clap::Parser;
use graphite::config::Cli;
use graphite::{Command, Session, SessionError, run_frames};
use graphite_audio::{AudioLevel, LoggingBackend, SpectrumSource, spawn_level_poller};
use graphite_tracking::{FigureEightTracker, LandmarkTracker, RecordedTracker};
use painting::ThreadRandom;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Microphone stand-in: a hum swelling and fading every two seconds
struct HumSpectrum {
    start: Instant,
}

impl SpectrumSource for HumSpectrum {
    fn frequency_data(&mut self, bins: &mut [u8]) {
        let t = self.start.elapsed().as_secs_f32();
        let swell = 0.5 + 0.5 * (t * TAU * 0.5).sin();
        let count = bins.len().max(1) as f32;
        for (i, bin) in bins.iter_mut().enumerate() {
            let falloff = 1.0 - i as f32 / count;
            *bin = (255.0 * swell * falloff) as u8;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.load_config()?;
    info!(
        "Starting Graphite: {}x{} canvas, {} frames at {} fps",
        config.display.width, config.display.height, cli.frames, cli.fps
    );

    let tracker: Box<dyn LandmarkTracker> = match &cli.replay {
        Some(path) => Box::new(RecordedTracker::load(path)?),
        None => Box::new(FigureEightTracker::default()),
    };
    let backend = LoggingBackend::new(config.audio.player_volume_db);
    let rng = match cli.seed {
        Some(seed) => ThreadRandom::seeded(seed),
        None => ThreadRandom::new(),
    };
    let poll_interval = config.audio.level_poll_interval();

    let mut session = Session::new(config, tracker, backend, rng);
    if let Err(e) = session.handle(Command::StartTracking, 0) {
        error!("{}", session.status());
        return Err(e);
    }
    if cli.live_audio {
        session.handle(Command::ToggleLiveAudio, 0)?;
    }

    let level = AudioLevel::new();
    let poller = spawn_level_poller(
        HumSpectrum {
            start: Instant::now(),
        },
        level.clone(),
        poll_interval,
    );

    let stats = run_frames(&mut session, &level, cli.frames, cli.frame_period()).await;
    poller.abort();

    session.handle(
        Command::ExportImage {
            path: cli.output.clone(),
        },
        0,
    )?;
    info!(
        "Done: {} strokes, {} frames ({} failed), {} recordings",
        session.strokes().len(),
        stats.completed,
        stats.failed,
        session.studio().recording_count()
    );
    Ok(())
}

//! Command-line options and configuration resolution

use std::path::PathBuf;

use clap::Parser;
use graphite_config::GraphiteConfig;

use crate::commands::DEFAULT_EXPORT_NAME;
use crate::session::SessionError;

/// Graphite - charcoal drawing driven by hand, face, and voice
#[derive(Parser, Debug)]
#[command(name = "graphite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path (overrides GRAPHITE_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Replay a recorded JSON-lines session instead of the synthetic hand
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Enable gesture-driven audio from the start
    #[arg(long)]
    pub live_audio: bool,

    /// Number of frames to run
    #[arg(long, default_value = "600")]
    pub frames: u64,

    /// Frames per second
    #[arg(long, default_value = "60")]
    pub fps: u32,

    /// Seed for reproducible drawings
    #[arg(long)]
    pub seed: Option<u64>,

    /// PNG written when the run ends
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    pub output: PathBuf,
}

impl Cli {
    /// `--config` wins over `GRAPHITE_CONFIG`; defaults otherwise
    pub fn load_config(&self) -> Result<GraphiteConfig, SessionError> {
        let config = match &self.config {
            Some(path) => GraphiteConfig::load(path)?,
            None => GraphiteConfig::from_env()?,
        };
        Ok(config)
    }

    /// Frame period, never shorter than a millisecond
    pub fn frame_period(&self) -> std::time::Duration {
        let fps = self.fps.clamp(1, 1000);
        std::time::Duration::from_micros(1_000_000 / fps as u64)
    }
}

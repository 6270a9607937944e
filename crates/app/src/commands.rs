//! User commands accepted by a session

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default export file name
pub const DEFAULT_EXPORT_NAME: &str = "graphite-drawing.png";

fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_NAME)
}

/// Commands from the UI surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Command {
    /// Acquire the camera and microphone and start tracking
    StartTracking,

    /// Switch gesture-driven audio on or off
    ToggleLiveAudio,

    /// Replace the active style with a random one
    ChangeStyle,

    /// Drop every stroke and blank the canvas
    ClearCanvas,

    /// Write the canvas to a PNG file
    ExportImage {
        #[serde(default = "default_export_path")]
        path: PathBuf,
    },

    /// Canvas size changed; strokes are redrawn
    Resize { width: u32, height: u32 },
}

impl Command {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

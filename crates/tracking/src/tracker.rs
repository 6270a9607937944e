//! Landmark trackers
//!
//! [`LandmarkTracker`] is the seam to the hand/face detector. Two sources
//! ship with the crate:
//! - [`RecordedTracker`] replays a JSON-lines session, one [`RecordedFrame`]
//!   per line
//! - [`FigureEightTracker`] synthesizes a pointing hand tracing a figure
//!   eight, lifting periodically so strokes get finalized

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::landmarks::{
    Detection, FACE_LANDMARK_COUNT, FaceLandmarks, HAND_LANDMARK_COUNT, HandLandmarks, INDEX_TIP,
    LEFT_EYE, MIDDLE_TIP, RIGHT_EYE, THUMB_TIP, WRIST,
};

/// Errors from starting or loading a tracker
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Camera/Mic access denied")]
    AccessDenied,

    #[error("{0}")]
    Initialization(String),

    #[error("Failed to read session {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Hand and face landmark detector
pub trait LandmarkTracker {
    /// Acquire the underlying devices. No retry on failure.
    fn start(&mut self) -> Result<(), TrackingError>;

    /// Landmarks visible at `timestamp_ms`. Zero or one hand, zero or one face.
    fn detect(&mut self, timestamp_ms: u64) -> Detection;
}

impl<T: LandmarkTracker + ?Sized> LandmarkTracker for Box<T> {
    fn start(&mut self) -> Result<(), TrackingError> {
        (**self).start()
    }

    fn detect(&mut self, timestamp_ms: u64) -> Detection {
        (**self).detect(timestamp_ms)
    }
}

/// One line of a recorded session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub detection: Detection,
}

/// Replays recorded frames in order, one per `detect` call.
///
/// Once the recording runs out every call reports no hand and no face.
#[derive(Debug, Clone, Default)]
pub struct RecordedTracker {
    frames: Vec<RecordedFrame>,
    cursor: usize,
}

impl RecordedTracker {
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Parse JSON lines, skipping blank lines
    pub fn from_json_lines(text: &str) -> Result<Self, TrackingError> {
        let mut frames = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let frame = serde_json::from_str(line)
                .map_err(|source| TrackingError::Parse { line: i + 1, source })?;
            frames.push(frame);
        }
        Ok(Self::new(frames))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrackingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TrackingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tracker = Self::from_json_lines(&text)?;
        info!("Loaded {} recorded frames from {}", tracker.len(), path.display());
        Ok(tracker)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All recorded frames have been replayed
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

impl LandmarkTracker for RecordedTracker {
    fn start(&mut self) -> Result<(), TrackingError> {
        if self.frames.is_empty() {
            return Err(TrackingError::Initialization(
                "recorded session has no frames".to_string(),
            ));
        }
        self.cursor = 0;
        Ok(())
    }

    fn detect(&mut self, _timestamp_ms: u64) -> Detection {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                frame.detection.clone()
            }
            None => Detection::empty(),
        }
    }
}

/// Synthetic pointing hand tracing a figure eight
#[derive(Debug, Clone)]
pub struct FigureEightTracker {
    /// Time for one full loop
    pub period_ms: u64,
    /// The hand disappears for `lift_ms` at the start of every loop
    pub lift_ms: u64,
    started: bool,
}

impl Default for FigureEightTracker {
    fn default() -> Self {
        Self {
            period_ms: 4000,
            lift_ms: 400,
            started: false,
        }
    }
}

impl FigureEightTracker {
    pub fn new(period_ms: u64, lift_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            lift_ms,
            started: false,
        }
    }

    fn hand_at(&self, phase: f32) -> HandLandmarks {
        let angle = phase * TAU;
        let tip = Vec3::new(0.5 + 0.3 * angle.sin(), 0.45 + 0.2 * (2.0 * angle).sin(), 0.0);

        let mut points = vec![tip; HAND_LANDMARK_COUNT];
        points[WRIST] = tip + Vec3::new(0.0, 0.3, 0.0);
        points[THUMB_TIP] = tip + Vec3::new(0.15, 0.1, 0.0);
        points[INDEX_TIP] = tip;
        points[MIDDLE_TIP] = tip + Vec3::new(0.05, 0.05, 0.0);
        HandLandmarks::new(points)
    }

    fn face_at(&self, phase: f32) -> FaceLandmarks {
        let tilt = 0.05 * (phase * TAU).cos();
        let mut points = vec![Vec3::new(0.5, 0.4, 0.0); FACE_LANDMARK_COUNT];
        points[LEFT_EYE] = Vec3::new(0.45, 0.4 + tilt * 0.5, 0.0);
        points[RIGHT_EYE] = Vec3::new(0.55, 0.4 - tilt * 0.5, 0.0);
        FaceLandmarks::new(points)
    }
}

impl LandmarkTracker for FigureEightTracker {
    fn start(&mut self) -> Result<(), TrackingError> {
        self.started = true;
        debug!(
            "FigureEightTracker started: period {} ms, lift {} ms",
            self.period_ms, self.lift_ms
        );
        Ok(())
    }

    fn detect(&mut self, timestamp_ms: u64) -> Detection {
        if !self.started {
            return Detection::empty();
        }
        let offset = timestamp_ms % self.period_ms;
        let phase = offset as f32 / self.period_ms as f32;
        let face = Some(self.face_at(phase));
        if offset < self.lift_ms {
            return Detection { hand: None, face };
        }
        Detection {
            hand: Some(self.hand_at(phase)),
            face,
        }
    }
}

//! Landmark snapshots
//!
//! Landmarks are normalized camera coordinates: x and y in 0.0-1.0 from the
//! top-left of the (unmirrored) camera image, z relative depth.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;

/// Number of points in a complete hand
pub const HAND_LANDMARK_COUNT: usize = 21;

pub const LEFT_EYE: usize = 133;
pub const RIGHT_EYE: usize = 362;

/// Number of points in a complete face mesh
pub const FACE_LANDMARK_COUNT: usize = 468;

/// One detected hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks(pub Vec<Vec3>);

impl HandLandmarks {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self(points)
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.0.get(index).copied()
    }

    pub fn wrist(&self) -> Option<Vec3> {
        self.get(WRIST)
    }

    pub fn thumb_tip(&self) -> Option<Vec3> {
        self.get(THUMB_TIP)
    }

    pub fn index_tip(&self) -> Option<Vec3> {
        self.get(INDEX_TIP)
    }

    pub fn middle_tip(&self) -> Option<Vec3> {
        self.get(MIDDLE_TIP)
    }
}

/// One detected face mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks(pub Vec<Vec3>);

impl FaceLandmarks {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self(points)
    }

    /// Vertical offset between the eye centers, `None` if either is missing
    pub fn eye_tilt(&self) -> Option<f32> {
        let left = self.0.get(LEFT_EYE)?;
        let right = self.0.get(RIGHT_EYE)?;
        Some((left.y - right.y).abs())
    }
}

/// What a tracker saw at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Detection {
    pub hand: Option<HandLandmarks>,
    pub face: Option<FaceLandmarks>,
}

impl Detection {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-frame input to the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingFrame {
    pub hand: Option<HandLandmarks>,
    pub face: Option<FaceLandmarks>,
    /// Microphone level 0.0-1.0
    pub audio_level: f32,
}

impl TrackingFrame {
    pub fn new(detection: Detection, audio_level: f32) -> Self {
        Self {
            hand: detection.hand,
            face: detection.face,
            audio_level: audio_level.clamp(0.0, 1.0),
        }
    }

    /// Eye tilt of the face, if a face with both eyes was seen
    pub fn face_tilt(&self) -> Option<f32> {
        self.face.as_ref().and_then(FaceLandmarks::eye_tilt)
    }
}

/// Mirror a normalized landmark horizontally and scale it to canvas pixels
pub fn to_canvas(point: Vec3, width: f32, height: f32) -> Vec2 {
    Vec2::new((1.0 - point.x) * width, point.y * height)
}

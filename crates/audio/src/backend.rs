//! Audio backend seam
//!
//! The studio drives capture and playback through [`AudioBackend`]; the
//! device side (microphone, player, effect chain) lives behind it.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::action::EffectKind;

/// Handle to a finished recording held by the backend
pub type RecordingId = u64;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Recording failed: {0}")]
    Recording(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Unknown recording {0}")]
    UnknownRecording(RecordingId),
}

/// Where the player's output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Destination,
    Effect(EffectKind),
}

/// Trait for audio capture and playback devices
pub trait AudioBackend {
    /// Whether a microphone stream is open
    fn capture_available(&self) -> bool;

    /// Start capturing into a new recording
    fn begin_capture(&mut self) -> Result<(), AudioError>;

    /// Stop capturing and keep what was captured
    fn finish_capture(&mut self) -> Result<RecordingId, AudioError>;

    /// Free a recording's data
    fn release(&mut self, id: RecordingId);

    /// Whether the player can accept a recording
    fn player_ready(&self) -> bool;

    /// Reconnect the player output
    fn route(&mut self, route: Route) -> Result<(), AudioError>;

    fn play(&mut self, id: RecordingId) -> Result<(), AudioError>;

    fn set_looping(&mut self, looping: bool);

    /// Whether the last `play` is still sounding
    fn is_playing(&self) -> bool;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn capture_available(&self) -> bool {
        (**self).capture_available()
    }

    fn begin_capture(&mut self) -> Result<(), AudioError> {
        (**self).begin_capture()
    }

    fn finish_capture(&mut self) -> Result<RecordingId, AudioError> {
        (**self).finish_capture()
    }

    fn release(&mut self, id: RecordingId) {
        (**self).release(id)
    }

    fn player_ready(&self) -> bool {
        (**self).player_ready()
    }

    fn route(&mut self, route: Route) -> Result<(), AudioError> {
        (**self).route(route)
    }

    fn play(&mut self, id: RecordingId) -> Result<(), AudioError> {
        (**self).play(id)
    }

    fn set_looping(&mut self, looping: bool) {
        (**self).set_looping(looping)
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }
}

/// Backend without devices: keeps bookkeeping and logs every call.
///
/// Playback finishes immediately.
#[derive(Debug, Default)]
pub struct LoggingBackend {
    next_id: RecordingId,
    capturing: bool,
    held: HashSet<RecordingId>,
    route: Route,
    looping: bool,
    volume_db: f32,
}

impl LoggingBackend {
    pub fn new(volume_db: f32) -> Self {
        info!("Audio player volume set to {volume_db} dB");
        Self {
            volume_db,
            ..Self::default()
        }
    }

    /// Recordings currently held
    pub fn held(&self) -> usize {
        self.held.len()
    }

    pub fn current_route(&self) -> Route {
        self.route
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn volume_db(&self) -> f32 {
        self.volume_db
    }
}

impl AudioBackend for LoggingBackend {
    fn capture_available(&self) -> bool {
        true
    }

    fn begin_capture(&mut self) -> Result<(), AudioError> {
        if self.capturing {
            return Err(AudioError::Recording("already capturing".to_string()));
        }
        self.capturing = true;
        info!("Capture started");
        Ok(())
    }

    fn finish_capture(&mut self) -> Result<RecordingId, AudioError> {
        if !self.capturing {
            return Err(AudioError::Recording("not capturing".to_string()));
        }
        self.capturing = false;
        self.next_id += 1;
        self.held.insert(self.next_id);
        info!("Capture finished: recording {}", self.next_id);
        Ok(self.next_id)
    }

    fn release(&mut self, id: RecordingId) {
        if self.held.remove(&id) {
            debug!("Released recording {id}");
        }
    }

    fn player_ready(&self) -> bool {
        true
    }

    fn route(&mut self, route: Route) -> Result<(), AudioError> {
        self.route = route;
        debug!("Player routed to {route:?}");
        Ok(())
    }

    fn play(&mut self, id: RecordingId) -> Result<(), AudioError> {
        if !self.held.contains(&id) {
            return Err(AudioError::UnknownRecording(id));
        }
        info!(
            "Playing recording {id} via {:?} (loop: {})",
            self.route, self.looping
        );
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        debug!("Player loop set to {looping}");
    }

    fn is_playing(&self) -> bool {
        false
    }
}

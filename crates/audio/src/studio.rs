//! Recording and playback state around an [`AudioBackend`]
//!
//! ```text
//!   start_recording ──▶ Recording{deadline} ──(tick past deadline | stop)──▶ stored
//!                                                                          │
//!                                     playback roll ◀──────────────────────┘
//! ```
//!
//! One recording at a time. Finished recordings are kept newest-last and the
//! oldest is released once more than `max_recordings` are held.

use std::collections::VecDeque;

use graphite_config::AudioConfig;
use painting::RandomSource;
use tracing::{debug, info, warn};

use crate::action::EffectKind;
use crate::backend::{AudioBackend, RecordingId, Route};

/// Something the session may want to show
#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    RecordingStarted { length_ms: u64 },
    RecordingStored { id: RecordingId },
    RecordingFailed,
    PlaybackStarted { id: RecordingId, route: Route },
    PlaybackEnded,
}

#[derive(Debug, Clone, Copy)]
struct ActiveRecording {
    deadline_ms: u64,
}

pub struct AudioStudio<B: AudioBackend> {
    backend: B,
    config: AudioConfig,
    live: bool,
    recordings: VecDeque<RecordingId>,
    active: Option<ActiveRecording>,
    looping: bool,
    playing: bool,
}

impl<B: AudioBackend> AudioStudio<B> {
    pub fn new(backend: B, config: AudioConfig) -> Self {
        Self {
            backend,
            config,
            live: false,
            recordings: VecDeque::new(),
            active: None,
            looping: false,
            playing: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Switch live audio. Recording and playback are refused while off;
    /// a recording already in flight runs to its deadline.
    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Stored recordings, oldest first
    pub fn recordings(&self) -> impl Iterator<Item = RecordingId> + '_ {
        self.recordings.iter().copied()
    }

    pub fn recording_count(&self) -> usize {
        self.recordings.len()
    }

    /// Start a recording of randomized length.
    ///
    /// Ignored unless live, idle and a capture stream exists. A backend
    /// failure is logged and leaves the studio idle.
    pub fn start_recording(
        &mut self,
        now_ms: u64,
        rng: &mut impl RandomSource,
    ) -> Option<StudioEvent> {
        if !self.live || self.active.is_some() || !self.backend.capture_available() {
            return None;
        }

        let jitter_ms = (rng.next_f32() * self.config.recording_jitter_ms as f32) as u64;
        let length_ms = self.config.min_recording_ms + jitter_ms;

        match self.backend.begin_capture() {
            Ok(()) => {
                self.active = Some(ActiveRecording {
                    deadline_ms: now_ms + length_ms,
                });
                info!("Recording audio for {length_ms} ms");
                Some(StudioEvent::RecordingStarted { length_ms })
            }
            Err(e) => {
                warn!("Recording error: {e}");
                None
            }
        }
    }

    /// Stop the recording in flight and store it.
    ///
    /// A stored recording is played right away with the playback
    /// probability.
    pub fn stop_recording(&mut self, rng: &mut impl RandomSource) -> Vec<StudioEvent> {
        if self.active.take().is_none() {
            return Vec::new();
        }

        let id = match self.backend.finish_capture() {
            Ok(id) => id,
            Err(e) => {
                warn!("Recording error: {e}");
                return vec![StudioEvent::RecordingFailed];
            }
        };

        self.recordings.push_back(id);
        while self.recordings.len() > self.config.max_recordings {
            if let Some(oldest) = self.recordings.pop_front() {
                self.backend.release(oldest);
                debug!("Released oldest recording {oldest}");
            }
        }

        let mut events = vec![StudioEvent::RecordingStored { id }];
        if rng.chance(self.config.playback_probability) {
            events.extend(self.play_last(rng));
        }
        events
    }

    /// Advance timers: stop an expired recording and notice finished playback
    pub fn tick(&mut self, now_ms: u64, rng: &mut impl RandomSource) -> Vec<StudioEvent> {
        let mut events = Vec::new();
        if let Some(active) = self.active {
            if now_ms >= active.deadline_ms {
                events.extend(self.stop_recording(rng));
            }
        }
        if self.playing && !self.backend.is_playing() {
            self.playing = false;
            events.push(StudioEvent::PlaybackEnded);
        }
        events
    }

    /// Play the newest recording through a randomly picked route.
    ///
    /// Requires live audio, a stored recording and a ready player.
    pub fn play_last(&mut self, rng: &mut impl RandomSource) -> Option<StudioEvent> {
        if !self.live || !self.backend.player_ready() {
            return None;
        }
        let &id = self.recordings.back()?;

        let effect = EffectKind::ALL[rng.index(EffectKind::ALL.len())];
        let route = if rng.chance(self.config.effect_apply_probability) {
            Route::Effect(effect)
        } else {
            Route::Destination
        };

        let result = self
            .backend
            .route(route)
            .and_then(|()| self.backend.play(id));
        match result {
            Ok(()) => {
                self.playing = true;
                Some(StudioEvent::PlaybackStarted { id, route })
            }
            Err(e) => {
                warn!("Playback error: {e}");
                None
            }
        }
    }

    /// Send the player straight to the destination again
    pub fn clear_effects(&mut self) {
        if !self.backend.player_ready() {
            return;
        }
        if let Err(e) = self.backend.route(Route::Destination) {
            warn!("Failed to clear effects: {e}");
        }
    }

    pub fn toggle_loop(&mut self) {
        self.looping = !self.looping;
        self.backend.set_looping(self.looping);
    }

    /// Release the newest recording
    pub fn delete_last(&mut self) -> Option<RecordingId> {
        let id = self.recordings.pop_back()?;
        self.backend.release(id);
        debug!("Deleted recording {id}");
        Some(id)
    }
}

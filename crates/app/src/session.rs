//! Drawing session
//!
//! One [`Session`] owns everything a running drawing needs: tracker, style,
//! cursor, stroke engine, canvas, gesture dispatch and the audio studio.
//!
//! Per frame, in order:
//! 1. tracking: smooth the fingertip, start or finish strokes, dispatch
//!    gestures while live audio is on
//! 2. parameters: map signals to stroke parameters (only while drawing)
//! 3. drawing: extend the stroke in progress
//! 4. timers: studio deadlines and status reverts

use glam::Vec2;
use graphite_audio::{
    AudioBackend, AudioStudio, DispatchOutcome, GestureDispatcher, MappingTable, StudioEvent,
};
use graphite_config::{ConfigError, GraphiteConfig};
use graphite_tracking::{
    CursorState, LandmarkTracker, TrackingError, TrackingFrame, classify, to_canvas,
};
use painting::{
    Canvas, DrawingParameters, ParameterMapper, RandomSource, RenderSurface, SignalInputs, Stroke,
    StrokeEngine, StyleConfig, SurfaceError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::status::{StatusBoard, TRACKING_ACTIVE};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Tracking failed: {0}")]
    Tracking(#[from] TrackingError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid command: {0}")]
    Command(#[from] serde_json::Error),
}

/// On-screen marker at the smoothed fingertip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorIndicator {
    pub center: Vec2,
    /// Twice the current stroke width
    pub diameter: f32,
    pub opacity: f32,
}

pub struct Session<T, B, R>
where
    T: LandmarkTracker,
    B: AudioBackend,
    R: RandomSource,
{
    config: GraphiteConfig,
    tracker: T,
    rng: R,
    style: StyleConfig,
    cursor: CursorState,
    mapper: ParameterMapper,
    params: DrawingParameters,
    engine: StrokeEngine,
    canvas: Canvas,
    dispatcher: GestureDispatcher,
    studio: AudioStudio<B>,
    status: StatusBoard,
    indicator: Option<CursorIndicator>,
    tracking: bool,
    live_audio: bool,
}

impl<T, B, R> Session<T, B, R>
where
    T: LandmarkTracker,
    B: AudioBackend,
    R: RandomSource,
{
    pub fn new(config: GraphiteConfig, tracker: T, backend: B, mut rng: R) -> Self {
        let canvas = Canvas::new(config.display.width, config.display.height);
        let dispatcher = GestureDispatcher::new(MappingTable::generate(&config.audio, &mut rng));
        let studio = AudioStudio::new(backend, config.audio.clone());
        info!(
            "Session created with {}x{} canvas",
            config.display.width, config.display.height
        );
        Self {
            config,
            tracker,
            rng,
            style: StyleConfig::charcoal(),
            cursor: CursorState::new(),
            mapper: ParameterMapper::new(),
            params: DrawingParameters::default(),
            engine: StrokeEngine::new(),
            canvas,
            dispatcher,
            studio,
            status: StatusBoard::default(),
            indicator: None,
            tracking: false,
            live_audio: false,
        }
    }

    pub fn config(&self) -> &GraphiteConfig {
        &self.config
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Swap the active style; takes effect on the next frame
    pub fn set_style(&mut self, style: StyleConfig) {
        info!("Style set to {}", style.name);
        self.style = style;
    }

    pub fn params(&self) -> &DrawingParameters {
        &self.params
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn cursor_indicator(&self) -> Option<CursorIndicator> {
        self.indicator
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.engine.strokes()
    }

    pub fn is_drawing(&self) -> bool {
        self.engine.is_drawing()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn dispatcher(&self) -> &GestureDispatcher {
        &self.dispatcher
    }

    pub fn studio(&self) -> &AudioStudio<B> {
        &self.studio
    }

    pub fn status(&self) -> &str {
        self.status.text()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_live_audio(&self) -> bool {
        self.live_audio
    }

    /// Apply one UI command
    pub fn handle(&mut self, command: Command, now_ms: u64) -> Result<(), SessionError> {
        debug!("Session::handle: {command:?}");
        match command {
            Command::StartTracking => self.start_tracking()?,
            Command::ToggleLiveAudio => self.toggle_live_audio(now_ms),
            Command::ChangeStyle => {
                let style = StyleConfig::randomized(&mut self.rng);
                self.set_style(style);
                self.status.flash("Style changed", now_ms, 1000);
            }
            Command::ClearCanvas => self.clear_canvas(),
            Command::ExportImage { path } => self.canvas.export_png(path)?,
            Command::Resize { width, height } => self.resize(width, height),
        }
        Ok(())
    }

    /// Apply a command received as JSON
    pub fn handle_json(&mut self, text: &str, now_ms: u64) -> Result<(), SessionError> {
        let command = Command::from_json(text)?;
        self.handle(command, now_ms)
    }

    /// Start the tracker. A failure is shown in the status line and tracking
    /// stays off; nothing retries.
    pub fn start_tracking(&mut self) -> Result<(), SessionError> {
        if self.tracking {
            return Ok(());
        }
        self.status.set("Initializing tracking...");
        match self.tracker.start() {
            Ok(()) => {
                self.tracking = true;
                self.status.set(TRACKING_ACTIVE);
                info!("Tracking started");
                Ok(())
            }
            Err(e) => {
                let message = match &e {
                    TrackingError::AccessDenied => e.to_string(),
                    other => format!("Error initializing tracking: {other}"),
                };
                warn!("{message}");
                self.status.set(message);
                Err(e.into())
            }
        }
    }

    /// Flip live audio. Switching it on rolls a new secret mapping table.
    pub fn toggle_live_audio(&mut self, now_ms: u64) {
        self.live_audio = !self.live_audio;
        self.studio.set_live(self.live_audio);
        if self.live_audio {
            let table = MappingTable::generate(&self.config.audio, &mut self.rng);
            self.dispatcher.replace_table(table);
            self.status
                .flash("Live audio enabled - try hand gestures!", now_ms, 2000);
            info!("Live audio enabled");
        } else {
            self.status.flash("Live audio disabled", now_ms, 1000);
            info!("Live audio disabled");
        }
    }

    pub fn clear_canvas(&mut self) {
        self.engine.clear();
        self.canvas.clear();
    }

    /// Resize the canvas and replay every finished stroke
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
        self.engine.redraw(&mut self.canvas, &mut self.rng);
        info!("Canvas resized to {width}x{height}");
    }

    /// Run one frame, reading the tracker when tracking is on
    pub fn frame(&mut self, now_ms: u64, audio_level: f32) {
        let frame = if self.tracking {
            Some(TrackingFrame::new(self.tracker.detect(now_ms), audio_level))
        } else {
            None
        };
        self.step(frame.as_ref(), now_ms);
    }

    /// Run one frame on an explicit snapshot (`None` when not tracking)
    pub fn step(&mut self, frame: Option<&TrackingFrame>, now_ms: u64) {
        if let Some(frame) = frame {
            self.update_tracking(frame, now_ms);
            if self.engine.is_drawing() {
                self.update_parameters(frame);
                self.draw();
            }
        }

        let events = self.studio.tick(now_ms, &mut self.rng);
        self.show_events(&events);
        self.status.tick(now_ms);
    }

    fn update_tracking(&mut self, frame: &TrackingFrame, now_ms: u64) {
        let tip = frame.hand.as_ref().and_then(|hand| hand.index_tip());
        let Some(tip) = tip else {
            if self.engine.is_drawing() {
                self.engine.finish(&self.params, self.style.texture_amount);
            }
            self.cursor.lose_track();
            self.indicator = None;
            return;
        };

        let raw = to_canvas(tip, self.canvas_width(), self.canvas_height());
        self.cursor
            .update(raw, self.style.inertia, self.style.jitter, &mut self.rng);

        if !self.engine.is_drawing() {
            self.engine.begin(self.cursor.position);
        }

        let indicator = self.indicator.get_or_insert(CursorIndicator {
            center: self.cursor.position,
            diameter: self.params.stroke_width * 2.0,
            opacity: self.params.opacity,
        });
        indicator.center = self.cursor.position;

        if self.live_audio {
            self.dispatch_gesture(frame, now_ms);
        }
    }

    fn dispatch_gesture(&mut self, frame: &TrackingFrame, now_ms: u64) {
        let Some(hand) = frame.hand.as_ref() else {
            return;
        };
        let Some(gesture) = classify(hand, self.cursor.velocity) else {
            return;
        };
        let outcome = self
            .dispatcher
            .dispatch(gesture, now_ms, &mut self.studio, &mut self.rng);
        if let DispatchOutcome::Triggered { events, .. } = outcome {
            self.show_events(&events);
        }
    }

    fn update_parameters(&mut self, frame: &TrackingFrame) {
        let inputs = SignalInputs {
            velocity: self.cursor.velocity,
            audio_level: frame.audio_level,
            face_tilt: frame.face_tilt(),
        };
        self.params = self.mapper.map(&inputs, &self.style, &mut self.rng);

        if let Some(indicator) = self.indicator.as_mut() {
            indicator.diameter = self.params.stroke_width * 2.0;
            indicator.opacity = self.params.opacity;
        }
    }

    fn draw(&mut self) {
        self.engine.extend(
            self.cursor.position,
            &self.params,
            &mut self.canvas,
            &mut self.rng,
        );
    }

    fn show_events(&mut self, events: &[StudioEvent]) {
        for event in events {
            match event {
                StudioEvent::RecordingStarted { .. } => self.status.set("Recording audio..."),
                StudioEvent::PlaybackStarted { .. } => self.status.set("Playing audio..."),
                StudioEvent::RecordingStored { .. }
                | StudioEvent::RecordingFailed
                | StudioEvent::PlaybackEnded => self.status.set(TRACKING_ACTIVE),
            }
        }
    }

    fn canvas_width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn canvas_height(&self) -> f32 {
        self.canvas.height() as f32
    }
}

//! Stroke engine
//!
//! Owns the in-progress point buffer and the list of finished strokes.
//!
//! ```text
//!            begin(p)                      finish()
//!   Idle ───────────────▶ Drawing{[p]} ───────────────▶ Idle
//!                           │   ▲
//!                           └───┘ extend(p): append when > 2 px away
//! ```
//!
//! Rendering is incremental while drawing; [`StrokeEngine::redraw`] replays
//! every finished stroke after the surface was resized or cleared.

use glam::Vec2;
use tracing::{debug, info};

use crate::constants::{INK_RGB, MIN_POINT_DISTANCE, SMUDGE_CURVE_THRESHOLD, TEXTURE_THRESHOLD};
use crate::params::DrawingParameters;
use crate::random::RandomSource;
use crate::render::RenderSurface;

/// Ink color with the given alpha
#[inline]
fn ink(alpha: f32) -> [f32; 4] {
    [INK_RGB[0], INK_RGB[1], INK_RGB[2], alpha]
}

/// A finished stroke. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Vec2>,
    width: f32,
    opacity: f32,
    smudge: f32,
    texture: f32,
}

impl Stroke {
    /// Build a stroke from at least two points
    pub fn new(points: Vec<Vec2>, params: &DrawingParameters, texture: f32) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self {
            points,
            width: params.stroke_width,
            opacity: params.opacity,
            smudge: params.smudge_factor,
            texture,
        })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn smudge(&self) -> f32 {
        self.smudge
    }

    pub fn texture(&self) -> f32 {
        self.texture
    }
}

/// Engine state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StrokeState {
    #[default]
    Idle,
    /// Points of the stroke in progress, never empty
    Drawing { points: Vec<Vec2> },
}

/// Stroke accumulation and rendering
#[derive(Debug, Default)]
pub struct StrokeEngine {
    state: StrokeState,
    strokes: Vec<Stroke>,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    /// Check if a stroke is currently in progress
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Points of the stroke in progress (empty while idle)
    pub fn current_points(&self) -> &[Vec2] {
        match &self.state {
            StrokeState::Drawing { points } => points,
            StrokeState::Idle => &[],
        }
    }

    /// Finished strokes, oldest first
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Begin a stroke at `at`. Ignored while already drawing.
    pub fn begin(&mut self, at: Vec2) {
        if self.is_drawing() {
            debug!("StrokeEngine::begin: already drawing, ignoring");
            return;
        }
        debug!("StrokeEngine::begin at ({:.1}, {:.1})", at.x, at.y);
        self.state = StrokeState::Drawing { points: vec![at] };
    }

    /// Continue the stroke towards `at`.
    ///
    /// Movement of 2 pixels or less is noise: nothing is appended and nothing
    /// is drawn. Returns whether a point was appended.
    pub fn extend(
        &mut self,
        at: Vec2,
        params: &DrawingParameters,
        surface: &mut impl RenderSurface,
        rng: &mut impl RandomSource,
    ) -> bool {
        let StrokeState::Drawing { points } = &mut self.state else {
            return false;
        };
        let Some(&last) = points.last() else {
            return false;
        };
        if last.distance(at) <= MIN_POINT_DISTANCE {
            return false;
        }

        points.push(at);
        render_segment(points, params, surface, rng);
        true
    }

    /// End the stroke in progress.
    ///
    /// Buffers of two or more points become a [`Stroke`] carrying `params`
    /// and `texture`; shorter buffers are dropped. Returns whether a stroke
    /// was stored.
    pub fn finish(&mut self, params: &DrawingParameters, texture: f32) -> bool {
        let StrokeState::Drawing { points } = std::mem::take(&mut self.state) else {
            return false;
        };
        let count = points.len();
        match Stroke::new(points, params, texture) {
            Some(stroke) => {
                self.strokes.push(stroke);
                debug!(
                    "StrokeEngine::finish: stored stroke {} ({} points)",
                    self.strokes.len(),
                    count
                );
                true
            }
            None => {
                debug!("StrokeEngine::finish: discarded {}-point buffer", count);
                false
            }
        }
    }

    /// Drop every finished stroke. A stroke in progress is kept.
    pub fn clear(&mut self) {
        info!("Clearing {} strokes", self.strokes.len());
        self.strokes.clear();
    }

    /// Clear the surface and replay every finished stroke.
    ///
    /// Texture dots are drawn fresh on every call, so two redraws of the
    /// same strokes are not pixel-identical.
    pub fn redraw(&self, surface: &mut impl RenderSurface, rng: &mut impl RandomSource) {
        surface.clear();
        for stroke in &self.strokes {
            replay_stroke(stroke, surface);
            if stroke.texture > TEXTURE_THRESHOLD {
                stamp_texture(stroke, surface, rng);
            }
        }
        debug!("StrokeEngine::redraw: replayed {} strokes", self.strokes.len());
    }
}

/// Draw the newest segment of a stroke in progress
fn render_segment(
    points: &[Vec2],
    params: &DrawingParameters,
    surface: &mut impl RenderSurface,
    rng: &mut impl RandomSource,
) {
    let n = points.len();
    if n < 2 {
        return;
    }

    surface.set_global_alpha(params.opacity);
    surface.set_stroke_color(ink(params.opacity));
    surface.set_line_width(params.stroke_width);
    surface.begin_path();

    if n < 3 {
        surface.move_to(points[n - 2]);
        surface.line_to(points[n - 1]);
        surface.stroke();
        return;
    }

    let (p1, p2, p3) = (points[n - 3], points[n - 2], points[n - 1]);
    surface.move_to(p1);
    if params.smudge_factor > SMUDGE_CURVE_THRESHOLD {
        let spread = 10.0 * params.smudge_factor;
        let control = Vec2::new(
            p2.x + rng.centered() * spread,
            p2.y + rng.centered() * spread,
        );
        surface.quadratic_curve_to(control, p3);
        surface.stroke();

        if rng.next_f32() > 0.7 {
            stamp_smudge(p2, p3, params, surface, rng);
        }
    } else {
        surface.quadratic_curve_to(p2, p3);
        surface.stroke();
    }
}

/// Scatter 5-12 faint marks around the middle of a segment
fn stamp_smudge(
    from: Vec2,
    to: Vec2,
    params: &DrawingParameters,
    surface: &mut impl RenderSurface,
    rng: &mut impl RandomSource,
) {
    let count = (rng.next_f32() * 8.0) as usize + 5;
    let mid = (from + to) * 0.5;
    let spread = params.stroke_width * 6.0 * params.smudge_factor;

    surface.set_global_alpha(params.opacity * 0.4);
    surface.set_fill_color(ink(params.opacity * 0.3));
    for _ in 0..count {
        let center = Vec2::new(
            mid.x + rng.centered() * spread,
            mid.y + rng.centered() * spread,
        );
        let radius = rng.next_f32() * params.stroke_width;
        surface.begin_path();
        surface.arc(center, radius);
        surface.fill();
    }
}

/// Replay a finished stroke's path
fn replay_stroke(stroke: &Stroke, surface: &mut impl RenderSurface) {
    surface.set_global_alpha(stroke.opacity);
    surface.set_stroke_color(ink(stroke.opacity));
    surface.set_line_width(stroke.width);
    surface.begin_path();
    surface.move_to(stroke.points[0]);

    for pair in stroke.points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        if stroke.smudge > SMUDGE_CURVE_THRESHOLD {
            surface.quadratic_curve_to(p0, (p0 + p1) * 0.5);
        } else {
            surface.line_to(p1);
        }
    }
    surface.stroke();
}

/// Scatter 1-3 graphite grains around every point of a stroke
fn stamp_texture(stroke: &Stroke, surface: &mut impl RenderSurface, rng: &mut impl RandomSource) {
    let spread = stroke.width * 2.0 * stroke.texture;
    for &point in &stroke.points {
        let count = (rng.next_f32() * 3.0) as usize + 1;
        for _ in 0..count {
            let center = Vec2::new(
                point.x + rng.centered() * spread,
                point.y + rng.centered() * spread,
            );
            let radius = rng.next_f32() * stroke.width * 0.7;
            let alpha = rng.next_f32() * 0.3 * stroke.opacity;

            surface.set_global_alpha(alpha);
            surface.begin_path();
            surface.arc(center, radius);
            surface.set_fill_color(ink(alpha));
            surface.fill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};
    use crate::random::SequenceRandom;

    fn crisp() -> DrawingParameters {
        DrawingParameters {
            pressure: 1.0,
            stroke_width: 2.0,
            opacity: 0.5,
            smudge_factor: 0.0,
        }
    }

    fn smudgy() -> DrawingParameters {
        DrawingParameters {
            smudge_factor: 1.0,
            ..crisp()
        }
    }

    #[test]
    fn test_begin_enters_drawing() {
        let mut engine = StrokeEngine::new();
        assert!(!engine.is_drawing());
        assert!(engine.current_points().is_empty());

        engine.begin(Vec2::new(5.0, 5.0));
        assert!(engine.is_drawing());
        assert_eq!(engine.current_points(), &[Vec2::new(5.0, 5.0)]);

        // A second begin keeps the existing buffer
        engine.begin(Vec2::new(50.0, 50.0));
        assert_eq!(engine.current_points(), &[Vec2::new(5.0, 5.0)]);
    }

    #[test]
    fn test_small_moves_are_ignored() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();

        engine.begin(Vec2::ZERO);
        assert!(!engine.extend(Vec2::new(1.0, 1.0), &crisp(), &mut surface, &mut rng));
        assert!(!engine.extend(Vec2::new(2.0, 0.0), &crisp(), &mut surface, &mut rng));
        assert!(!engine.extend(Vec2::new(0.0, -2.0), &crisp(), &mut surface, &mut rng));

        assert_eq!(engine.current_points().len(), 1);
        assert!(surface.commands().is_empty());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_second_point_draws_line() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();

        engine.begin(Vec2::ZERO);
        assert!(engine.extend(Vec2::new(10.0, 0.0), &crisp(), &mut surface, &mut rng));

        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::GlobalAlpha(0.5),
                DrawCommand::StrokeColor(ink(0.5)),
                DrawCommand::LineWidth(2.0),
                DrawCommand::BeginPath,
                DrawCommand::MoveTo(Vec2::ZERO),
                DrawCommand::LineTo(Vec2::new(10.0, 0.0)),
                DrawCommand::Stroke,
            ]
        );
    }

    #[test]
    fn test_third_point_draws_quadratic() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();

        engine.begin(Vec2::new(0.0, 0.0));
        engine.extend(Vec2::new(10.0, 0.0), &crisp(), &mut surface, &mut rng);
        surface.take_commands();
        engine.extend(Vec2::new(20.0, 0.0), &crisp(), &mut surface, &mut rng);

        let commands = surface.commands();
        assert!(commands.contains(&DrawCommand::MoveTo(Vec2::new(0.0, 0.0))));
        assert!(commands.contains(&DrawCommand::QuadraticCurveTo {
            control: Vec2::new(10.0, 0.0),
            end: Vec2::new(20.0, 0.0),
        }));
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::LineTo(_))));
        assert_eq!(surface.stroke_count(), 1);
    }

    #[test]
    fn test_smudge_jitters_control_point() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        // control x/y draws, then a smudge roll that stays below 0.7
        let mut rng = SequenceRandom::new(vec![1.0, 0.0, 0.1]);

        engine.begin(Vec2::new(0.0, 0.0));
        engine.extend(Vec2::new(10.0, 0.0), &smudgy(), &mut surface, &mut rng);
        surface.take_commands();
        engine.extend(Vec2::new(20.0, 0.0), &smudgy(), &mut surface, &mut rng);

        assert!(surface.commands().contains(&DrawCommand::QuadraticCurveTo {
            control: Vec2::new(15.0, -5.0),
            end: Vec2::new(20.0, 0.0),
        }));
        assert_eq!(surface.fill_count(), 0);
    }

    #[test]
    fn test_smudge_marks() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        // control x/y, smudge roll 0.8 (> 0.7), count draw 0.0 -> 5 marks
        let mut rng = SequenceRandom::new(vec![0.5, 0.5, 0.8, 0.0]);

        engine.begin(Vec2::new(0.0, 0.0));
        engine.extend(Vec2::new(10.0, 0.0), &smudgy(), &mut surface, &mut rng);
        surface.take_commands();
        engine.extend(Vec2::new(20.0, 0.0), &smudgy(), &mut surface, &mut rng);

        assert_eq!(surface.fill_count(), 5);
        assert!(surface.commands().contains(&DrawCommand::GlobalAlpha(0.5 * 0.4)));
        assert!(surface.commands().contains(&DrawCommand::FillColor(ink(0.5 * 0.3))));
        for command in surface.commands() {
            if let DrawCommand::Arc { center, radius } = command {
                // spread = 2 * 6 * 1 around the midpoint (15, 0)
                assert!((center.x - 15.0).abs() <= 6.0);
                assert!(center.y.abs() <= 6.0);
                assert!(*radius <= 2.0);
            }
        }
    }

    #[test]
    fn test_finish_discards_single_point() {
        let mut engine = StrokeEngine::new();
        engine.begin(Vec2::new(3.0, 3.0));

        assert!(!engine.finish(&crisp(), 0.6));
        assert!(engine.strokes().is_empty());
        assert!(!engine.is_drawing());
    }

    #[test]
    fn test_finish_stores_two_points() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();

        engine.begin(Vec2::new(0.0, 0.0));
        engine.extend(Vec2::new(5.0, 0.0), &crisp(), &mut surface, &mut rng);
        assert!(engine.finish(&crisp(), 0.6));

        assert_eq!(engine.strokes().len(), 1);
        let stroke = &engine.strokes()[0];
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.width(), 2.0);
        assert_eq!(stroke.opacity(), 0.5);
        assert_eq!(stroke.smudge(), 0.0);
        assert_eq!(stroke.texture(), 0.6);
        assert!(!engine.is_drawing());
    }

    #[test]
    fn test_finish_while_idle_is_noop() {
        let mut engine = StrokeEngine::new();
        assert!(!engine.finish(&crisp(), 0.6));
        assert!(engine.strokes().is_empty());
    }

    #[test]
    fn test_extend_while_idle_is_noop() {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();
        assert!(!engine.extend(Vec2::new(50.0, 50.0), &crisp(), &mut surface, &mut rng));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_stroke_requires_two_points() {
        assert!(Stroke::new(vec![Vec2::ZERO], &crisp(), 0.0).is_none());
        assert!(Stroke::new(vec![Vec2::ZERO, Vec2::ONE], &crisp(), 0.0).is_some());
    }

    fn engine_with(points: &[Vec2], params: &DrawingParameters, texture: f32) -> StrokeEngine {
        let mut engine = StrokeEngine::new();
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();
        engine.begin(points[0]);
        for &p in &points[1..] {
            engine.extend(p, params, &mut surface, &mut rng);
        }
        engine.finish(params, texture);
        engine
    }

    #[test]
    fn test_redraw_replays_lines() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 5.0)];
        let engine = engine_with(&points, &crisp(), 0.0);
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();

        engine.redraw(&mut surface, &mut rng);

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(commands.contains(&DrawCommand::LineTo(points[1])));
        assert!(commands.contains(&DrawCommand::LineTo(points[2])));
        assert_eq!(surface.stroke_count(), 1);
        assert_eq!(surface.fill_count(), 0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_redraw_smudged_stroke_uses_midpoints() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0)];
        let engine = engine_with(&points, &smudgy(), 0.0);
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::default();

        engine.redraw(&mut surface, &mut rng);

        assert!(surface.commands().contains(&DrawCommand::QuadraticCurveTo {
            control: Vec2::new(0.0, 0.0),
            end: Vec2::new(5.0, 0.0),
        }));
        assert!(surface.commands().contains(&DrawCommand::QuadraticCurveTo {
            control: Vec2::new(10.0, 0.0),
            end: Vec2::new(15.0, 5.0),
        }));
    }

    #[test]
    fn test_redraw_textures_heavy_strokes() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let engine = engine_with(&points, &crisp(), 0.6);
        let mut surface = RecordingSurface::new(100, 100);
        // count draw 0.9 -> 3 dots per point
        let mut rng = SequenceRandom::constant(0.9);

        engine.redraw(&mut surface, &mut rng);

        assert_eq!(surface.fill_count(), 6);
        for command in surface.commands() {
            if let DrawCommand::Arc { radius, .. } = command {
                assert!(*radius <= 2.0 * 0.7);
            }
        }
    }

    #[test]
    fn test_redraw_skips_light_texture() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let engine = engine_with(&points, &crisp(), 0.5);
        let mut surface = RecordingSurface::new(100, 100);
        let mut rng = SequenceRandom::constant(0.9);

        engine.redraw(&mut surface, &mut rng);
        assert_eq!(surface.fill_count(), 0);
    }

    #[test]
    fn test_clear_drops_strokes() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let mut engine = engine_with(&points, &crisp(), 0.0);
        assert_eq!(engine.strokes().len(), 1);
        engine.clear();
        assert!(engine.strokes().is_empty());
    }
}

//! 2D render surface abstraction
//!
//! The stroke engine talks to a canvas-style path API. [`crate::canvas::Canvas`]
//! rasterizes it in software; [`RecordingSurface`] keeps the calls as a
//! display list, which is what the tests assert against.

use glam::Vec2;

/// Canvas-style immediate-mode path API
pub trait RenderSurface {
    /// Surface width in pixels
    fn width(&self) -> u32;
    /// Surface height in pixels
    fn height(&self) -> u32;

    /// Erase every pixel
    fn clear(&mut self);

    fn set_global_alpha(&mut self, alpha: f32);
    /// RGBA, components 0.0-1.0
    fn set_stroke_color(&mut self, color: [f32; 4]);
    /// RGBA, components 0.0-1.0
    fn set_fill_color(&mut self, color: [f32; 4]);
    fn set_line_width(&mut self, width: f32);

    /// Discard the current path and start a new one
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    fn quadratic_curve_to(&mut self, control: Vec2, end: Vec2);
    /// Add a full circle as its own subpath
    fn arc(&mut self, center: Vec2, radius: f32);

    /// Stroke the current path with the stroke color and line width
    fn stroke(&mut self);
    /// Fill the closed shapes of the current path with the fill color
    fn fill(&mut self);
}

/// A single recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    GlobalAlpha(f32),
    StrokeColor([f32; 4]),
    FillColor([f32; 4]),
    LineWidth(f32),
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticCurveTo { control: Vec2, end: Vec2 },
    Arc { center: Vec2, radius: f32 },
    Stroke,
    Fill,
}

/// Surface that records every call instead of drawing
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// All calls recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded calls, leaving the list empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `stroke()` calls recorded
    pub fn stroke_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Stroke))
    }

    /// Number of `fill()` calls recorded
    pub fn fill_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Fill))
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl RenderSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_stroke_color(&mut self, color: [f32; 4]) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: [f32; 4]) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Vec2) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Vec2) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn quadratic_curve_to(&mut self, control: Vec2, end: Vec2) {
        self.commands
            .push(DrawCommand::QuadraticCurveTo { control, end });
    }

    fn arc(&mut self, center: Vec2, radius: f32) {
        self.commands.push(DrawCommand::Arc { center, radius });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
}

//! Software rasterizer behind the [`RenderSurface`] path API
//!
//! Paths are flattened to polylines. `stroke()` and `fill()` first build an
//! antialiased coverage mask over the path's bounding box, taking the max
//! coverage where shapes overlap, and then composite the mask once. That
//! keeps overlapping segments of one path from darkening each other.

use std::path::Path;

use glam::Vec2;
use tracing::debug;

use crate::render::RenderSurface;
use crate::surface::{CpuSurface, SurfaceError};

/// Quadratic segments never flatten into fewer pieces than this.
const MIN_CURVE_STEPS: usize = 4;
/// Nor more than this.
const MAX_CURVE_STEPS: usize = 64;
/// Target flattened segment length in pixels.
const CURVE_STEP_PX: f32 = 2.0;

/// Pixel-space bounding box, half-open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelRect {
    /// Clamp a float box to the surface; `None` when nothing is left
    fn clamped(min: Vec2, max: Vec2, width: u32, height: u32) -> Option<Self> {
        let x0 = (min.x.floor().max(0.0) as u32).min(width);
        let y0 = (min.y.floor().max(0.0) as u32).min(height);
        let x1 = (max.x.ceil().max(0.0) as u32).min(width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self { x0, y0, x1, y1 })
    }

    fn width(&self) -> u32 {
        self.x1 - self.x0
    }
}

/// Coverage values for one stroke/fill call
struct CoverageMask {
    rect: PixelRect,
    values: Vec<f32>,
}

impl CoverageMask {
    fn new(rect: PixelRect) -> Self {
        let len = (rect.width() as usize) * ((rect.y1 - rect.y0) as usize);
        Self {
            rect,
            values: vec![0.0; len],
        }
    }

    /// Raise coverage inside `area` using a signed-distance function
    fn cover(&mut self, min: Vec2, max: Vec2, coverage_at: impl Fn(Vec2) -> f32) {
        let Some(area) = PixelRect::clamped(min, max, self.rect.x1, self.rect.y1) else {
            return;
        };
        let x0 = area.x0.max(self.rect.x0);
        let y0 = area.y0.max(self.rect.y0);
        let row = self.rect.width() as usize;

        for py in y0..area.y1 {
            for px in x0..area.x1 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let coverage = coverage_at(center);
                if coverage <= 0.0 {
                    continue;
                }
                let index =
                    ((py - self.rect.y0) as usize) * row + (px - self.rect.x0) as usize;
                if coverage > self.values[index] {
                    self.values[index] = coverage.min(1.0);
                }
            }
        }
    }
}

/// Distance from `p` to the segment `a`-`b`
#[inline]
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Software canvas
pub struct Canvas {
    surface: CpuSurface,
    global_alpha: f32,
    stroke_color: [f32; 4],
    fill_color: [f32; 4],
    line_width: f32,
    /// Open polylines of the current path
    subpaths: Vec<Vec<Vec2>>,
    /// Circles of the current path
    circles: Vec<(Vec2, f32)>,
}

impl Canvas {
    /// Create a transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: CpuSurface::new(width, height),
            global_alpha: 1.0,
            stroke_color: [0.0, 0.0, 0.0, 1.0],
            fill_color: [0.0, 0.0, 0.0, 1.0],
            line_width: 1.0,
            subpaths: Vec::new(),
            circles: Vec::new(),
        }
    }

    /// Replace the pixel buffer with a blank one of the new size.
    /// Drawing state survives; pixels do not.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("Canvas::resize: {}x{}", width, height);
        self.surface = CpuSurface::new(width, height);
        self.subpaths.clear();
        self.circles.clear();
    }

    /// Underlying pixels
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Encode the current pixels as PNG
    pub fn export_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        self.surface.export_png(path)
    }

    /// Pen position, the last point of the last subpath
    fn current_point(&self) -> Option<Vec2> {
        self.subpaths.last().and_then(|s| s.last().copied())
    }

    /// Composite a mask with `color`
    fn composite(&mut self, mask: &CoverageMask, color: [f32; 4]) {
        let opacity = self.global_alpha.clamp(0.0, 1.0);
        let row = mask.rect.width() as usize;
        for (i, &coverage) in mask.values.iter().enumerate() {
            if coverage <= 0.0 {
                continue;
            }
            let x = mask.rect.x0 + (i % row) as u32;
            let y = mask.rect.y0 + (i / row) as u32;
            self.surface.blend_pixel(x, y, color, opacity * coverage);
        }
    }
}

impl RenderSurface for Canvas {
    fn width(&self) -> u32 {
        self.surface.width
    }

    fn height(&self) -> u32 {
        self.surface.height
    }

    fn clear(&mut self) {
        self.surface.clear([0.0, 0.0, 0.0, 0.0]);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha;
    }

    fn set_stroke_color(&mut self, color: [f32; 4]) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: [f32; 4]) {
        self.fill_color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        if width > 0.0 && width.is_finite() {
            self.line_width = width;
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
        self.circles.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.subpaths.push(vec![point]);
    }

    fn line_to(&mut self, point: Vec2) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            // lineTo on an empty path behaves like moveTo
            None => self.subpaths.push(vec![point]),
        }
    }

    fn quadratic_curve_to(&mut self, control: Vec2, end: Vec2) {
        let Some(start) = self.current_point() else {
            self.subpaths.push(vec![control]);
            self.line_to(end);
            return;
        };
        let estimate = start.distance(control) + control.distance(end);
        let steps = ((estimate / CURVE_STEP_PX).ceil() as usize).clamp(MIN_CURVE_STEPS, MAX_CURVE_STEPS);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let mt = 1.0 - t;
            let point = start * (mt * mt) + control * (2.0 * mt * t) + end * (t * t);
            self.line_to(point);
        }
    }

    fn arc(&mut self, center: Vec2, radius: f32) {
        if radius > 0.0 && radius.is_finite() {
            self.circles.push((center, radius));
        }
    }

    fn stroke(&mut self) {
        let half = self.line_width * 0.5;
        let pad = Vec2::splat(half + 1.0);

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in self.subpaths.iter().flatten() {
            min = min.min(*point);
            max = max.max(*point);
        }
        let Some(rect) =
            PixelRect::clamped(min - pad, max + pad, self.surface.width, self.surface.height)
        else {
            return;
        };

        let mut mask = CoverageMask::new(rect);
        for subpath in &self.subpaths {
            // A lone point still leaves a round dot, like a round cap
            if subpath.len() == 1 {
                let p = subpath[0];
                mask.cover(p - pad, p + pad, |c| half + 0.5 - c.distance(p));
                continue;
            }
            for pair in subpath.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                mask.cover(a.min(b) - pad, a.max(b) + pad, |c| {
                    half + 0.5 - distance_to_segment(c, a, b)
                });
            }
        }

        let color = self.stroke_color;
        self.composite(&mask, color);
    }

    fn fill(&mut self) {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for &(center, radius) in &self.circles {
            min = min.min(center - Vec2::splat(radius + 1.0));
            max = max.max(center + Vec2::splat(radius + 1.0));
        }
        let Some(rect) = PixelRect::clamped(min, max, self.surface.width, self.surface.height)
        else {
            return;
        };

        let mut mask = CoverageMask::new(rect);
        for &(center, radius) in &self.circles {
            let pad = Vec2::splat(radius + 1.0);
            mask.cover(center - pad, center + pad, |c| radius + 0.5 - c.distance(center));
        }

        let color = self.fill_color;
        self.composite(&mask, color);
    }
}

/// Minimum cursor travel (pixels) before a new point joins the stroke.
pub const MIN_POINT_DISTANCE: f32 = 2.0;

/// Hand speed (pixels per frame) that maps to a normalized speed of 1.
pub const SPEED_NORMALIZER: f32 = 30.0;

/// Smudge factor above which segments get a jittered control point.
pub const SMUDGE_CURVE_THRESHOLD: f32 = 0.3;

/// Texture amount above which replayed strokes get texture dots.
pub const TEXTURE_THRESHOLD: f32 = 0.5;

/// Charcoal ink color, rgb(10, 10, 10).
pub const INK_RGB: [f32; 3] = [10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0];

/// Pressure output range.
pub const PRESSURE_RANGE: (f32, f32) = (0.1, 1.0);

/// Stroke width output range (pixels).
pub const WIDTH_RANGE: (f32, f32) = (0.2, 5.0);

/// Opacity output range.
pub const OPACITY_RANGE: (f32, f32) = (0.1, 0.9);

/// Smudge factor forced by the erase override.
pub const ERASE_SMUDGE: f32 = 0.8;

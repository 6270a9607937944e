//! Graphite painting system - charcoal strokes driven by tracking signals
//!
//! This crate provides the drawing side of the engine:
//! - [`style`] - Charcoal style presets and randomized styles
//! - [`params`] - Mapping of hand, face and audio signals to stroke parameters
//! - [`stroke`] - Stroke accumulation, incremental rendering and redraw
//! - [`render`] - Canvas-style surface trait and a recording surface
//! - [`canvas`] - Software rasterizer behind the surface trait
//! - [`surface`] - CPU RGBA surface with PNG export
//! - [`random`] - Injectable randomness

pub mod canvas;
pub mod constants;
pub mod params;
pub mod random;
pub mod render;
pub mod stroke;
pub mod style;
pub mod surface;

pub use canvas::*;
pub use constants::*;
pub use params::*;
pub use random::*;
pub use render::*;
pub use stroke::*;
pub use style::*;
pub use surface::*;

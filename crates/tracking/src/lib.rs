//! Graphite tracking - landmark input for the drawing session
//!
//! - [`landmarks`] - Hand and face landmark snapshots and per-frame input
//! - [`smoother`] - Inertia smoothing of the tracked fingertip
//! - [`gesture`] - Rule-based gesture classification
//! - [`tracker`] - Tracker trait, recorded-session replay and a synthetic hand

pub mod gesture;
pub mod landmarks;
pub mod smoother;
pub mod tracker;

pub use gesture::*;
pub use landmarks::*;
pub use smoother::*;
pub use tracker::*;

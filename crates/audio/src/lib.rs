//! Graphite audio - gesture-driven recording and playback
//!
//! - [`action`] - Audio actions and playback effects
//! - [`mapping`] - Secret gesture-to-action tables
//! - [`dispatcher`] - Cooldown and probability gated dispatch
//! - [`studio`] - Recording and playback state
//! - [`backend`] - Audio device trait and a logging backend
//! - [`level`] - Spectrum level metering

pub mod action;
pub mod backend;
pub mod dispatcher;
pub mod level;
pub mod mapping;
pub mod studio;

pub use action::*;
pub use backend::*;
pub use dispatcher::*;
pub use level::*;
pub use mapping::*;
pub use studio::*;

//! Graphite - charcoal drawing driven by hand, face, and voice
//!
//! - [`session`] - The drawing session and its per-frame pipeline
//! - [`commands`] - UI commands
//! - [`status`] - Status line with transient messages
//! - [`frame_loop`] - Frame pacing with per-frame failure isolation
//! - [`config`] - Command-line options

pub mod commands;
pub mod config;
pub mod frame_loop;
pub mod session;
pub mod status;

pub use commands::*;
pub use frame_loop::*;
pub use session::*;
pub use status::*;

//! Cannonade - a pivoting cannon that lobs balls into a walled box
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, collisions, fire control)
//! - `renderer`: Draw requests for the host display (Canvas 2D on web)
//! - `audio`: Fire/impact signals (Web Audio on web)
//! - `tuning`: Data-driven physics constants
//! - `settings`: Player preferences

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed host frame interval (one simulation tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Ticks the native headless driver runs when no count is given
    pub const DEFAULT_HEADLESS_TICKS: u64 = 3600;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

//! Data-driven physics tuning
//!
//! Every constant the simulation reads lives here so a JSON file can
//! override it. Defaults reproduce the stock 600x600 cannon box.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned interior of the play field (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            left: 20.0,
            top: 20.0,
            right: 580.0,
            bottom: 580.0,
        }
    }
}

impl Boundary {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True if a circle lies fully inside the bounds
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= self.left
            && center.x + radius <= self.right
            && center.y - radius >= self.top
            && center.y + radius <= self.bottom
    }
}

/// Physics and layout constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Play-field walls
    pub boundary: Boundary,
    /// Full drawing surface (the frame fills arena minus boundary)
    pub arena_size: Vec2,

    /// Bottom-left corner of the launcher stand
    pub launcher_base: Vec2,
    /// Muzzle pivot relative to the base
    pub pivot_offset: Vec2,
    /// Nominal (unrotated) muzzle tip relative to the base
    pub muzzle_offset: Vec2,

    /// Projectile radius; mass always equals radius
    pub projectile_radius: f32,
    /// Fraction of velocity kept after a collision
    pub restitution: f32,
    /// Horizontal friction per tick
    pub drag: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Launch speed in units per tick
    pub launch_speed: f32,

    /// Seconds the fire gate stays closed after a shot
    pub fire_cooldown_secs: f64,
    /// Wall hits closer together than this are silent
    pub impact_sound_guard_secs: f64,

    /// Recycle the oldest projectile past this count (None = unbounded)
    pub max_projectiles: Option<usize>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            boundary: Boundary::default(),
            arena_size: Vec2::new(600.0, 600.0),

            launcher_base: Vec2::new(270.0, 580.0),
            pivot_offset: Vec2::new(15.0, -50.0),
            muzzle_offset: Vec2::new(80.0, -65.0),

            projectile_radius: 15.0,
            restitution: 0.5,
            drag: 0.008,
            gravity: 0.05,
            launch_speed: 9.0,

            fire_cooldown_secs: 0.5,
            impact_sound_guard_secs: 0.2,

            max_projectiles: None,
        }
    }
}

/// Failure to load a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// Malformed JSON or wrong field types
    Parse(serde_json::Error),
    /// Values that would break the simulation
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {e}"),
            TuningError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Pretty-printed JSON, loadable with [`Tuning::from_json`]
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.projectile_radius > 0.0) {
            return Err(TuningError::Invalid(format!(
                "projectile_radius must be positive, got {}",
                self.projectile_radius
            )));
        }
        let b = &self.boundary;
        if b.width() < 2.0 * self.projectile_radius || b.height() < 2.0 * self.projectile_radius {
            return Err(TuningError::Invalid(format!(
                "boundary {}x{} cannot hold a projectile of radius {}",
                b.width(),
                b.height(),
                self.projectile_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(TuningError::Invalid(format!(
                "restitution must be in [0, 1], got {}",
                self.restitution
            )));
        }
        if !(0.0..1.0).contains(&self.drag) {
            return Err(TuningError::Invalid(format!(
                "drag must be in [0, 1), got {}",
                self.drag
            )));
        }
        if self.fire_cooldown_secs < 0.0 || self.impact_sound_guard_secs < 0.0 {
            return Err(TuningError::Invalid("timers cannot be negative".into()));
        }
        if self.max_projectiles == Some(0) {
            return Err(TuningError::Invalid("max_projectiles must be at least 1".into()));
        }
        Ok(())
    }

    /// Absolute position of the muzzle pivot
    pub fn pivot(&self) -> Vec2 {
        self.launcher_base + self.pivot_offset
    }

    /// Absolute position of the unrotated muzzle tip
    pub fn muzzle_target(&self) -> Vec2 {
        self.launcher_base + self.muzzle_offset
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step per tick, clock advanced only by the caller's `dt`
//! - Seeded RNG only (demo autopilot)
//! - Stable iteration order (projectiles in firing order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod demo;
pub mod launcher;
pub mod state;
pub mod tick;

pub use collision::{
    Wall, WallHit, projectiles_touch, resolve_all_pairs, resolve_projectile_collision,
    resolve_wall_collision, wall_violation,
};
pub use demo::DemoPilot;
pub use launcher::{aim_angle, launch_velocity, spawn_position};
pub use state::{FireGate, GameEvent, GameState, Launcher, Projectile};
pub use tick::{InputEvent, TickInput, tick};

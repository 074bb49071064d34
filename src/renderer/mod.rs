//! Rendering module
//!
//! The simulation never draws. Each frame the host asks for a list of
//! [`DrawCommand`]s built from the post-tick state and paints them; on the
//! web that is a Canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;

use glam::Vec2;

use crate::sim::GameState;
use crate::tuning::Boundary;

/// Unrotated barrel rectangle, relative to the launcher base
pub const BARREL_OFFSET: Vec2 = Vec2::new(-20.0, -95.0);
pub const BARREL_SIZE: Vec2 = Vec2::new(100.0, 50.0);
/// Stroke width of the launcher stand
pub const STAND_WIDTH: f32 = 7.0;
/// Width of the stand's footprint
pub const STAND_SPAN: f32 = 30.0;

/// One outbound draw request
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Solid frame filling the arena outside the boundary
    Frame { arena: Vec2, boundary: Boundary },
    /// Launcher stand plus barrel rotated by `angle` around `pivot`
    Launcher {
        base: Vec2,
        pivot: Vec2,
        angle: f32,
        barrel_origin: Vec2,
        barrel_size: Vec2,
    },
    /// Filled projectile
    Circle { center: Vec2, radius: f32 },
}

/// Draw requests for one frame: frame, launcher, then projectiles in firing order
pub fn frame_commands(state: &GameState) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(state.projectiles.len() + 2);

    commands.push(DrawCommand::Frame {
        arena: state.tuning.arena_size,
        boundary: *state.boundary(),
    });

    let launcher = &state.launcher;
    commands.push(DrawCommand::Launcher {
        base: launcher.base,
        pivot: launcher.pivot,
        angle: launcher.angle(),
        barrel_origin: launcher.base + BARREL_OFFSET,
        barrel_size: BARREL_SIZE,
    });

    commands.extend(state.projectiles.iter().map(|p| DrawCommand::Circle {
        center: p.pos,
        radius: p.radius(),
    }));

    commands
}

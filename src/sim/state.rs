//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there is no
//! ambient global state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{Boundary, Tuning};

/// A cannonball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed at creation
    radius: f32,
    /// Fraction of velocity kept after any collision
    pub restitution: f32,
    /// Horizontal friction per tick
    pub drag: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Clock time of the last wall hit (only gates the impact sound)
    pub last_wall_hit: Option<f64>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: tuning.projectile_radius,
            restitution: tuning.restitution,
            drag: tuning.drag,
            gravity: tuning.gravity,
            last_wall_hit: None,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass is the radius, never an independent property
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass() * self.vel.length_squared()
    }

    /// Advance one tick: gated gravity, horizontal drag, explicit Euler step.
    ///
    /// Gravity is skipped once the ball sits within one gravity step of the
    /// floor, which is what lets resting balls settle instead of jittering.
    pub fn integrate(&mut self, floor: f32) {
        if self.pos.y + self.gravity < floor {
            self.vel.y += self.gravity;
        }
        self.vel.x -= self.vel.x * self.drag;
        self.pos += self.vel;
    }
}

/// Fire readiness, reopened against the simulation clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireGate {
    pub ready: bool,
    /// Clock time at which a closed gate opens again
    pub reopens_at: Option<f64>,
}

impl Default for FireGate {
    fn default() -> Self {
        Self {
            ready: true,
            reopens_at: None,
        }
    }
}

impl FireGate {
    /// Open the gate if its cooldown has elapsed
    pub fn poll(&mut self, now: f64) {
        if let Some(at) = self.reopens_at {
            if now >= at {
                self.ready = true;
                self.reopens_at = None;
            }
        }
    }

    /// Close the gate for `cooldown` seconds. Returns false if already closed.
    pub fn try_close(&mut self, now: f64, cooldown: f64) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.reopens_at = Some(now + cooldown);
        true
    }
}

/// Pivoting launcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launcher {
    pub base: Vec2,
    pub pivot: Vec2,
    /// Nominal muzzle tip before rotation
    pub muzzle_target: Vec2,
    /// Current aim; None until the first pointer update
    pub aim: Option<f32>,
}

impl Launcher {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            base: tuning.launcher_base,
            pivot: tuning.pivot(),
            muzzle_target: tuning.muzzle_target(),
            aim: None,
        }
    }

    /// Aim used for drawing and launching (unrotated before any input)
    pub fn angle(&self) -> f32 {
        self.aim.unwrap_or(0.0)
    }
}

/// Things that happened during the last tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile left the muzzle
    Fired { id: u32, pos: Vec2, angle: f32 },
    /// A projectile struck a wall; `audible` is false inside the re-trigger guard
    WallImpact { id: u32, pos: Vec2, audible: bool },
    /// The oldest projectile was dropped to stay under the cap
    Recycled { id: u32 },
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub launcher: Launcher,
    pub fire_gate: FireGate,
    /// Live projectiles in firing order
    pub projectiles: Vec<Projectile>,
    /// Simulation clock in seconds
    pub clock_secs: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paused: bool,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next projectile ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            launcher: Launcher::from_tuning(&tuning),
            tuning,
            fire_gate: FireGate::default(),
            projectiles: Vec::new(),
            clock_secs: 0.0,
            time_ticks: 0,
            paused: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Play-field walls
    #[inline]
    pub fn boundary(&self) -> &Boundary {
        &self.tuning.boundary
    }

    /// Allocate a new projectile ID
    pub fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Total kinetic energy of all live projectiles
    pub fn kinetic_energy(&self) -> f32 {
        self.projectiles.iter().map(Projectile::kinetic_energy).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(pos: Vec2, vel: Vec2) -> Projectile {
        Projectile::new(1, pos, vel, &Tuning::default())
    }

    #[test]
    fn test_mass_equals_radius() {
        let b = ball(Vec2::ZERO, Vec2::ZERO);
        assert_eq!(b.mass(), b.radius());
        assert_eq!(b.radius(), 15.0);
    }

    #[test]
    fn test_gravity_cutoff_near_floor() {
        // 579.97 + 0.05 = 580.02 is not below the floor, so no gravity
        let mut b = ball(Vec2::new(300.0, 579.97), Vec2::new(2.0, 0.0));
        b.integrate(580.0);
        assert_eq!(b.vel.y, 0.0);
        assert!((b.vel.x - 2.0 * (1.0 - 0.008)).abs() < 1e-6);
        assert!((b.pos.x - (300.0 + b.vel.x)).abs() < 1e-4);
    }

    #[test]
    fn test_gravity_applied_in_air() {
        let mut b = ball(Vec2::new(300.0, 300.0), Vec2::ZERO);
        b.integrate(580.0);
        assert!((b.vel.y - 0.05).abs() < 1e-6);
        assert!((b.pos.y - 300.05).abs() < 1e-4);
    }

    #[test]
    fn test_drag_only_touches_horizontal() {
        let mut b = ball(Vec2::new(300.0, 579.99), Vec2::new(10.0, -3.0));
        b.integrate(580.0);
        assert!((b.vel.x - 9.92).abs() < 1e-5);
        assert_eq!(b.vel.y, -3.0);
    }

    #[test]
    fn test_fire_gate_cycle() {
        let mut gate = FireGate::default();
        assert!(gate.try_close(1.0, 0.5));
        assert!(!gate.try_close(1.2, 0.5));
        gate.poll(1.49);
        assert!(!gate.ready);
        gate.poll(1.5);
        assert!(gate.ready);
        assert_eq!(gate.reopens_at, None);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut state = GameState::default();
        assert_eq!(state.next_projectile_id(), 1);
        assert_eq!(state.next_projectile_id(), 2);
    }
}

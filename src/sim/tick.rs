//! Fixed timestep simulation tick
//!
//! One call advances the whole world by one host frame.

use glam::Vec2;

use super::collision::{resolve_all_pairs, resolve_wall_collision};
use super::state::{GameEvent, GameState};

/// A discrete input message from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Absolute pointer position in play-field coordinates
    PointerMoved(Vec2),
    /// Fire button pressed
    Fire,
}

/// Input queued for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Consumed in order at the start of the tick
    pub events: Vec<InputEvent>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn pointer(pos: Vec2) -> Self {
        Self {
            events: vec![InputEvent::PointerMoved(pos)],
            ..Default::default()
        }
    }

    pub fn fire() -> Self {
        Self {
            events: vec![InputEvent::Fire],
            ..Default::default()
        }
    }

    /// Queue a pause press; two presses before the next tick cancel out
    pub fn toggle_pause(&mut self) {
        self.pause = !self.pause;
    }
}

/// Advance the simulation by one tick.
///
/// `dt` only moves the clock (cooldown, impact-sound guard); physics steps
/// are fixed-size per tick. Order: inputs, integrate all, walls, pairs.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "paused" } else { "resumed" });
    }
    if state.paused {
        return;
    }

    state.time_ticks += 1;
    state.clock_secs += f64::from(dt);
    state.fire_gate.poll(state.clock_secs);

    for event in &input.events {
        match *event {
            InputEvent::PointerMoved(pos) => state.aim_at(pos),
            InputEvent::Fire => {
                state.try_fire();
            }
        }
    }

    let floor = state.tuning.boundary.bottom;
    for ball in &mut state.projectiles {
        ball.integrate(floor);
    }

    let now = state.clock_secs;
    let guard = state.tuning.impact_sound_guard_secs;
    for ball in &mut state.projectiles {
        if let Some(hit) = resolve_wall_collision(ball, &state.tuning.boundary, now, guard) {
            log::trace!("projectile {} hit {:?} wall", ball.id, hit.wall);
            state.events.push(GameEvent::WallImpact {
                id: ball.id,
                pos: ball.pos,
                audible: hit.audible,
            });
        }
    }

    resolve_all_pairs(&mut state.projectiles);
}

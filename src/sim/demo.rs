//! Demo autopilot
//!
//! Drives the launcher on its own: glides the pointer toward random points in
//! the upper half of the box and fires whenever the gate is open. Seeded, so
//! the same seed always produces the same session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::GameState;
use super::tick::{InputEvent, TickInput};

/// Pointer travel per tick while gliding to a target
const GLIDE_STEP: f32 = 12.0;

pub struct DemoPilot {
    rng: Pcg32,
    pointer: Option<Vec2>,
    target: Vec2,
    /// Ticks to wait after the gate opens before the next shot
    hold_ticks: u32,
}

impl DemoPilot {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let target = Vec2::ZERO;
        let hold_ticks = rng.random_range(0..30);
        Self {
            rng,
            pointer: None,
            target,
            hold_ticks,
        }
    }

    fn pick_target(&mut self, state: &GameState) -> Vec2 {
        let b = state.boundary();
        let x = self.rng.random_range(b.left..b.right);
        let y = self.rng.random_range(b.top..(b.top + b.height() * 0.5));
        Vec2::new(x, y)
    }

    /// Produce this tick's input for the given state
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        let mut events = Vec::with_capacity(2);

        let pointer = match self.pointer {
            None => {
                self.target = self.pick_target(state);
                self.target
            }
            Some(current) => {
                let to_target = self.target - current;
                if to_target.length() <= GLIDE_STEP {
                    self.target
                } else {
                    current + to_target.normalize() * GLIDE_STEP
                }
            }
        };
        self.pointer = Some(pointer);
        events.push(InputEvent::PointerMoved(pointer));

        if state.fire_gate.ready {
            if self.hold_ticks == 0 {
                events.push(InputEvent::Fire);
                self.hold_ticks = self.rng.random_range(0..45);
                self.target = self.pick_target(state);
            } else {
                self.hold_ticks -= 1;
            }
        }

        TickInput {
            events,
            ..Default::default()
        }
    }
}

//! Aiming and firing
//!
//! The launcher pivots toward the pointer. Firing is gated by a cooldown and
//! spawns a ball at the rotated muzzle tip.

use glam::Vec2;

use super::state::{GameEvent, GameState, Projectile};
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Aim angle from the pivot toward a pointer position (no smoothing or clamping)
#[inline]
pub fn aim_angle(pivot: Vec2, pointer: Vec2) -> f32 {
    (pointer.y - pivot.y).atan2(pointer.x - pivot.x)
}

/// Rotate the nominal muzzle tip around the pivot by the aim angle.
///
/// The pivot-to-target vector is split into length and base angle, then
/// re-projected along `base + aim`.
pub fn spawn_position(pivot: Vec2, nominal_target: Vec2, aim: f32) -> Vec2 {
    let (distance, base_angle) = cartesian_to_polar(nominal_target - pivot);
    pivot + polar_to_cartesian(distance, base_angle + aim)
}

/// Launch velocity along the aim
#[inline]
pub fn launch_velocity(aim: f32, speed: f32) -> Vec2 {
    polar_to_cartesian(speed, aim)
}

impl GameState {
    /// Point the launcher at a pointer position
    pub fn aim_at(&mut self, pointer: Vec2) {
        self.launcher.aim = Some(aim_angle(self.launcher.pivot, pointer));
    }

    /// Fire if the gate is open. Returns the new projectile ID.
    ///
    /// A closed gate makes this a silent no-op.
    pub fn try_fire(&mut self) -> Option<u32> {
        if !self
            .fire_gate
            .try_close(self.clock_secs, self.tuning.fire_cooldown_secs)
        {
            log::debug!("fire ignored, cooling down until {:?}", self.fire_gate.reopens_at);
            return None;
        }

        if let Some(max) = self.tuning.max_projectiles {
            while self.projectiles.len() >= max {
                let evicted = self.projectiles.remove(0);
                log::debug!("recycling projectile {}", evicted.id);
                self.events.push(GameEvent::Recycled { id: evicted.id });
            }
        }

        let angle = self.launcher.angle();
        let pos = spawn_position(self.launcher.pivot, self.launcher.muzzle_target, angle);
        let vel = launch_velocity(angle, self.tuning.launch_speed);

        let id = self.next_projectile_id();
        self.projectiles
            .push(Projectile::new(id, pos, vel, &self.tuning));
        self.events.push(GameEvent::Fired { id, pos, angle });
        log::debug!("fired projectile {} at {:.3} rad from {:?}", id, angle, pos);

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_aim_angle_quadrants() {
        let pivot = Vec2::new(285.0, 530.0);
        assert!(aim_angle(pivot, Vec2::new(385.0, 530.0)).abs() < 1e-6);
        // Screen y grows downward, so straight up is -pi/2
        assert!((aim_angle(pivot, Vec2::new(285.0, 100.0)) + FRAC_PI_2).abs() < 1e-6);
        assert!((aim_angle(pivot, Vec2::new(100.0, 530.0)) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_unrotated_is_nominal_target() {
        let pivot = Vec2::new(285.0, 530.0);
        let target = Vec2::new(350.0, 515.0);
        let p = spawn_position(pivot, target, 0.0);
        assert!((p - target).length() < 1e-3);
    }

    #[test]
    fn test_spawn_rotates_offset_around_pivot() {
        let pivot = Vec2::new(285.0, 530.0);
        let target = Vec2::new(350.0, 515.0);
        // Quarter turn maps offset (65, -15) to (15, 65)
        let p = spawn_position(pivot, target, FRAC_PI_2);
        assert!((p - Vec2::new(300.0, 595.0)).length() < 1e-3);
        // Distance from pivot is preserved
        assert!((p.distance(pivot) - (target - pivot).length()).abs() < 1e-3);
    }

    #[test]
    fn test_fire_before_any_aim_uses_zero_angle() {
        let mut state = GameState::default();
        let id = state.try_fire().unwrap();
        let ball = &state.projectiles[0];
        assert_eq!(ball.id, id);
        assert!((ball.vel - Vec2::new(9.0, 0.0)).length() < 1e-5);
        assert!((ball.pos - Vec2::new(350.0, 515.0)).length() < 1e-3);
        assert_eq!(
            state.events,
            vec![GameEvent::Fired {
                id,
                pos: ball.pos,
                angle: 0.0
            }]
        );
    }

    #[test]
    fn test_fire_along_aim() {
        let mut state = GameState::default();
        state.aim_at(Vec2::new(285.0, 100.0));
        state.try_fire().unwrap();
        let ball = &state.projectiles[0];
        assert!(ball.vel.x.abs() < 1e-5);
        assert!((ball.vel.y + 9.0).abs() < 1e-5);
        assert_eq!(ball.mass(), ball.radius());
    }

    #[test]
    fn test_closed_gate_is_silent_noop() {
        let mut state = GameState::default();
        assert!(state.try_fire().is_some());
        state.events.clear();
        assert!(state.try_fire().is_none());
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_recycling_evicts_oldest() {
        let tuning = Tuning {
            max_projectiles: Some(2),
            fire_cooldown_secs: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning);
        for _ in 0..3 {
            state.try_fire();
            state.fire_gate.poll(state.clock_secs);
        }
        let ids: Vec<u32> = state.projectiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(state.events.contains(&GameEvent::Recycled { id: 1 }));
    }
}

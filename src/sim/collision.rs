//! Collision detection and response
//!
//! Two kinds of contact: a ball against the rectangular walls, and a ball
//! against another ball. Both are discrete per-tick position checks; there
//! is no swept test and no de-penetration.

use glam::Vec2;

use super::state::Projectile;
use crate::tuning::Boundary;

/// Which wall a projectile was pushed back from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Right,
    Left,
    Bottom,
    Top,
}

/// Outcome of a wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall: Wall,
    /// Whether the impact sound should play for this hit
    pub audible: bool,
}

/// First violated wall in right, left, bottom, top order
pub fn wall_violation(pos: Vec2, radius: f32, bounds: &Boundary) -> Option<Wall> {
    if pos.x + radius > bounds.right {
        Some(Wall::Right)
    } else if pos.x - radius < bounds.left {
        Some(Wall::Left)
    } else if pos.y + radius > bounds.bottom {
        Some(Wall::Bottom)
    } else if pos.y - radius < bounds.top {
        Some(Wall::Top)
    } else {
        None
    }
}

/// Bounce a projectile off the walls.
///
/// Any wall contact first scales the vertical velocity by restitution, even
/// for side walls. Then only the first violated wall is clamped and reflected,
/// so a corner takes two ticks to fully resolve.
pub fn resolve_wall_collision(
    ball: &mut Projectile,
    bounds: &Boundary,
    now: f64,
    sound_guard: f64,
) -> Option<WallHit> {
    let r = ball.radius();
    let wall = wall_violation(ball.pos, r, bounds)?;

    let audible = match ball.last_wall_hit {
        Some(last) => now - last >= sound_guard,
        None => true,
    };

    ball.vel.y *= ball.restitution;

    match wall {
        Wall::Right => {
            ball.pos.x = bounds.right - r;
            ball.vel.x *= -1.0;
        }
        Wall::Left => {
            ball.pos.x = bounds.left + r;
            ball.vel.x *= -1.0;
        }
        Wall::Bottom => {
            ball.pos.y = bounds.bottom - r;
            ball.vel.y *= -1.0;
        }
        Wall::Top => {
            ball.pos.y = bounds.top + r;
            ball.vel.y *= -1.0;
        }
    }

    ball.last_wall_hit = Some(now);
    Some(WallHit { wall, audible })
}

/// Circle overlap test, inclusive of exact tangency
#[inline]
pub fn projectiles_touch(a: &Projectile, b: &Projectile) -> bool {
    let reach = a.radius() + b.radius();
    a.pos.distance_squared(b.pos) <= reach * reach
}

/// Exchange momentum along the contact normal, then damp both bodies.
///
/// Returns false when nothing changed: the pair is already separating, or
/// the centers coincide and no normal exists.
pub fn resolve_projectile_collision(a: &mut Projectile, b: &mut Projectile) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    if distance <= 0.0 {
        log::debug!(
            "coincident centers for projectiles {} and {}, skipping",
            a.id,
            b.id
        );
        return false;
    }
    let normal = delta / distance;

    let closing_speed = (a.vel - b.vel).dot(normal);
    if closing_speed < 0.0 {
        return false;
    }

    let (m1, m2) = (a.mass(), b.mass());
    let impulse = 2.0 * closing_speed / (m1 + m2);
    a.vel -= impulse * m2 * normal;
    b.vel += impulse * m1 * normal;

    // Restitution applies to the whole velocity, not just the normal part
    a.vel *= a.restitution;
    b.vel *= b.restitution;

    log::trace!(
        "projectiles {} and {} collided, closing speed {:.3}",
        a.id,
        b.id,
        closing_speed
    );
    true
}

/// Resolve every touching pair once, upper-triangular in insertion order.
///
/// Resolution is sequential: a velocity changed by pair (i, j) is what pair
/// (i, k) sees later in the same pass. Returns the number of resolved pairs.
pub fn resolve_all_pairs(projectiles: &mut [Projectile]) -> usize {
    let mut resolved = 0;
    for i in 0..projectiles.len() {
        for j in (i + 1)..projectiles.len() {
            let (head, tail) = projectiles.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if projectiles_touch(a, b) && resolve_projectile_collision(a, b) {
                resolved += 1;
            }
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn ball(id: u32, pos: Vec2, vel: Vec2) -> Projectile {
        Projectile::new(id, pos, vel, &Tuning::default())
    }

    fn sized_ball(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Projectile {
        let tuning = Tuning {
            projectile_radius: radius,
            ..Tuning::default()
        };
        Projectile::new(id, pos, vel, &tuning)
    }

    #[test]
    fn test_right_wall_bounce() {
        let mut b = ball(1, Vec2::new(581.0, 300.0), Vec2::new(3.0, 2.0));
        let hit = resolve_wall_collision(&mut b, &Boundary::default(), 0.0, 0.2).unwrap();
        assert_eq!(hit.wall, Wall::Right);
        assert!(hit.audible);
        assert_eq!(b.pos.x, 565.0);
        assert_eq!(b.vel.x, -3.0);
        assert_eq!(b.vel.y, 1.0);
        assert_eq!(b.last_wall_hit, Some(0.0));
    }

    #[test]
    fn test_floor_bounce_reverses_after_damping() {
        let mut b = ball(1, Vec2::new(300.0, 570.0), Vec2::new(0.0, 4.0));
        let hit = resolve_wall_collision(&mut b, &Boundary::default(), 0.0, 0.2).unwrap();
        assert_eq!(hit.wall, Wall::Bottom);
        assert_eq!(b.pos.y, 565.0);
        assert_eq!(b.vel.y, -2.0);
    }

    #[test]
    fn test_left_and_top_walls() {
        let bounds = Boundary::default();
        let mut b = ball(1, Vec2::new(30.0, 300.0), Vec2::new(-5.0, 0.0));
        let hit = resolve_wall_collision(&mut b, &bounds, 0.0, 0.2).unwrap();
        assert_eq!(hit.wall, Wall::Left);
        assert_eq!(b.pos.x, 35.0);
        assert_eq!(b.vel.x, 5.0);

        let mut b = ball(2, Vec2::new(300.0, 25.0), Vec2::new(0.0, -4.0));
        let hit = resolve_wall_collision(&mut b, &bounds, 0.0, 0.2).unwrap();
        assert_eq!(hit.wall, Wall::Top);
        assert_eq!(b.pos.y, 35.0);
        assert_eq!(b.vel.y, 2.0);
    }

    #[test]
    fn test_corner_only_resolves_first_wall() {
        let mut b = ball(1, Vec2::new(575.0, 575.0), Vec2::new(2.0, 2.0));
        let hit = resolve_wall_collision(&mut b, &Boundary::default(), 0.0, 0.2).unwrap();
        assert_eq!(hit.wall, Wall::Right);
        assert_eq!(b.pos, Vec2::new(565.0, 575.0));
        // Vertical damped but not reversed
        assert_eq!(b.vel, Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_no_wall_contact_is_untouched() {
        let mut b = ball(1, Vec2::new(300.0, 300.0), Vec2::new(1.0, 1.0));
        let before = b.clone();
        assert!(resolve_wall_collision(&mut b, &Boundary::default(), 0.0, 0.2).is_none());
        assert_eq!(b, before);
    }

    #[test]
    fn test_impact_sound_guard() {
        let bounds = Boundary::default();
        let mut b = ball(1, Vec2::new(581.0, 300.0), Vec2::new(3.0, 0.0));
        assert!(resolve_wall_collision(&mut b, &bounds, 1.0, 0.2).unwrap().audible);

        b.pos.x = 581.0;
        let hit = resolve_wall_collision(&mut b, &bounds, 1.1, 0.2).unwrap();
        assert!(!hit.audible);
        // Suppressed hits still refresh the timestamp
        assert_eq!(b.last_wall_hit, Some(1.1));

        b.pos.x = 581.0;
        assert!(resolve_wall_collision(&mut b, &bounds, 1.5, 0.2).unwrap().audible);
    }

    #[test]
    fn test_tangent_projectiles_touch() {
        let a = ball(1, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let b = ball(2, Vec2::new(130.0, 100.0), Vec2::ZERO);
        assert!(projectiles_touch(&a, &b));

        let c = ball(3, Vec2::new(130.5, 100.0), Vec2::ZERO);
        assert!(!projectiles_touch(&a, &c));
    }

    #[test]
    fn test_head_on_equal_mass_exchange() {
        let mut a = ball(1, Vec2::new(100.0, 100.0), Vec2::new(4.0, 1.0));
        let mut b = ball(2, Vec2::new(130.0, 100.0), Vec2::new(-2.0, 3.0));
        assert!(resolve_projectile_collision(&mut a, &mut b));
        // Normal components swap (4 <-> -2), tangential kept, then halved
        assert!((a.vel.x - (-1.0)).abs() < 1e-5);
        assert!((a.vel.y - 0.5).abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
        assert!((b.vel.y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_separating_pair_is_noop() {
        let mut a = ball(1, Vec2::new(100.0, 100.0), Vec2::new(-1.0, 0.0));
        let mut b = ball(2, Vec2::new(120.0, 100.0), Vec2::new(1.0, 0.0));
        let (a0, b0) = (a.clone(), b.clone());
        assert!(!resolve_projectile_collision(&mut a, &mut b));
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_coincident_centers_guarded() {
        let mut a = ball(1, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0));
        let mut b = ball(2, Vec2::new(100.0, 100.0), Vec2::new(-1.0, 0.0));
        assert!(projectiles_touch(&a, &b));
        assert!(!resolve_projectile_collision(&mut a, &mut b));
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_pairs_resolve_sequentially() {
        // Ball 0 hits ball 1 first; its damped velocity is what ball 2 sees
        let mut balls = vec![
            ball(1, Vec2::new(100.0, 100.0), Vec2::new(4.0, 0.0)),
            ball(2, Vec2::new(130.0, 100.0), Vec2::ZERO),
            ball(3, Vec2::new(70.0, 100.0), Vec2::new(1.0, 0.0)),
        ];
        assert_eq!(resolve_all_pairs(&mut balls), 2);
        // Pair (0,1): ball 0 stops, ball 1 gets 4 then both halve -> 0 and 2
        assert!((balls[1].vel.x - 2.0).abs() < 1e-5);
        // Pair (0,2): ball 2 (behind, at x=70) closes on a stationary ball 0
        // along normal pointing from 0 to 2 (-x): closing = (0 - 1) * -1 = 1
        assert!((balls[0].vel.x - 0.5).abs() < 1e-5);
        assert!(balls[2].vel.x.abs() < 1e-5);
    }

    #[test]
    fn test_mixed_mass_favors_heavier_body() {
        let mut small = sized_ball(1, Vec2::new(100.0, 100.0), Vec2::new(5.0, 0.0), 5.0);
        let mut big = sized_ball(2, Vec2::new(120.0, 100.0), Vec2::ZERO, 15.0);
        assert!(resolve_projectile_collision(&mut small, &mut big));
        // j = 2*5/20 = 0.5; small: 5 - 0.5*15 = -2.5, big: 0.5*5 = 2.5; then * 0.5
        assert!((small.vel.x - (-1.25)).abs() < 1e-5);
        assert!((big.vel.x - 1.25).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_single_wall_containment(
            x in 0.0f32..600.0,
            y in 40.0f32..560.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
        ) {
            // Vertical stays clear so at most one wall is violated
            let bounds = Boundary::default();
            let mut b = ball(1, Vec2::new(x, y), Vec2::new(vx, vy));
            resolve_wall_collision(&mut b, &bounds, 0.0, 0.2);
            prop_assert!(bounds.contains_circle(b.pos, b.radius()));
        }

        #[test]
        fn prop_collision_loses_energy(
            r1 in 1.0f32..30.0,
            r2 in 1.0f32..30.0,
            angle in 0.0f32..std::f32::consts::TAU,
            v1x in -10.0f32..10.0,
            v1y in -10.0f32..10.0,
            v2x in -10.0f32..10.0,
            v2y in -10.0f32..10.0,
        ) {
            let a0 = Vec2::new(300.0, 300.0);
            let offset = crate::polar_to_cartesian(r1 + r2 - 0.5, angle);
            let mut a = sized_ball(1, a0, Vec2::new(v1x, v1y), r1);
            let mut b = sized_ball(2, a0 + offset, Vec2::new(v2x, v2y), r2);
            let before = a.kinetic_energy() + b.kinetic_energy();
            prop_assume!(before > 1e-3);

            if resolve_projectile_collision(&mut a, &mut b) {
                let after = a.kinetic_energy() + b.kinetic_energy();
                prop_assert!(after < before);
            }
        }

        #[test]
        fn prop_separating_pair_unchanged(
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 0.1f32..10.0,
        ) {
            let a0 = Vec2::new(300.0, 300.0);
            let normal = crate::polar_to_cartesian(1.0, angle);
            let mut a = ball(1, a0, -normal * speed);
            let mut b = ball(2, a0 + normal * 25.0, normal * speed);
            let (va, vb) = (a.vel, b.vel);
            prop_assert!(!resolve_projectile_collision(&mut a, &mut b));
            prop_assert_eq!(a.vel, va);
            prop_assert_eq!(b.vel, vb);
        }
    }
}

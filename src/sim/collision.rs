//! Ball-ball collision response
//!
//! Equal-mass elastic exchange: both velocities are rotated into the frame of
//! the line between the centers, the normal components are swapped, the
//! tangential components stay with their ball, and the result is rotated back.

use glam::Vec2;

use super::ball::Ball;
use super::geometry::{collision_angle, distance, rotate_into_frame, rotate_out_of_frame};
use crate::config::CollisionEnergy;
use crate::heading;

/// Result of a resolved overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallCollision {
    /// Unit vector from the first ball toward the second
    pub normal: Vec2,
    /// Overlap depth before separation
    pub overlap: f32,
}

/// Overlap test between two balls
#[inline]
pub fn balls_overlap(a: &Ball, b: &Ball) -> bool {
    distance(a.pos, b.pos) < a.radius + b.radius
}

/// Resolve an overlapping pair in place
///
/// Returns `None` (and touches nothing) when the balls do not overlap.
pub fn resolve_ball_collision(
    a: &mut Ball,
    b: &mut Ball,
    energy: CollisionEnergy,
) -> Option<BallCollision> {
    if !balls_overlap(a, b) {
        return None;
    }
    let dist = distance(a.pos, b.pos);

    let angle = collision_angle(a.pos, b.pos);
    let speed_before = (a.speed() + b.speed()) / 2.0;

    let va = rotate_into_frame(a.vel, angle);
    let vb = rotate_into_frame(b.vel, angle);
    a.vel = rotate_out_of_frame(Vec2::new(vb.x, va.y), angle);
    b.vel = rotate_out_of_frame(Vec2::new(va.x, vb.y), angle);

    if energy == CollisionEnergy::AverageSpeed {
        for ball in [&mut *a, &mut *b] {
            let speed = ball.speed();
            if speed > 0.0 {
                ball.vel *= speed_before / speed;
            }
        }
    }

    // Push apart along the normal, half the overlap each
    let normal = heading(angle);
    let overlap = a.radius + b.radius - dist;
    a.pos -= normal * (overlap / 2.0);
    b.pos += normal * (overlap / 2.0);

    Some(BallCollision { normal, overlap })
}

/// Mutable references to two distinct elements, `i < j`
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallId;
    use proptest::prelude::*;

    fn ball(id: u32, pos: Vec2, vel: Vec2) -> Ball {
        Ball::new(BallId(id), pos, vel, 7.0, 0.0)
    }

    #[test]
    fn test_head_on_exchange_is_exact() {
        let v = 3.5;
        let mut a = ball(1, Vec2::new(-6.0, 0.0), Vec2::new(v, 0.0));
        let mut b = ball(2, Vec2::new(6.0, 0.0), Vec2::new(-v, 0.0));
        let hit = resolve_ball_collision(&mut a, &mut b, CollisionEnergy::Elastic).unwrap();
        assert_eq!(a.vel, Vec2::new(-v, 0.0));
        assert_eq!(b.vel, Vec2::new(v, 0.0));
        assert_eq!(hit.normal, Vec2::new(1.0, 0.0));
        assert_eq!(hit.overlap, 2.0);
    }

    #[test]
    fn test_separation_leaves_balls_touching() {
        let mut a = ball(1, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let mut b = ball(2, Vec2::new(5.0, 5.0), Vec2::new(-1.0, 0.0));
        resolve_ball_collision(&mut a, &mut b, CollisionEnergy::Elastic).unwrap();
        assert!((distance(a.pos, b.pos) - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_tangential_component_is_kept() {
        // Collision axis is x; the y velocities must stay with their balls
        let mut a = ball(1, Vec2::new(-5.0, 0.0), Vec2::new(2.0, 1.5));
        let mut b = ball(2, Vec2::new(5.0, 0.0), Vec2::new(-1.0, -0.5));
        resolve_ball_collision(&mut a, &mut b, CollisionEnergy::Elastic).unwrap();
        assert!((a.vel - Vec2::new(-1.0, 1.5)).length() < 1e-6);
        assert!((b.vel - Vec2::new(2.0, -0.5)).length() < 1e-6);
    }

    #[test]
    fn test_average_speed_policy() {
        let mut a = ball(1, Vec2::new(-5.0, 0.0), Vec2::new(4.0, 3.0));
        let mut b = ball(2, Vec2::new(5.0, 0.0), Vec2::new(-1.0, 0.0));
        resolve_ball_collision(&mut a, &mut b, CollisionEnergy::AverageSpeed).unwrap();
        assert!((a.speed() - 3.0).abs() < 1e-5);
        assert!((b.speed() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_apart_balls_untouched() {
        let mut a = ball(1, Vec2::new(-20.0, 0.0), Vec2::X);
        let mut b = ball(2, Vec2::new(20.0, 0.0), -Vec2::X);
        assert!(!balls_overlap(&a, &b));
        assert!(resolve_ball_collision(&mut a, &mut b, CollisionEnergy::Elastic).is_none());
        assert_eq!(a.vel, Vec2::X);
        assert_eq!(a.pos, Vec2::new(-20.0, 0.0));
    }

    #[test]
    fn test_coincident_centers_separate_along_x() {
        let mut a = ball(1, Vec2::new(3.0, 3.0), Vec2::Y);
        let mut b = ball(2, Vec2::new(3.0, 3.0), -Vec2::Y);
        resolve_ball_collision(&mut a, &mut b, CollisionEnergy::Elastic).unwrap();
        assert_eq!(a.pos, Vec2::new(-4.0, 3.0));
        assert_eq!(b.pos, Vec2::new(10.0, 3.0));
    }

    #[test]
    fn test_pair_mut() {
        let mut v = vec![1, 2, 3, 4];
        let (a, b) = pair_mut(&mut v, 1, 3);
        std::mem::swap(a, b);
        assert_eq!(v, vec![1, 4, 3, 2]);
    }

    proptest! {
        #[test]
        fn prop_elastic_conserves_momentum_and_energy(
            ax in -10.0f32..10.0, ay in -10.0f32..10.0,
            bx in -10.0f32..10.0, by in -10.0f32..10.0,
            ux in -5.0f32..5.0, uy in -5.0f32..5.0,
            wx in -5.0f32..5.0, wy in -5.0f32..5.0,
        ) {
            let mut a = ball(1, Vec2::new(ax, ay), Vec2::new(ux, uy));
            let mut b = ball(2, Vec2::new(bx, by), Vec2::new(wx, wy));
            let momentum = a.vel + b.vel;
            let energy = a.vel.length_squared() + b.vel.length_squared();
            resolve_ball_collision(&mut a, &mut b, CollisionEnergy::Elastic);
            prop_assert!((a.vel + b.vel - momentum).length() < 1e-3);
            let after = a.vel.length_squared() + b.vel.length_squared();
            prop_assert!((after - energy).abs() < 1e-2 * energy.max(1.0));
        }
    }
}

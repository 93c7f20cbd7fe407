//! Geometry helpers for circles and segments
//!
//! Pure functions only. Degenerate inputs (zero-length segments, coincident
//! centers) return well-defined fallbacks instead of NaN.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Reflect velocity off a surface with given unit normal
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Distance from `p` to the closest point of segment `a..b`
///
/// The projection parameter is clamped to [0, 1]; a zero-length segment
/// degenerates to the point distance to `a`.
pub fn point_to_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    distance(p, a + seg * t)
}

/// Angle of the line from `c1` to `c2` (0 when the centers coincide)
#[inline]
pub fn collision_angle(c1: Vec2, c2: Vec2) -> f32 {
    let d = c2 - c1;
    if d == Vec2::ZERO { 0.0 } else { d.y.atan2(d.x) }
}

/// Rotate `v` into the frame whose x axis points along `angle`
///
/// The x component of the result is the along-axis (normal) component, the y
/// component is tangential.
#[inline]
pub fn rotate_into_frame(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos + v.y * sin, v.y * cos - v.x * sin)
}

/// Inverse of [`rotate_into_frame`]
#[inline]
pub fn rotate_out_of_frame(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.y * cos + v.x * sin)
}

/// Unit vector pointing from `center` towards `p`
///
/// Falls back to +X when `p` sits exactly on the center.
#[inline]
pub fn outward_normal(center: Vec2, p: Vec2) -> Vec2 {
    let d = p - center;
    let len = d.length();
    if len > 0.0 { d / len } else { Vec2::X }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);

        // Glancing hit keeps the tangential part
        let reflected = reflect(Vec2::new(3.0, 4.0), Vec2::new(0.0, 1.0));
        assert_eq!(reflected, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_segment_distance_projects_inside() {
        let d = point_to_segment_distance(
            Vec2::new(5.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Beyond b: distance to b, not to the infinite line
        let d = point_to_segment_distance(Vec2::new(13.0, 4.0), a, b);
        assert!((d - 5.0).abs() < 1e-6);
        // Before a
        let d = point_to_segment_distance(Vec2::new(-3.0, -4.0), a, b);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_distance_zero_length() {
        let p = Vec2::new(3.0, 4.0);
        let d = point_to_segment_distance(p, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_collision_angle_coincident_is_zero() {
        let c = Vec2::new(12.0, -7.0);
        assert_eq!(collision_angle(c, c), 0.0);
        let a = collision_angle(Vec2::ZERO, Vec2::new(0.0, 2.0));
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_outward_normal_fallback() {
        assert_eq!(outward_normal(Vec2::ONE, Vec2::ONE), Vec2::X);
        let n = outward_normal(Vec2::ZERO, Vec2::new(0.0, -9.0));
        assert!((n - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_frame_x_axis_is_normal_component() {
        // Along a 90 degree axis, the normal component is the y velocity
        let v = rotate_into_frame(Vec2::new(2.0, 5.0), std::f32::consts::FRAC_PI_2);
        assert!((v.x - 5.0).abs() < 1e-5);
        assert!((v.y + 2.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_reflect_preserves_speed(
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
            theta in 0.0f32..std::f32::consts::TAU,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(theta.cos(), theta.sin());
            let r = reflect(v, n);
            prop_assert!((r.length() - v.length()).abs() <= 1e-3 * v.length().max(1.0));
        }

        #[test]
        fn prop_segment_distance_bounded_by_endpoints(
            px in -100.0f32..100.0, py in -100.0f32..100.0,
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
        ) {
            let p = Vec2::new(px, py);
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let d = point_to_segment_distance(p, a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= distance(p, a).min(distance(p, b)) + 1e-3);
        }

        #[test]
        fn prop_frame_rotation_is_invertible(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            angle in -3.2f32..3.2,
        ) {
            let v = Vec2::new(vx, vy);
            let back = rotate_out_of_frame(rotate_into_frame(v, angle), angle);
            prop_assert!((back - v).length() < 1e-3);
        }
    }
}

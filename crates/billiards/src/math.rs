//! Pure shot and bounce arithmetic. No world access.

use glam::Vec2;

/// Shot power per unit of stretch.
pub const SHOT_POWER: f32 = 0.01;

/// Vector from the release anchor to the pointer.
pub fn shot_stretch(anchor: Vec2, pointer: Vec2) -> Vec2 {
    pointer - anchor
}

/// Launch force for a stretch: `power * |stretch|`, pointed opposite the
/// stretch. Returns `(magnitude, force)`. A zero stretch yields zero force.
pub fn shot_impulse(stretch: Vec2, power: f32) -> (f32, Vec2) {
    let magnitude = power * stretch.length();
    let angle = stretch.y.atan2(stretch.x);
    let impulse = -magnitude * Vec2::new(angle.cos(), angle.sin());
    (magnitude, impulse)
}

/// Scale a velocity by a per-tick damping factor.
pub fn damp(velocity: Vec2, factor: f32) -> Vec2 {
    velocity * factor
}

/// Velocity after a wall hit using the inverse-mass restitution law:
///
/// ```text
/// j  = -(1 + e) * (n . v) / (inv_mass + 1 / inv_mass)
/// v' = v + j * n
/// ```
///
/// The result does not depend on the sign of `normal`. Bodies with no
/// inverse mass keep their velocity.
pub fn bounce_literal(velocity: Vec2, normal: Vec2, inv_mass: f32, restitution: f32) -> Vec2 {
    if inv_mass <= 0.0 {
        return velocity;
    }
    let dot = normal.dot(velocity);
    let impulse = -(1.0 + restitution) * dot / (inv_mass + 1.0 / inv_mass);
    velocity + impulse * normal
}

/// Velocity after a wall hit using plain reflection with restitution:
/// `v' = v - (1 + e)(n . v)n`, applied only while the ball still moves
/// into the wall. `into_wall` points from the ball toward the wall.
pub fn bounce_standard(velocity: Vec2, into_wall: Vec2, restitution: f32) -> Vec2 {
    let n = into_wall.normalize_or_zero();
    let approach = n.dot(velocity);
    if approach <= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn pull_left_shoots_right() {
        let stretch = shot_stretch(Vec2::new(800.0, 300.0), Vec2::new(700.0, 300.0));
        let (magnitude, impulse) = shot_impulse(stretch, SHOT_POWER);
        assert!((magnitude - 1.0).abs() < 1e-6);
        assert!(close(impulse, Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn diagonal_shot_is_opposite_the_stretch() {
        let (magnitude, impulse) = shot_impulse(Vec2::new(30.0, 40.0), SHOT_POWER);
        assert!((magnitude - 0.5).abs() < 1e-6);
        assert!(close(impulse, Vec2::new(-0.3, -0.4)));
    }

    #[test]
    fn zero_stretch_is_zero_force() {
        let (magnitude, impulse) = shot_impulse(Vec2::ZERO, SHOT_POWER);
        assert_eq!(magnitude, 0.0);
        assert_eq!(impulse.length(), 0.0);
        assert!(impulse.x.is_finite() && impulse.y.is_finite());
    }

    #[test]
    fn damping_scales_speed() {
        let v = damp(Vec2::new(30.0, 40.0), 0.99);
        assert!((v.length() - 49.5).abs() < 1e-4);
    }

    #[test]
    fn literal_bounce_matches_formula() {
        let inv_mass = 0.8;
        let v = bounce_literal(Vec2::new(-10.0, 3.0), Vec2::X, inv_mass, 0.5);
        let expected_x = -10.0 + 1.5 * 10.0 / (0.8 + 1.25);
        assert!((v.x - expected_x).abs() < 1e-4);
        assert_eq!(v.y, 3.0);
    }

    #[test]
    fn literal_bounce_ignores_normal_sign() {
        let v = Vec2::new(-10.0, 3.0);
        assert!(close(
            bounce_literal(v, Vec2::X, 0.5, 0.5),
            bounce_literal(v, -Vec2::X, 0.5, 0.5)
        ));
    }

    #[test]
    fn literal_bounce_without_mass_is_identity() {
        let v = Vec2::new(-10.0, 3.0);
        assert_eq!(bounce_literal(v, Vec2::X, 0.0, 0.5), v);
    }

    #[test]
    fn standard_bounce_reflects_approach_only() {
        // Wall on the left, ball moving left into it.
        let v = bounce_standard(Vec2::new(-10.0, 3.0), -Vec2::X, 0.5);
        assert!(close(v, Vec2::new(5.0, 3.0)));
        // Already separating: untouched.
        let v = bounce_standard(Vec2::new(10.0, 3.0), -Vec2::X, 0.5);
        assert!(close(v, Vec2::new(10.0, 3.0)));
    }
}

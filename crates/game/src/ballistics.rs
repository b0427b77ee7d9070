//! Closed-form projectile-motion solvers.
//!
//! Pure math, no state: angle/speed solutions for lobbed shots plus the
//! charged-launch model for manual fire. Every degenerate input (negative
//! discriminant, impossible geometry) degrades to a safe playable default
//! instead of letting a NaN into the simulation.

use glam::Vec2;

/// Angle returned when the target is unreachable at the requested speed.
pub const FALLBACK_ARC_DEG: f32 = 50.0;
/// Solved launch angles are clamped to this range so every shot reads as a
/// lob rather than a flat snipe.
pub const MIN_ARC_DEG: f32 = 45.0;
pub const MAX_ARC_DEG: f32 = 75.0;
/// Minimum effective squared speed when the inverse solve has no solution.
pub const MIN_EFFECTIVE_SPEED_SQ: f32 = 25.0;
/// Below this horizontal distance the range equation blows up; solvers
/// short-circuit to a plain 45 degree lob.
const DEGENERATE_DISTANCE: f32 = 0.1;

/// Solve the projectile range equation for the high-arc branch:
/// `tan θ = (v² + sqrt(v⁴ − g(g·x² + 2·y·v²))) / (g·x)`.
///
/// `horizontal_distance` and `gravity` are magnitudes; `height_difference`
/// is target minus launch height. Returns radians in
/// [`MIN_ARC_DEG`, `MAX_ARC_DEG`], or the [`FALLBACK_ARC_DEG`] lob when the
/// discriminant goes negative (target out of reach at this speed).
pub fn solve_high_arc_angle(
    horizontal_distance: f32,
    height_difference: f32,
    speed: f32,
    gravity: f32,
) -> f32 {
    let x = horizontal_distance.abs();
    if x < DEGENERATE_DISTANCE {
        return MIN_ARC_DEG.to_radians();
    }
    let g = gravity.abs().max(f32::EPSILON);
    let v_sq = speed * speed;
    let discriminant = v_sq * v_sq - g * (g * x * x + 2.0 * height_difference * v_sq);
    if discriminant < 0.0 {
        return FALLBACK_ARC_DEG.to_radians();
    }
    // Larger root selects the lobbed (high-arc) solution.
    let tan_theta = (v_sq + discriminant.sqrt()) / (g * x);
    tan_theta
        .atan()
        .clamp(MIN_ARC_DEG.to_radians(), MAX_ARC_DEG.to_radians())
}

/// Inverse problem: the launch speed that lands on the target when fired at
/// a fixed `angle` (radians). Geometrically impossible shots (non-positive
/// algebraic denominator) return the minimum effective speed instead.
pub fn solve_speed_for_angle(
    horizontal_distance: f32,
    height_difference: f32,
    angle: f32,
    gravity: f32,
) -> f32 {
    let x = horizontal_distance.abs();
    if x < DEGENERATE_DISTANCE {
        return MIN_EFFECTIVE_SPEED_SQ.sqrt();
    }
    let g = gravity.abs().max(f32::EPSILON);
    let cos = angle.cos();
    let denom = 2.0 * cos * cos * (x * angle.tan() - height_difference);
    if denom <= f32::EPSILON {
        return MIN_EFFECTIVE_SPEED_SQ.sqrt();
    }
    let v_sq = (g * x * x / denom).max(MIN_EFFECTIVE_SPEED_SQ);
    v_sq.sqrt()
}

/// Charged-shot launch velocity: speed interpolates between `min_speed` and
/// `max_speed` by how far the aim point is dragged, saturating at
/// `max_charge_distance`.
pub fn charged_launch_velocity(
    direction: Vec2,
    charge_distance: f32,
    min_speed: f32,
    max_speed: f32,
    max_charge_distance: f32,
) -> Vec2 {
    let t = if max_charge_distance > f32::EPSILON {
        (charge_distance / max_charge_distance).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let speed = min_speed + (max_speed - min_speed) * t;
    direction.normalize_or_zero() * speed
}

/// Full lobbed-launch solve from one point to another: picks the high-arc
/// angle for the requested speed, then re-solves speed at that angle so the
/// shot actually lands even after the angle was clamped or fell back.
pub fn launch_velocity_for_arc(from: Vec2, to: Vec2, speed: f32, gravity: f32) -> Vec2 {
    let dx = to.x - from.x;
    let x = dx.abs();
    let y = to.y - from.y;
    let angle = solve_high_arc_angle(x, y, speed, gravity);
    let v = solve_speed_for_angle(x, y, angle, gravity);
    let dir_x = if dx < 0.0 { -1.0 } else { 1.0 };
    Vec2::new(angle.cos() * v * dir_x, angle.sin() * v)
}

/// Forward-sample a ballistic path for aim previews. `gravity` is the
/// signed y acceleration (negative pulls down). Matches the projectile's
/// semi-implicit Euler integration.
pub fn predict_trajectory(
    origin: Vec2,
    velocity: Vec2,
    gravity: f32,
    dt: f32,
    max_seconds: f32,
) -> Vec<Vec2> {
    let dt = dt.max(1e-4);
    let steps = ((max_seconds / dt) as usize).min(10_000);
    let mut points = Vec::with_capacity(steps + 1);
    let mut pos = origin;
    let mut vel = velocity;
    points.push(pos);
    for _ in 0..steps {
        vel.y += gravity * dt;
        pos += vel * dt;
        points.push(pos);
    }
    points
}

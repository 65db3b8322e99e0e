//! Closest-point-of-approach math.
//!
//! Pure functions over plain kinematic data, assuming straight-line motion
//! over the short horizons involved. The host's real trajectories curve, but
//! predictions are refreshed often enough (see the collision engine's
//! adaptive polling) that the linear model holds up.

use glam::DVec3;

/// Time until two linearly-moving points reach minimum separation, clamped
/// to `[0, horizon]`.
///
/// Pairs that are separating have their closest approach *now* (0). Pairs
/// with effectively zero relative velocity never cross and report the
/// horizon, which reads as "not imminent".
pub fn time_to_cpa(p1: DVec3, v1: DVec3, p2: DVec3, v2: DVec3, horizon: f64) -> f64 {
    let rel_pos = p2 - p1;
    let rel_vel = v2 - v1;
    let speed_sq = rel_vel.length_squared();
    if speed_sq < 1e-6 {
        return horizon;
    }
    let t = -rel_pos.dot(rel_vel) / speed_sq;
    t.clamp(0.0, horizon)
}

/// Angle in degrees between a craft's velocity and the direction to the
/// other craft's center of mass. Small angles mean a head-on approach.
///
/// A craft that is not meaningfully moving is not approaching anything:
/// reported as 180°.
pub fn approach_angle_deg(velocity: DVec3, own_pos: DVec3, other_pos: DVec3) -> f64 {
    let to_other = other_pos - own_pos;
    if velocity.length_squared() < 1e-6 || to_other.length_squared() < 1e-12 {
        return 180.0;
    }
    velocity
        .angle_between(to_other)
        .to_degrees()
}

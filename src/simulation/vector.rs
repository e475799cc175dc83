//! Vector helpers shared by the steering rules and the integrator.
//!
//! Every helper here is total: degenerate inputs (zero-length vectors,
//! non-positive extents) produce zero or leave the value untouched instead of
//! producing NaN.

use glam::{Mat3, Quat, Vec3};

/// Normalizes `v` and scales it to `magnitude`, or returns zero when `v` has
/// no direction.
pub fn scaled_to(v: Vec3, magnitude: f32) -> Vec3 {
    let scale = v.abs().max_element();
    if !scale.is_finite() || scale == 0.0 {
        return Vec3::ZERO;
    }
    (v / scale).normalize_or_zero() * magnitude
}

/// Limits the length of `v` to `max`.
///
/// A non-positive `max` or a non-finite `v` yields the zero vector. Vectors
/// whose squared length does not fit in an `f32` keep their direction.
pub fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    if max <= 0.0 || !v.is_finite() {
        return Vec3::ZERO;
    }

    let scale = v.abs().max_element();
    if scale == 0.0 {
        return Vec3::ZERO;
    }

    // components of `unit` lie in [-1, 1], so its length cannot overflow
    let unit = v / scale;
    if unit.length() * scale <= max {
        v
    } else {
        unit.normalize() * max
    }
}

/// `v` when every component is finite, zero otherwise.
pub fn finite_or_zero(v: Vec3) -> Vec3 {
    if v.is_finite() { v } else { Vec3::ZERO }
}

/// Reynolds steering: the correction from `velocity` toward `desired`,
/// bounded by `max_force`.
pub fn steer(desired: Vec3, velocity: Vec3, max_force: f32) -> Vec3 {
    clamp_length(desired - velocity, max_force)
}

/// Wraps a coordinate into `[-half_extent, half_extent)` (toroidal topology).
///
/// # Arguments
///
/// * `value` - Coordinate relative to the center of the wrapped interval
/// * `extent` - Full width of the interval
pub fn wrap_centered(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let half = extent / 2.0;
    (value + half).rem_euclid(extent) - half
}

/// Rotation that maps +Z onto `direction` and keeps local +Y as close to world
/// +Y as possible, or `None` when the direction is degenerate.
///
/// Straight up or down there is no unique roll; the shortest arc from +Z is
/// used instead.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    let Some(right) = Vec3::Y.cross(forward).try_normalize() else {
        return Some(Quat::from_rotation_arc(Vec3::Z, forward));
    };
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Moves `current` toward the heading of `velocity` by spherical
/// interpolation. Returns `current` unchanged for a zero velocity.
pub fn smooth_heading(current: Quat, velocity: Vec3, t: f32) -> Quat {
    match look_rotation(velocity) {
        Some(target) => current.slerp(target, t.clamp(0.0, 1.0)).normalize(),
        None => current,
    }
}

//! Containment policies applied during integration.
//!
//! In [`ContainmentMode::Volumetric`] agents move freely in 3D (a
//! [`super::steering::BoundsRule`] can keep them in a box). In
//! [`ContainmentMode::Planar`] agents live on a bounded plane described by a
//! [`PlanarFrame`]: forces and velocities lose their out-of-plane component and
//! positions wrap toroidally at the plane's edges.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::vector;

/// How agents are kept in the simulated space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentMode {
    /// Unbounded 3D space.
    #[default]
    Volumetric,
    /// Agents projected onto and wrapped within a 2D plane.
    Planar,
}

/// A bounded plane in world space.
///
/// The plane's local x and z axes are in-plane, local y is its normal. `size`
/// holds the full extent along local x (`size.x`) and local z (`size.y`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarFrame {
    /// Center of the plane.
    pub origin: Vec3,
    /// Orientation of the plane's local frame.
    pub rotation: Quat,
    /// Extent along local x and local z.
    pub size: Vec2,
}

impl Default for PlanarFrame {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size: Vec2::splat(20.0),
        }
    }
}

impl PlanarFrame {
    /// Creates a frame centered at `origin` with the given orientation and size.
    pub fn new(origin: Vec3, rotation: Quat, size: Vec2) -> Self {
        Self {
            origin,
            rotation,
            size,
        }
    }

    /// Half extents along local x and local z.
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    /// World-space normal of the plane.
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Converts a world position into the plane's local frame.
    pub fn to_local(&self, position: Vec3) -> Vec3 {
        self.rotation.inverse() * (position - self.origin)
    }

    /// Converts a local position back into world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.rotation * local
    }

    /// Removes the out-of-plane component of a direction (force or velocity).
    pub fn project(&self, v: Vec3) -> Vec3 {
        let normal = self.normal();
        v - normal * v.dot(normal)
    }

    /// Snaps `position` onto the plane and wraps it inside the plane's edges.
    ///
    /// Leaving one edge re-enters at the opposite edge; the in-plane
    /// coordinates never exceed the half extents.
    pub fn contain(&self, position: Vec3) -> Vec3 {
        let local = self.to_local(position);
        let wrapped = Vec3::new(
            vector::wrap_centered(local.x, self.size.x),
            0.0,
            vector::wrap_centered(local.z, self.size.y),
        );
        self.to_world(wrapped)
    }

    /// Maps a point in `[-0.5, 0.5]²` of the plane to world space.
    pub fn point_at(&self, u: f32, v: f32) -> Vec3 {
        self.to_world(Vec3::new(u * self.size.x, 0.0, v * self.size.y))
    }
}

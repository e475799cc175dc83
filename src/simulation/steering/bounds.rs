//! Soft containment inside an axis-aligned box.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::super::agent::Agent;
use super::super::error::{Result, SwarmError, require_non_negative};
use super::super::vector;
use super::rule::SteeringRule;

/// Pushes agents back toward the inside of a box once they come within
/// `edge_threshold` of one of its faces.
///
/// This rule applies equally to every species and has no weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsRule {
    /// Center of the box.
    pub center: Vec3,
    /// Full size of the box along each axis.
    pub size: Vec3,
    /// Distance from a face at which the push starts.
    pub edge_threshold: f32,
    /// Maximum steering force.
    pub max_force: f32,
}

impl Default for BoundsRule {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::splat(20.0),
            edge_threshold: 5.0,
            max_force: 10.0,
        }
    }
}

impl BoundsRule {
    /// Creates a box containment rule.
    pub fn new(center: Vec3, size: Vec3, edge_threshold: f32, max_force: f32) -> Self {
        Self {
            center,
            size,
            edge_threshold,
            max_force,
        }
    }

    /// Per-axis inward direction for `position`: +1 near the low face, -1 near
    /// the high face, 0 in the safe zone.
    pub fn inward(&self, position: Vec3) -> Vec3 {
        let low = self.center - self.size / 2.0 + Vec3::splat(self.edge_threshold);
        let high = self.center + self.size / 2.0 - Vec3::splat(self.edge_threshold);

        let axis = |p: f32, lo: f32, hi: f32| {
            if p < lo {
                1.0
            } else if p > hi {
                -1.0
            } else {
                0.0
            }
        };

        Vec3::new(
            axis(position.x, low.x, high.x),
            axis(position.y, low.y, high.y),
            axis(position.z, low.z, high.z),
        )
    }
}

impl SteeringRule for BoundsRule {
    fn calculate_force(&self, agent: &Agent, _agents: &[Agent]) -> Vec3 {
        let inward = self.inward(agent.position);
        if inward == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let desired = vector::scaled_to(inward, agent.species.max_speed);
        vector::steer(desired, agent.velocity, self.max_force)
    }

    fn name(&self) -> &str {
        "bounds"
    }

    fn validate(&self) -> Result<()> {
        if !self.center.is_finite() || !self.size.is_finite() || self.size.min_element() < 0.0 {
            return Err(SwarmError::InvalidParams {
                name: "bounds.size",
                reason: format!(
                    "box must be finite with non-negative size, got center {} size {}",
                    self.center, self.size
                ),
            });
        }
        require_non_negative("bounds.edge_threshold", self.edge_threshold)?;
        require_non_negative("bounds.max_force", self.max_force)
    }
}

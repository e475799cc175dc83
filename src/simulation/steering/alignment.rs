//! Alignment: match the weighted average heading of visible neighbors.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::super::agent::Agent;
use super::super::error::{Result, require_non_negative};
use super::super::species::SpeciesId;
use super::super::vector;
use super::super::weights::{SpeciesWeight, WeightTable};
use super::rule::{SteeringRule, scan_neighbors};

/// Velocity matching with neighbors within `vision_radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentRule {
    /// Distance within which neighbors are seen.
    pub vision_radius: f32,
    /// Maximum steering force.
    pub max_force: f32,
    /// Influence of each neighbor species.
    pub weights: WeightTable,
}

impl Default for AlignmentRule {
    fn default() -> Self {
        Self {
            vision_radius: 50.0,
            max_force: 2.0,
            weights: WeightTable::default(),
        }
    }
}

impl AlignmentRule {
    /// Creates a rule with no species entries.
    pub fn new(vision_radius: f32, max_force: f32) -> Self {
        Self {
            vision_radius,
            max_force,
            weights: WeightTable::default(),
        }
    }

    /// Adds a weight entry for `species`.
    #[must_use]
    pub fn with_weight(mut self, species: SpeciesId, weight: f32) -> Self {
        self.weights.push(SpeciesWeight::new(species, weight));
        self
    }
}

impl SteeringRule for AlignmentRule {
    fn calculate_force(&self, agent: &Agent, agents: &[Agent]) -> Vec3 {
        let mut heading = Vec3::ZERO;
        let tally = scan_neighbors(
            agent,
            agents,
            &self.weights,
            self.vision_radius,
            |neighbor, _distance, weight| {
                heading += neighbor.velocity * weight;
            },
        );

        let Some(mean_weight) = tally.mean_weight() else {
            return Vec3::ZERO;
        };

        // stationary neighbors give no direction, so the desired velocity is rest
        let desired = vector::scaled_to(heading / tally.total_weight, agent.species.max_speed);
        vector::steer(desired, agent.velocity, self.max_force) * mean_weight
    }

    fn name(&self) -> &str {
        "alignment"
    }

    fn validate(&self) -> Result<()> {
        require_non_negative("alignment.vision_radius", self.vision_radius)?;
        require_non_negative("alignment.max_force", self.max_force)?;
        self.weights.validate()
    }

    fn weights(&self) -> Option<&WeightTable> {
        Some(&self.weights)
    }

    fn weights_mut(&mut self) -> Option<&mut WeightTable> {
        Some(&mut self.weights)
    }
}

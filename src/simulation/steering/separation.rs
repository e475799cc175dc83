//! Separation: steer away from neighbors that are too close.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::super::agent::Agent;
use super::super::error::{Result, require_non_negative};
use super::super::species::SpeciesId;
use super::super::vector;
use super::super::weights::{SpeciesWeight, WeightTable};
use super::rule::{SteeringRule, scan_neighbors};

/// Repulsion from neighbors closer than `min_distance`.
///
/// A species entry's `range` overrides `min_distance` for neighbors of that
/// species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationRule {
    /// Distance at which repulsion starts.
    pub min_distance: f32,
    /// Maximum steering force.
    pub max_force: f32,
    /// Influence of each neighbor species.
    pub weights: WeightTable,
}

impl Default for SeparationRule {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_force: 2.0,
            weights: WeightTable::default(),
        }
    }
}

impl SeparationRule {
    /// Creates a rule with no species entries.
    pub fn new(min_distance: f32, max_force: f32) -> Self {
        Self {
            min_distance,
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

    /// Adds a weight entry for `species` with its own separation distance.
    #[must_use]
    pub fn with_species_distance(mut self, species: SpeciesId, weight: f32, distance: f32) -> Self {
        self.weights
            .push(SpeciesWeight::new(species, weight).with_range(distance));
        self
    }
}

impl SteeringRule for SeparationRule {
    fn calculate_force(&self, agent: &Agent, agents: &[Agent]) -> Vec3 {
        let mut away = Vec3::ZERO;
        let tally = scan_neighbors(
            agent,
            agents,
            &self.weights,
            self.min_distance,
            |neighbor, distance, _weight| {
                away += (agent.position - neighbor.position) / distance;
            },
        );

        let Some(mean_weight) = tally.mean_weight() else {
            return Vec3::ZERO;
        };

        away /= tally.count as f32;
        // opposing neighbors can cancel out exactly
        if away.length_squared() <= f32::EPSILON {
            return Vec3::ZERO;
        }

        let desired = vector::scaled_to(away, agent.species.max_speed);
        vector::steer(desired, agent.velocity, self.max_force) * mean_weight
    }

    fn name(&self) -> &str {
        "separation"
    }

    fn validate(&self) -> Result<()> {
        require_non_negative("separation.min_distance", self.min_distance)?;
        require_non_negative("separation.max_force", self.max_force)?;
        self.weights.validate()
    }

    fn weights(&self) -> Option<&WeightTable> {
        Some(&self.weights)
    }

    fn weights_mut(&mut self) -> Option<&mut WeightTable> {
        Some(&mut self.weights)
    }
}

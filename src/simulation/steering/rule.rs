//! The steering rule contract and the rule set carried by configuration.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::super::agent::Agent;
use super::super::error::{ConfigWarning, Result};
use super::super::species::SpeciesId;
use super::super::weights::{MIN_WEIGHT, WeightTable};
use super::{AlignmentRule, BoundsRule, CohesionRule, SeparationRule};

/// A single steering behavior.
///
/// Rules are evaluated concurrently during force accumulation, so they must be
/// `Send + Sync` and must not mutate shared state while computing a force.
pub trait SteeringRule: Send + Sync + fmt::Debug {
    /// Computes this rule's force contribution for `agent`.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent being steered
    /// * `agents` - The whole population, `agent` included
    ///
    /// # Returns
    ///
    /// A finite force vector; zero when the rule has nothing to react to.
    fn calculate_force(&self, agent: &Agent, agents: &[Agent]) -> Vec3;

    /// Short name used in warnings and logs.
    fn name(&self) -> &str;

    /// The per-species weights of this rule, if it has any.
    fn weights(&self) -> Option<&WeightTable> {
        None
    }

    /// Mutable access to the per-species weights, if the rule has any.
    fn weights_mut(&mut self) -> Option<&mut WeightTable> {
        None
    }

    /// Rejects parameters that would make forces non-finite or inverted.
    fn validate(&self) -> Result<()> {
        self.weights().map_or(Ok(()), WeightTable::validate)
    }

    /// Problems with this rule's configuration.
    fn validation_warnings(&self) -> Vec<ConfigWarning> {
        self.weights()
            .map(|weights| weights.validation_warnings(self.name()))
            .unwrap_or_default()
    }

    /// Aligns the rule's species entries with the species of a configuration.
    fn sync_species(&mut self, known: &[SpeciesId]) {
        if let Some(weights) = self.weights_mut() {
            weights.sync_species(known, 1.0);
        }
    }

    /// Builds any lazy caches ahead of a step.
    fn prepare(&self) {
        if let Some(weights) = self.weights() {
            weights.warm();
        }
    }
}

/// A configured steering rule.
///
/// The built-in behaviors are serializable; [`Rule::Custom`] holds any other
/// [`SteeringRule`] implementation and only exists in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Keep a minimum distance from neighbors.
    Separation(SeparationRule),
    /// Steer toward the weighted center of neighbors.
    Cohesion(CohesionRule),
    /// Match the weighted heading of neighbors.
    Alignment(AlignmentRule),
    /// Stay inside an axis-aligned box.
    Bounds(BoundsRule),
    /// A user-supplied behavior.
    #[serde(skip)]
    Custom(Arc<dyn SteeringRule>),
}

impl Rule {
    /// Wraps a user-defined rule.
    pub fn custom(rule: impl SteeringRule + 'static) -> Self {
        Self::Custom(Arc::new(rule))
    }

    fn inner(&self) -> &dyn SteeringRule {
        match self {
            Self::Separation(rule) => rule,
            Self::Cohesion(rule) => rule,
            Self::Alignment(rule) => rule,
            Self::Bounds(rule) => rule,
            Self::Custom(rule) => rule.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> Option<&mut dyn SteeringRule> {
        match self {
            Self::Separation(rule) => Some(rule),
            Self::Cohesion(rule) => Some(rule),
            Self::Alignment(rule) => Some(rule),
            Self::Bounds(rule) => Some(rule),
            // shared custom rules cannot be edited through the config
            Self::Custom(rule) => Arc::get_mut(rule).map(|rule| rule as &mut dyn SteeringRule),
        }
    }
}

impl SteeringRule for Rule {
    fn calculate_force(&self, agent: &Agent, agents: &[Agent]) -> Vec3 {
        self.inner().calculate_force(agent, agents)
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn weights(&self) -> Option<&WeightTable> {
        self.inner().weights()
    }

    fn weights_mut(&mut self) -> Option<&mut WeightTable> {
        self.inner_mut()?.weights_mut()
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }

    fn validation_warnings(&self) -> Vec<ConfigWarning> {
        self.inner().validation_warnings()
    }

    fn sync_species(&mut self, known: &[SpeciesId]) {
        if let Some(rule) = self.inner_mut() {
            rule.sync_species(known);
        }
    }

    fn prepare(&self) {
        self.inner().prepare();
    }
}

impl From<SeparationRule> for Rule {
    fn from(rule: SeparationRule) -> Self {
        Self::Separation(rule)
    }
}

impl From<CohesionRule> for Rule {
    fn from(rule: CohesionRule) -> Self {
        Self::Cohesion(rule)
    }
}

impl From<AlignmentRule> for Rule {
    fn from(rule: AlignmentRule) -> Self {
        Self::Alignment(rule)
    }
}

impl From<BoundsRule> for Rule {
    fn from(rule: BoundsRule) -> Self {
        Self::Bounds(rule)
    }
}

/// Count and total weight of the neighbors that passed a rule's filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborTally {
    /// Number of qualifying neighbors.
    pub count: usize,
    /// Sum of their species weights.
    pub total_weight: f32,
}

impl NeighborTally {
    /// Mean weight of the qualifying neighbors, or `None` when there are none
    /// or their total weight is too small to divide by.
    pub fn mean_weight(&self) -> Option<f32> {
        if self.count == 0 || self.total_weight <= MIN_WEIGHT {
            return None;
        }
        Some(self.total_weight / self.count as f32)
    }
}

/// Visits every neighbor of `agent` that a species-weighted rule should react
/// to.
///
/// A neighbor qualifies when it is not `agent` itself, its species has a
/// weight above [`MIN_WEIGHT`], and its distance lies strictly between zero and
/// the species' range override (or `radius` when there is none).
///
/// `visit` receives the neighbor, the distance to it and its weight.
pub fn scan_neighbors(
    agent: &Agent,
    agents: &[Agent],
    weights: &WeightTable,
    radius: f32,
    mut visit: impl FnMut(&Agent, f32, f32),
) -> NeighborTally {
    let mut tally = NeighborTally::default();

    for neighbor in agents {
        if neighbor.is_same(agent) {
            continue;
        }

        let Some(entry) = weights.entry_for(neighbor.species_id()) else {
            continue;
        };
        if entry.weight <= MIN_WEIGHT {
            continue;
        }

        let distance = agent.position.distance(neighbor.position);
        let range = entry.range.unwrap_or(radius);
        if distance > 0.0 && distance < range {
            visit(neighbor, distance, entry.weight);
            tally.count += 1;
            tally.total_weight += entry.weight;
        }
    }

    tally
}

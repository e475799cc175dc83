//! Runtime state of one simulated agent.

use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::species::{Species, SpeciesId};

/// Opaque handle to whatever renders an agent outside the simulation.
///
/// The simulation never interprets it; renderers use it to find their own
/// representation of the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualBinding(pub u64);

/// One simulated entity.
///
/// Agents are created when a population is generated and mutated only by
/// [`super::swarm::Swarm::step`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Species shared with every other agent of the same kind.
    pub species: Arc<Species>,
    /// Position in world space.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
    /// Smoothed facing, recommended to renderers.
    pub heading: Quat,
    /// Link to the external representation.
    pub binding: VisualBinding,
}

impl Agent {
    /// Creates an agent at rest, facing +Z.
    pub fn new(species: Arc<Species>, position: Vec3) -> Self {
        Self {
            species,
            position,
            velocity: Vec3::ZERO,
            heading: Quat::IDENTITY,
            binding: VisualBinding::default(),
        }
    }

    /// Sets the initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the visual binding handle.
    #[must_use]
    pub fn with_binding(mut self, binding: VisualBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Id of this agent's species.
    pub fn species_id(&self) -> SpeciesId {
        self.species.id
    }

    /// Current speed.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Whether `other` is this very agent (not merely an equal one).
    pub fn is_same(&self, other: &Agent) -> bool {
        std::ptr::eq(self, other)
    }
}

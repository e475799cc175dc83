//! Population statistics for observers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::species::SpeciesId;
use super::swarm::Swarm;

/// Summary of a swarm at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmStats {
    /// Simulated time.
    pub time: f32,
    /// Number of agents.
    pub agents: usize,
    /// Mean speed over all agents.
    pub mean_speed: f32,
    /// Highest speed of any agent.
    pub max_speed: f32,
    /// Agent count per species.
    pub per_species: BTreeMap<SpeciesId, usize>,
}

impl SwarmStats {
    /// Computes statistics for `swarm`.
    pub fn collect(swarm: &Swarm) -> Self {
        let mut stats = Self {
            time: swarm.time(),
            agents: swarm.len(),
            ..Self::default()
        };

        let mut total_speed = 0.0;
        for agent in swarm.agents() {
            let speed = agent.speed();
            total_speed += speed;
            stats.max_speed = stats.max_speed.max(speed);
            *stats.per_species.entry(agent.species_id()).or_default() += 1;
        }

        if stats.agents > 0 {
            stats.mean_speed = total_speed / stats.agents as f32;
        }
        stats
    }
}

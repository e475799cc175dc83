//! Swarm configuration consumed at generation time.
//!
//! A [`SwarmConfig`] lists the participating species, how many of each to
//! spawn and where, and the ordered rules each species follows. The engine
//! treats it as an immutable snapshot: changes only take effect at the next
//! generation.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::{ConfigWarning, Result};
use super::params::Params;
use super::species::{Species, SpeciesId};
use super::steering::{Rule, SteeringRule};
use super::swarm::RuleMap;

/// Sphere in which a species is spawned in volumetric mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRegion {
    /// Center of the sphere.
    pub offset: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
}

impl Default for SpawnRegion {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            radius: 5.0,
        }
    }
}

/// Configuration of one species participating in a swarm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// The species; unassigned configs are skipped.
    pub species: Option<Species>,
    /// Number of agents to spawn.
    #[serde(default)]
    pub count: usize,
    /// Where to spawn them.
    #[serde(default)]
    pub spawn: SpawnRegion,
    /// Rules in summation order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl SpeciesConfig {
    /// Config spawning `count` agents of `species` with no rules.
    pub fn new(species: Species, count: usize) -> Self {
        Self {
            species: Some(species),
            count,
            spawn: SpawnRegion::default(),
            rules: Vec::new(),
        }
    }

    /// Sets the spawn sphere.
    #[must_use]
    pub fn with_spawn(mut self, offset: Vec3, radius: f32) -> Self {
        self.spawn = SpawnRegion { offset, radius };
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }
}

/// A complete swarm: every participating species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Species configurations.
    pub species: Vec<SpeciesConfig>,
}

impl SwarmConfig {
    /// Creates a configuration from species configs.
    pub fn new(species: Vec<SpeciesConfig>) -> Self {
        Self { species }
    }

    /// Species configs that take part in generation: assigned, and the first
    /// config for each species.
    pub fn active(&self) -> impl Iterator<Item = (&Species, &SpeciesConfig)> {
        let mut seen = HashSet::new();
        self.species.iter().filter_map(move |config| {
            let species = config.species.as_ref()?;
            seen.insert(species.id).then_some((species, config))
        })
    }

    /// Ids of every assigned species, without duplicates.
    pub fn species_ids(&self) -> Vec<SpeciesId> {
        self.active().map(|(species, _)| species.id).collect()
    }

    /// Rules of every active species, keyed by species.
    pub fn rule_map(&self) -> RuleMap {
        self.active()
            .map(|(species, config)| (species.id, config.rules.clone()))
            .collect()
    }

    /// Aligns every rule's species entries with the species in this config.
    pub fn sync_rules(&mut self) {
        let known = self.species_ids();
        for rule in self.species.iter_mut().flat_map(|config| config.rules.iter_mut()) {
            rule.sync_species(&known);
        }
    }

    /// Collects every non-fatal problem in this configuration.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (index, config) in self.species.iter().enumerate() {
            let Some(species) = &config.species else {
                warnings.push(ConfigWarning::UnassignedSpecies { index });
                continue;
            };

            if !seen.insert(species.id) {
                warnings.push(ConfigWarning::DuplicateSpeciesConfig {
                    species: species.id,
                });
                continue;
            }

            if config.count == 0 {
                warnings.push(ConfigWarning::ZeroSpawnCount {
                    species: species.id,
                });
            }

            for rule in &config.rules {
                warnings.extend(rule.validation_warnings());
            }
        }

        warnings
    }
}

/// Parameters and swarm configuration stored together, as loaded by tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Global parameters.
    #[serde(default)]
    pub params: Params,
    /// Participating species.
    pub swarm: SwarmConfig,
    /// Seed for population generation; random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Scenario {
    /// Saves the scenario to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a scenario from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parses a scenario from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

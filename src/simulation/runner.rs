//! The simulation context owned by whatever drives ticks.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::config::{Scenario, SwarmConfig};
use super::error::{Result, SwarmError};
use super::params::Params;
use super::spawn;
use super::stats::SwarmStats;
use super::swarm::Swarm;

/// A configuration plus the population generated from it.
///
/// The context starts empty; [`Simulation::generate`] creates the population
/// and [`Simulation::clear`] discards it. Stepping an empty context is an
/// error.
#[derive(Debug)]
pub struct Simulation {
    config: SwarmConfig,
    params: Params,
    swarm: Option<Swarm>,
    rng: StdRng,
}

impl Simulation {
    /// Creates a context with a randomly seeded generator.
    pub fn new(config: SwarmConfig, params: Params) -> Self {
        Self {
            config,
            params,
            swarm: None,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Creates a context whose generated populations are reproducible.
    pub fn with_seed(config: SwarmConfig, params: Params, seed: u64) -> Self {
        Self {
            config,
            params,
            swarm: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a context from a loaded scenario.
    pub fn from_scenario(scenario: Scenario) -> Self {
        match scenario.seed {
            Some(seed) => Self::with_seed(scenario.swarm, scenario.params, seed),
            None => Self::new(scenario.swarm, scenario.params),
        }
    }

    /// The configuration used by the next generation.
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Replaces the configuration; takes effect at the next generation.
    pub fn set_config(&mut self, config: SwarmConfig) {
        self.config = config;
    }

    /// The parameters used by the next generation.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replaces the parameters; takes effect at the next generation.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Discards the current population and generates a new one.
    pub fn generate(&mut self) -> Result<&Swarm> {
        self.clear();
        let swarm = spawn::generate(&self.config, &self.params, &mut self.rng)?;
        Ok(&*self.swarm.insert(swarm))
    }

    /// Discards the current population.
    pub fn clear(&mut self) {
        if let Some(swarm) = self.swarm.take() {
            debug!(agents = swarm.len(), "cleared swarm");
        }
    }

    /// Whether a population exists.
    pub fn is_generated(&self) -> bool {
        self.swarm.is_some()
    }

    /// The current population, if generated.
    pub fn swarm(&self) -> Option<&Swarm> {
        self.swarm.as_ref()
    }

    /// Advances the population by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SwarmError::InvalidParams {
                name: "dt",
                reason: format!("must be finite and non-negative, got {dt}"),
            });
        }
        let swarm = self.swarm.as_mut().ok_or(SwarmError::NotGenerated)?;
        swarm.step(dt);
        Ok(())
    }

    /// Statistics of the current population.
    pub fn stats(&self) -> Option<SwarmStats> {
        self.swarm.as_ref().map(SwarmStats::collect)
    }
}

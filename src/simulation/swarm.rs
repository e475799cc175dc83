//! The stepping engine.
//!
//! A [`Swarm`] owns a population of agents and the rules that drive each
//! species. Every [`Swarm::step`] runs two globally ordered phases:
//!
//! 1. Force accumulation: every agent's rules are evaluated in parallel
//!    against the same read-only snapshot of the population. Only once all
//!    forces are known are velocities updated and clamped.
//! 2. Integration: positions advance, planar containment is applied and
//!    headings are smoothed, again in parallel and per agent.
//!
//! No agent ever sees another agent's state from the current tick while its
//! force is computed, so results do not depend on iteration order.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::agent::Agent;
use super::containment::{ContainmentMode, PlanarFrame};
use super::error::Result;
use super::params::Params;
use super::species::SpeciesId;
use super::steering::{Rule, SteeringRule};
use super::vector;

/// Rules registered for each species, in summation order.
pub type RuleMap = HashMap<SpeciesId, Vec<Rule>>;

/// A generated population together with its rules and parameters.
#[derive(Debug, Clone)]
pub struct Swarm {
    agents: Vec<Agent>,
    rules: RuleMap,
    params: Params,
    time: f32,
    missing_plane_reported: bool,
}

impl Swarm {
    /// Creates a swarm from an existing population.
    ///
    /// # Arguments
    ///
    /// * `agents` - Initial population, in spawn order
    /// * `rules` - Rules for each species; species without an entry feel no force
    /// * `params` - Global parameters
    ///
    /// Fails with [`super::error::SwarmError::InvalidParams`] when the
    /// parameters, a species' desired speed or a rule's settings are negative
    /// or not finite.
    pub fn from_agents(agents: Vec<Agent>, rules: RuleMap, params: Params) -> Result<Self> {
        params.validate()?;
        for rule in rules.values().flatten() {
            rule.validate()?;
        }
        let mut checked = HashSet::new();
        for agent in &agents {
            if checked.insert(agent.species_id()) {
                agent.species.validate()?;
            }
        }

        for warning in params.warnings() {
            warn!(%warning, "swarm parameters");
        }
        for rule in rules.values().flatten() {
            rule.prepare();
        }

        debug!(
            agents = agents.len(),
            species = rules.len(),
            containment = ?params.containment,
            "swarm created"
        );

        Ok(Self {
            agents,
            rules,
            params,
            time: 0.0,
            missing_plane_reported: false,
        })
    }

    /// The population in spawn order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Global parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Simulated time elapsed, in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Rules that steer agents of `species`.
    pub fn rules_for(&self, species: SpeciesId) -> &[Rule] {
        self.rules.get(&species).map(Vec::as_slice).unwrap_or_default()
    }

    /// The summed steering force on every agent for the current state.
    ///
    /// This is the read-only first half of a step; the result is indexed like
    /// [`Swarm::agents`]. Non-finite rule forces count as zero.
    pub fn accumulate_forces(&self) -> Vec<Vec3> {
        let plane = self.params.active_plane();
        self.forces_with(plane)
    }

    fn forces_with(&self, plane: Option<&PlanarFrame>) -> Vec<Vec3> {
        let agents = &self.agents;
        let rules = &self.rules;

        agents
            .par_iter()
            .map(|agent| {
                let force = rules
                    .get(&agent.species_id())
                    .map(|rules| {
                        let sum = rules
                            .iter()
                            .map(|rule| {
                                vector::finite_or_zero(rule.calculate_force(agent, agents))
                            })
                            .fold(Vec3::ZERO, |sum, force| sum + force);
                        vector::finite_or_zero(sum)
                    })
                    .unwrap_or(Vec3::ZERO);

                match plane {
                    Some(plane) => vector::finite_or_zero(plane.project(force)),
                    None => force,
                }
            })
            .collect()
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// An empty population is a no-op. `dt` must be finite and non-negative;
    /// other values are ignored.
    pub fn step(&mut self, dt: f32) {
        if self.agents.is_empty() {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "ignoring step with invalid time delta");
            return;
        }

        let plane = self.plane_for_step();
        let max_speed = self.params.max_speed;

        // phase 1: every force is computed before any agent changes
        let forces = self.forces_with(plane.as_ref());
        self.agents
            .par_iter_mut()
            .zip(forces.par_iter())
            .for_each(|(agent, force)| {
                let accelerated = agent.velocity + *force * dt;
                agent.velocity = if accelerated.is_finite() {
                    vector::clamp_length(accelerated, max_speed)
                } else {
                    // overflowed: the force alone sets the direction
                    vector::clamp_length(*force, max_speed)
                };
            });

        // phase 2
        let turn = (self.params.heading_smoothing * dt).min(1.0);
        self.agents.par_iter_mut().for_each(|agent| {
            if let Some(plane) = &plane {
                agent.velocity = plane.project(agent.velocity);
            }

            agent.position += agent.velocity * dt;

            if let Some(plane) = &plane {
                agent.position = plane.contain(agent.position);
            }

            if turn > 0.0 {
                agent.heading = vector::smooth_heading(agent.heading, agent.velocity, turn);
            }
        });

        self.time += dt;
    }

    fn plane_for_step(&mut self) -> Option<PlanarFrame> {
        let plane = self.params.active_plane().copied();
        if plane.is_none()
            && self.params.containment == ContainmentMode::Planar
            && !self.missing_plane_reported
        {
            warn!("planar containment without a frame; stepping volumetrically");
            self.missing_plane_reported = true;
        }
        plane
    }
}

//! Default population generation.
//!
//! Turns a [`SwarmConfig`] into a fresh [`Swarm`]. Volumetric swarms spawn each
//! species uniformly inside its spawn sphere; planar swarms spawn uniformly on
//! the plane's rectangle. Agents start moving at half their species speed in
//! a random direction (in-plane for planar swarms).

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use tracing::{info, warn};

use super::agent::{Agent, VisualBinding};
use super::config::{SpawnRegion, SwarmConfig};
use super::containment::PlanarFrame;
use super::error::Result;
use super::params::Params;
use super::swarm::Swarm;

/// Generates a population for `config`.
///
/// Configuration warnings are logged and the offending entries skipped.
/// Agents receive sequential visual bindings in spawn order.
pub fn generate(config: &SwarmConfig, params: &Params, rng: &mut impl Rng) -> Result<Swarm> {
    for warning in config.validate() {
        warn!(%warning, "swarm configuration");
    }

    let plane = params.active_plane();
    let mut agents = Vec::with_capacity(config.active().map(|(_, c)| c.count).sum());

    for (species, species_config) in config.active() {
        let species = Arc::new(species.clone());
        let initial_speed = species.max_speed.min(params.max_speed) * 0.5;

        for _ in 0..species_config.count {
            let (position, velocity) = match plane {
                Some(plane) => spawn_on_plane(plane, initial_speed, rng),
                None => spawn_in_sphere(&species_config.spawn, initial_speed, rng),
            };

            let binding = VisualBinding(agents.len() as u64);
            agents.push(
                Agent::new(Arc::clone(&species), position)
                    .with_velocity(velocity)
                    .with_binding(binding),
            );
        }
    }

    info!(agents = agents.len(), "generated swarm");
    Swarm::from_agents(agents, config.rule_map(), params.clone())
}

fn spawn_in_sphere(region: &SpawnRegion, speed: f32, rng: &mut impl Rng) -> (Vec3, Vec3) {
    let position = region.offset + random_in_unit_sphere(rng) * region.radius;
    let velocity = random_direction(rng) * speed;
    (position, velocity)
}

fn spawn_on_plane(plane: &PlanarFrame, speed: f32, rng: &mut impl Rng) -> (Vec3, Vec3) {
    let position = plane.point_at(rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5));
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let local = Vec3::new(angle.cos(), 0.0, angle.sin());
    (position, plane.rotation * local * speed)
}

/// Uniform point inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Uniform unit vector.
pub fn random_direction(rng: &mut impl Rng) -> Vec3 {
    loop {
        if let Some(direction) = random_in_unit_sphere(rng).try_normalize() {
            return direction;
        }
    }
}

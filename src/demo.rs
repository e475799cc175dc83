use flock::simulation::config::{Scenario, SpeciesConfig, SwarmConfig};
use flock::simulation::containment::PlanarFrame;
use flock::simulation::params::Params;
use flock::simulation::species::Species;
use flock::simulation::steering::{AlignmentRule, CohesionRule, SeparationRule};
use glam::{Quat, Vec2, Vec3};

/// Two species sharing a wrapped plane: a large flock of boids that ignores a
/// handful of predators, and predators that chase the boids while the boids
/// keep well clear of them.
pub fn scenario() -> Scenario {
    let boid = Species::new(1, "boid", 6.0);
    let predator = Species::new(2, "predator", 7.5);

    let boids = SpeciesConfig::new(boid.clone(), 150)
        .with_rule(
            SeparationRule::new(1.5, 3.0)
                .with_weight(boid.id, 1.0)
                .with_species_distance(predator.id, 3.0, 8.0),
        )
        .with_rule(CohesionRule::new(6.0, 1.5).with_weight(boid.id, 1.0))
        .with_rule(AlignmentRule::new(5.0, 2.0).with_weight(boid.id, 1.0));

    let predators = SpeciesConfig::new(predator.clone(), 4)
        .with_rule(SeparationRule::new(4.0, 2.0).with_weight(predator.id, 1.0))
        .with_rule(CohesionRule::new(15.0, 2.5).with_weight(boid.id, 1.0));

    Scenario {
        params: Params {
            max_speed: 8.0,
            ..Params::planar(PlanarFrame::new(
                Vec3::ZERO,
                Quat::IDENTITY,
                Vec2::new(80.0, 60.0),
            ))
        },
        swarm: SwarmConfig::new(vec![boids, predators]),
        seed: None,
    }
}

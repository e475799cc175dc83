#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::collections::HashMap;
use std::sync::Arc;

use flock::simulation::agent::{Agent, VisualBinding};
use flock::simulation::containment::{ContainmentMode, PlanarFrame};
use flock::simulation::error::SwarmError;
use flock::simulation::params::Params;
use flock::simulation::species::Species;
use flock::simulation::stats::SwarmStats;
use flock::simulation::steering::{
    AlignmentRule, CohesionRule, Rule, SeparationRule, SteeringRule,
};
use flock::simulation::swarm::{RuleMap, Swarm};
use glam::{Quat, Vec2, Vec3};

const EPS: f32 = 1e-4;

fn species(id: u32, max_speed: f32) -> Arc<Species> {
    Arc::new(Species::new(id, format!("s{id}"), max_speed))
}

fn flocking_rules(species: &Species) -> Vec<Rule> {
    vec![
        SeparationRule::new(2.0, 2.0).with_weight(species.id, 1.0).into(),
        CohesionRule::new(10.0, 2.0).with_weight(species.id, 1.0).into(),
        AlignmentRule::new(10.0, 2.0).with_weight(species.id, 1.0).into(),
    ]
}

#[derive(Debug)]
struct Thrust(Vec3);

impl SteeringRule for Thrust {
    fn calculate_force(&self, _agent: &Agent, _agents: &[Agent]) -> Vec3 {
        self.0
    }

    fn name(&self) -> &str {
        "thrust"
    }
}

#[test]
fn test_empty_swarm_step_is_noop() {
    let mut swarm = Swarm::from_agents(Vec::new(), RuleMap::new(), Params::default()).unwrap();

    swarm.step(0.1);

    assert!(swarm.is_empty());
    assert_eq!(swarm.time(), 0.0);
}

#[test]
fn test_invalid_params_are_rejected() {
    let params = Params {
        max_speed: -1.0,
        ..Params::default()
    };
    let result = Swarm::from_agents(Vec::new(), RuleMap::new(), params);
    assert!(matches!(
        result,
        Err(SwarmError::InvalidParams {
            name: "max_speed",
            ..
        })
    ));
}

#[test]
fn test_invalid_dt_is_ignored() {
    let a = species(1, 5.0);
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::X)];
    let mut swarm = Swarm::from_agents(agents, RuleMap::new(), Params::default()).unwrap();

    swarm.step(f32::NAN);
    swarm.step(-0.5);

    assert_eq!(swarm.agents()[0].position, Vec3::ZERO);
    assert_eq!(swarm.time(), 0.0);
}

#[test]
fn test_separation_scenario() {
    let a = species(1, 5.0);
    let agents = vec![
        Agent::new(Arc::clone(&a), Vec3::ZERO),
        Agent::new(Arc::clone(&a), Vec3::new(1.0, 0.0, 0.0)),
    ];
    let rules: RuleMap = HashMap::from([(
        a.id,
        vec![SeparationRule::new(2.0, 2.0).with_weight(a.id, 1.0).into()],
    )]);
    let mut swarm = Swarm::from_agents(agents, rules, Params::default()).unwrap();

    let dt = 0.1;
    swarm.step(dt);

    let left = &swarm.agents()[0];
    let right = &swarm.agents()[1];
    assert!(left.velocity.x < 0.0);
    assert!(right.velocity.x > 0.0);
    assert!(left.velocity.length() <= 2.0 * dt + EPS);
    assert!(right.velocity.length() <= 2.0 * dt + EPS);
    assert!(right.position.x - left.position.x > 1.0);
    assert!((swarm.time() - dt).abs() < EPS);
}

#[test]
fn test_speed_never_exceeds_global_limit() {
    let fast = species(1, 100.0);
    let agents = (0..10)
        .map(|i| Agent::new(Arc::clone(&fast), Vec3::new(i as f32, 0.0, 0.0)))
        .collect();
    let rules: RuleMap = HashMap::from([(fast.id, vec![Rule::custom(Thrust(Vec3::new(1e6, -1e6, 3e5)))])]);
    let params = Params {
        max_speed: 3.0,
        ..Params::default()
    };
    let mut swarm = Swarm::from_agents(agents, rules, params).unwrap();

    for _ in 0..100 {
        swarm.step(0.05);
        for agent in swarm.agents() {
            assert!(agent.speed() <= 3.0 + 1e-3, "speed {}", agent.speed());
        }
    }
}

fn separated_pair(weight: f32) -> Swarm {
    let a = species(1, 5.0);
    let agents = vec![
        Agent::new(Arc::clone(&a), Vec3::ZERO),
        Agent::new(Arc::clone(&a), Vec3::new(1.0, 0.0, 0.0)),
    ];
    let rules: RuleMap = HashMap::from([(
        a.id,
        vec![SeparationRule::new(2.0, 2.0).with_weight(a.id, weight).into()],
    )]);
    Swarm::from_agents(agents, rules, Params::default()).unwrap()
}

#[test]
fn test_huge_weights_clamp_instead_of_vanishing() {
    let mut swarm = separated_pair(1e20);

    swarm.step(0.1);

    let max_speed = Params::default().max_speed;
    let left = &swarm.agents()[0];
    let right = &swarm.agents()[1];
    assert!(left.velocity.x < 0.0, "left {}", left.velocity);
    assert!(right.velocity.x > 0.0, "right {}", right.velocity);
    assert!((left.speed() - max_speed).abs() < 1e-3);
    assert!((right.speed() - max_speed).abs() < 1e-3);
}

#[test]
fn test_overflowing_forces_stay_finite() {
    let mut swarm = separated_pair(3e38);

    for _ in 0..10 {
        swarm.step(0.1);
        for agent in swarm.agents() {
            assert!(agent.velocity.is_finite());
            assert!(agent.position.is_finite());
            assert!(agent.speed() <= Params::default().max_speed + 1e-3);
        }
    }
}

#[test]
fn test_non_finite_rule_forces_are_dropped() {
    let a = species(1, 5.0);
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::X)];
    let rules: RuleMap = HashMap::from([(
        a.id,
        vec![
            Rule::custom(Thrust(Vec3::new(f32::INFINITY, 0.0, 0.0))),
            Rule::custom(Thrust(Vec3::new(f32::NAN, 1.0, 0.0))),
            Rule::custom(Thrust(Vec3::new(0.0, 0.0, 2.0))),
        ],
    )]);
    let mut swarm = Swarm::from_agents(agents, rules, Params::default()).unwrap();

    assert_eq!(swarm.accumulate_forces(), vec![Vec3::new(0.0, 0.0, 2.0)]);

    swarm.step(0.5);
    assert!((swarm.agents()[0].velocity - Vec3::new(1.0, 0.0, 1.0)).length() < EPS);
}

#[test]
fn test_overflowing_step_keeps_force_direction() {
    let a = species(1, 5.0);
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::Z)];
    let rules: RuleMap = HashMap::from([(
        a.id,
        vec![Rule::custom(Thrust(Vec3::new(-f32::MAX, 0.0, 0.0)))],
    )]);
    let params = Params {
        max_speed: 4.0,
        ..Params::default()
    };
    let mut swarm = Swarm::from_agents(agents, rules, params).unwrap();

    swarm.step(2.0);

    let velocity = swarm.agents()[0].velocity;
    assert!((velocity - Vec3::new(-4.0, 0.0, 0.0)).length() < 1e-3, "velocity {velocity}");
}

#[test]
fn test_step_does_not_depend_on_agent_order() {
    let a = species(1, 5.0);
    let make = |x: f32, z: f32, v: Vec3, id: u64| {
        Agent::new(Arc::clone(&a), Vec3::new(x, 0.0, z))
            .with_velocity(v)
            .with_binding(VisualBinding(id))
    };
    let agents = vec![
        make(0.0, 0.0, Vec3::new(1.0, 0.0, 0.0), 0),
        make(1.5, 0.5, Vec3::new(0.0, 0.0, 2.0), 1),
        make(-1.0, 3.0, Vec3::new(-1.0, 0.5, 0.0), 2),
        make(4.0, -2.0, Vec3::new(0.0, 1.0, 1.0), 3),
    ];
    let mut reversed = agents.clone();
    reversed.reverse();

    let rules: RuleMap = HashMap::from([(a.id, flocking_rules(&a))]);
    let mut forward = Swarm::from_agents(agents, rules.clone(), Params::default()).unwrap();
    let mut backward = Swarm::from_agents(reversed, rules, Params::default()).unwrap();

    for _ in 0..5 {
        forward.step(0.1);
        backward.step(0.1);
    }

    for agent in forward.agents() {
        let twin = backward
            .agents()
            .iter()
            .find(|other| other.binding == agent.binding)
            .unwrap();
        assert!((agent.position - twin.position).length() < EPS);
        assert!((agent.velocity - twin.velocity).length() < EPS);
    }
}

#[test]
fn test_species_without_rules_drift() {
    let a = species(1, 5.0);
    let b = species(2, 5.0);
    let agents = vec![
        Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::X),
        Agent::new(Arc::clone(&b), Vec3::new(0.5, 0.0, 0.0)).with_velocity(Vec3::Z),
    ];
    let rules: RuleMap = HashMap::from([(
        a.id,
        vec![SeparationRule::new(2.0, 2.0).with_weight(b.id, 1.0).into()],
    )]);
    let mut swarm = Swarm::from_agents(agents, rules, Params::default()).unwrap();

    swarm.step(0.5);

    assert_eq!(swarm.agents()[1].velocity, Vec3::Z);
    assert!((swarm.agents()[1].position - Vec3::new(0.5, 0.0, 0.5)).length() < EPS);
    assert!(swarm.agents()[0].velocity.x < 1.0);
}

#[test]
fn test_planar_wrap_at_edge() {
    let a = species(1, 5.0);
    let frame = PlanarFrame::new(Vec3::ZERO, Quat::IDENTITY, Vec2::new(10.0, 10.0));
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::new(5.0, 0.0, 0.0)).with_velocity(Vec3::X)];
    let mut swarm = Swarm::from_agents(agents, RuleMap::new(), Params::planar(frame)).unwrap();

    swarm.step(0.25);

    let position = swarm.agents()[0].position;
    assert!((position.x - -4.75).abs() < EPS, "wrapped to {position}");
    assert!(position.y.abs() < EPS);
}

#[test]
fn test_planar_positions_stay_within_extents() {
    let a = species(1, 20.0);
    let frame = PlanarFrame::new(
        Vec3::new(3.0, 1.0, -2.0),
        Quat::from_rotation_x(0.4) * Quat::from_rotation_y(1.1),
        Vec2::new(12.0, 6.0),
    );
    let agents = vec![
        Agent::new(Arc::clone(&a), frame.point_at(0.1, 0.2))
            .with_velocity(frame.rotation * Vec3::new(9.0, 0.0, 4.0)),
        Agent::new(Arc::clone(&a), frame.point_at(-0.4, 0.0))
            .with_velocity(frame.rotation * Vec3::new(-7.0, 0.0, -9.0)),
    ];
    let params = Params {
        max_speed: 20.0,
        ..Params::planar(frame)
    };
    let mut swarm = Swarm::from_agents(agents, RuleMap::new(), params).unwrap();
    let half = frame.half_extents();

    for _ in 0..200 {
        swarm.step(0.1);
        for agent in swarm.agents() {
            let local = frame.to_local(agent.position);
            assert!(local.x.abs() <= half.x + 1e-3, "x {}", local.x);
            assert!(local.z.abs() <= half.y + 1e-3, "z {}", local.z);
            assert!(local.y.abs() < 1e-3);
        }
    }
}

#[test]
fn test_planar_projects_velocity_and_force() {
    let a = species(1, 5.0);
    let frame = PlanarFrame::new(Vec3::ZERO, Quat::IDENTITY, Vec2::new(50.0, 50.0));
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::new(0.0, 2.0, 0.0)).with_velocity(Vec3::new(1.0, 3.0, 0.0))];
    let rules: RuleMap = HashMap::from([(a.id, vec![Rule::custom(Thrust(Vec3::new(0.0, 10.0, 1.0)))])]);
    let mut swarm = Swarm::from_agents(agents, rules, Params::planar(frame)).unwrap();

    let forces = swarm.accumulate_forces();
    assert!((forces[0] - Vec3::new(0.0, 0.0, 1.0)).length() < EPS);

    swarm.step(0.1);

    let agent = &swarm.agents()[0];
    assert!(agent.velocity.y.abs() < EPS);
    assert!(agent.position.y.abs() < EPS);
    assert!((agent.velocity - Vec3::new(1.0, 0.0, 0.1)).length() < EPS);
}

#[test]
fn test_planar_without_frame_is_volumetric() {
    let a = species(1, 5.0);
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::new(0.0, 3.0, 0.0))];
    let params = Params {
        containment: ContainmentMode::Planar,
        planar_frame: None,
        ..Params::default()
    };
    let mut swarm = Swarm::from_agents(agents, RuleMap::new(), params).unwrap();

    swarm.step(0.5);
    swarm.step(0.5);

    let agent = &swarm.agents()[0];
    assert_eq!(agent.velocity, Vec3::new(0.0, 3.0, 0.0));
    assert!((agent.position.y - 3.0).abs() < EPS);
}

#[test]
fn test_heading_turns_toward_velocity() {
    let a = species(1, 5.0);
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::X)];
    let mut swarm = Swarm::from_agents(agents, RuleMap::new(), Params::default()).unwrap();

    let facing = |swarm: &Swarm| swarm.agents()[0].heading * Vec3::Z;
    let before = facing(&swarm).dot(Vec3::X);
    swarm.step(0.05);
    let after = facing(&swarm).dot(Vec3::X);
    assert!(after > before);

    for _ in 0..200 {
        swarm.step(0.05);
    }
    assert!(facing(&swarm).dot(Vec3::X) > 0.99);
}

#[test]
fn test_heading_kept_when_smoothing_disabled() {
    let a = species(1, 5.0);
    let agents = vec![Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::X)];
    let params = Params {
        heading_smoothing: 0.0,
        ..Params::default()
    };
    let mut swarm = Swarm::from_agents(agents, RuleMap::new(), params).unwrap();
    let heading = swarm.agents()[0].heading;

    swarm.step(0.1);

    assert_eq!(swarm.agents()[0].heading, heading);
}

#[test]
fn test_stats() {
    let a = species(1, 5.0);
    let b = species(2, 5.0);
    let agents = vec![
        Agent::new(Arc::clone(&a), Vec3::ZERO).with_velocity(Vec3::new(3.0, 0.0, 0.0)),
        Agent::new(Arc::clone(&a), Vec3::ONE).with_velocity(Vec3::new(0.0, 1.0, 0.0)),
        Agent::new(Arc::clone(&b), Vec3::NEG_ONE).with_velocity(Vec3::new(0.0, 0.0, 2.0)),
    ];
    let swarm = Swarm::from_agents(agents, RuleMap::new(), Params::default()).unwrap();

    let stats = SwarmStats::collect(&swarm);
    assert_eq!(stats.agents, 3);
    assert!((stats.mean_speed - 2.0).abs() < EPS);
    assert!((stats.max_speed - 3.0).abs() < EPS);
    assert_eq!(stats.per_species.get(&a.id), Some(&2));
    assert_eq!(stats.per_species.get(&b.id), Some(&1));
}

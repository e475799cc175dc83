//! # Flock - Multi-species Steering Simulation
//!
//! Agents of several species move under a composable set of weighted steering
//! rules. Each species has its own rule list, and each rule weighs how
//! strongly every other species influences it.
//!
//! ## Features
//!
//! - Separation, cohesion, alignment and box containment rules
//! - Per-species weight tables with lazily rebuilt caches
//! - Two-phase parallel stepping (forces from a snapshot, then integration)
//! - Volumetric or planar (toroidally wrapped) containment
//! - Heading smoothing for renderers
//! - JSON scenarios and a default population spawner
//!
//! ## Core Modules
//!
//! - [`simulation::swarm`] - The stepping engine
//! - [`simulation::steering`] - Steering rules
//! - [`simulation::weights`] - Per-species weight tables
//! - [`simulation::containment`] - Planar containment
//! - [`simulation::runner`] - Owned simulation context

/// Core simulation logic and data structures.
pub mod simulation {
    /// Runtime agent state.
    pub mod agent;
    /// Swarm configuration and scenarios.
    pub mod config;
    /// Volumetric and planar containment.
    pub mod containment;
    /// Error and configuration warning types.
    pub mod error;
    /// Global simulation parameters.
    pub mod params;
    /// Simulation context that generates, clears and steps a swarm.
    pub mod runner;
    /// Default population generation.
    pub mod spawn;
    /// Species identity.
    pub mod species;
    /// Population statistics.
    pub mod stats;
    /// Steering rules.
    ///
    /// Every rule implements [`steering::SteeringRule`]; configurations hold
    /// them as [`steering::Rule`] values.
    pub mod steering;
    /// Two-phase stepping engine.
    pub mod swarm;
    /// Vector helpers.
    pub mod vector;
    /// Per-species weight tables.
    pub mod weights;
}

pub use simulation::agent::{Agent, VisualBinding};
pub use simulation::config::{Scenario, SpawnRegion, SpeciesConfig, SwarmConfig};
pub use simulation::containment::{ContainmentMode, PlanarFrame};
pub use simulation::error::{ConfigWarning, Result, SwarmError};
pub use simulation::params::Params;
pub use simulation::runner::Simulation;
pub use simulation::species::{Species, SpeciesId};
pub use simulation::steering::{
    AlignmentRule, BoundsRule, CohesionRule, Rule, SeparationRule, SteeringRule,
};
pub use simulation::swarm::{RuleMap, Swarm};
pub use simulation::weights::{SpeciesWeight, WeightTable};

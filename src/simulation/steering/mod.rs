//! Steering rules and the contract they share.

mod alignment;
mod bounds;
mod cohesion;
mod rule;
mod separation;

pub use alignment::AlignmentRule;
pub use bounds::BoundsRule;
pub use cohesion::CohesionRule;
pub use rule::{NeighborTally, Rule, SteeringRule, scan_neighbors};
pub use separation::SeparationRule;

//! Species identity shared by agents, weight tables and configuration.
//!
//! A species is identified by an explicitly assigned [`SpeciesId`]. Two
//! [`Species`] values with the same id are the same species, whatever their
//! other attributes say, so the id can be used as a map key and survives
//! serialization.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::error::{Result, require_non_negative};

/// Stable identifier of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable per-species attributes.
///
/// Created when a configuration is loaded and shared (through `Arc`) by every
/// agent of that species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    /// Identity of the species.
    pub id: SpeciesId,
    /// Human-readable name, used for logging and display.
    #[serde(default)]
    pub name: String,
    /// Magnitude of the desired velocity used by steering rules.
    pub max_speed: f32,
}

impl Species {
    /// Creates a species with the given id, name and desired speed.
    pub fn new(id: u32, name: impl Into<String>, max_speed: f32) -> Self {
        Self {
            id: SpeciesId(id),
            name: name.into(),
            max_speed,
        }
    }

    /// Rejects a desired speed that is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        require_non_negative("species.max_speed", self.max_speed)
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Species {}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_is_by_id() {
        let a = Species::new(1, "boid", 5.0);
        let b = Species::new(1, "renamed", 9.0);
        let c = Species::new(2, "boid", 5.0);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Species> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_falls_back_to_id() {
        assert_eq!(Species::new(3, "", 1.0).to_string(), "#3");
        assert_eq!(Species::new(3, "fish", 1.0).to_string(), "fish (#3)");
    }
}

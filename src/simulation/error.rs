//! Error and warning types.
//!
//! Fatal misuse is reported through [`SwarmError`]. Configuration problems that
//! the engine can work around are reported as [`ConfigWarning`] values and
//! never stop a simulation from being generated or stepped.

use super::species::SpeciesId;

/// Errors returned by fallible simulation and configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum SwarmError {
    /// `step` was called before a population was generated.
    #[error("simulation has not been generated")]
    NotGenerated,

    /// A global parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParams {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Reading or writing a configuration file failed.
    #[error("configuration i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed or serialized.
    #[error("configuration is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T, E = SwarmError> = std::result::Result<T, E>;

/// Rejects `value` unless it is finite and non-negative.
pub fn require_non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SwarmError::InvalidParams {
            name,
            reason: format!("must be finite and non-negative, got {value}"),
        })
    }
}

/// Non-fatal configuration problems.
///
/// These are surfaced to configuration tooling and logged; the offending data
/// is never modified at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    /// A rule lists the same species more than once. The first entry is used.
    #[error("rule `{rule}` has duplicate weight entries for species {species}")]
    DuplicateSpeciesWeight {
        /// Name of the rule.
        rule: String,
        /// The duplicated species.
        species: SpeciesId,
    },

    /// A weight entry has no species assigned and is ignored.
    #[error("rule `{rule}` has {count} weight entries without a species")]
    UnassignedWeightEntry {
        /// Name of the rule.
        rule: String,
        /// Number of unassigned entries.
        count: usize,
    },

    /// A species config spawns no agents.
    #[error("species {species} has a spawn count of zero")]
    ZeroSpawnCount {
        /// The species with nothing to spawn.
        species: SpeciesId,
    },

    /// A species config has no species assigned and is skipped.
    #[error("species config at index {index} has no species assigned")]
    UnassignedSpecies {
        /// Position of the entry in the swarm configuration.
        index: usize,
    },

    /// The same species is configured twice. Only the first config is used.
    #[error("species {species} is configured more than once")]
    DuplicateSpeciesConfig {
        /// The duplicated species.
        species: SpeciesId,
    },

    /// Planar containment was requested without a planar frame.
    #[error("planar containment has no frame configured; agents move volumetrically")]
    PlanarFrameMissing,
}

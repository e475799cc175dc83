//! Per-species weight tables used by the steering rules.
//!
//! A rule is authored with a sparse list of [`SpeciesWeight`] entries. Lookups
//! go through a cache keyed by [`SpeciesId`] which is either stale or exactly
//! the result of [`build_cache`] over the current list. Every mutation of the
//! list goes through [`WeightTable`] and marks the cache stale.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::error::{ConfigWarning, Result, SwarmError, require_non_negative};
use super::species::SpeciesId;

/// Weights at or below this value count as "no influence".
pub const MIN_WEIGHT: f32 = 1e-3;

/// One authored entry of a weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesWeight {
    /// Species this entry applies to. `None` entries are skipped.
    pub species: Option<SpeciesId>,
    /// Influence of the species on the rule.
    pub weight: f32,
    /// Optional per-species distance that overrides the rule's own radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
}

impl SpeciesWeight {
    /// Entry for `species` with `weight` and no range override.
    pub fn new(species: SpeciesId, weight: f32) -> Self {
        Self {
            species: Some(species),
            weight,
            range: None,
        }
    }

    /// Sets a per-species range override.
    #[must_use]
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = Some(range);
        self
    }
}

/// State of the lookup cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WeightCache {
    /// Must be rebuilt before the next lookup.
    #[default]
    Stale,
    /// Consistent with the authored entries.
    Fresh(HashMap<SpeciesId, SpeciesWeight>),
}

impl WeightCache {
    /// Whether the cache can be used without a rebuild.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Builds the lookup map from authored entries.
///
/// Unassigned entries are skipped and the first entry wins when a species is
/// listed more than once.
pub fn build_cache(entries: &[SpeciesWeight]) -> HashMap<SpeciesId, SpeciesWeight> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(species) = entry.species {
            map.entry(species).or_insert(*entry);
        }
    }
    map
}

/// Sparse species weights plus a lazily rebuilt lookup cache.
///
/// The cache lives behind a lock so that lookups from parallel force
/// accumulation never observe a half-built map.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SpeciesWeight>", into = "Vec<SpeciesWeight>")]
pub struct WeightTable {
    entries: Vec<SpeciesWeight>,
    cache: RwLock<WeightCache>,
}

impl WeightTable {
    /// Creates a table from authored entries. The cache starts stale.
    pub fn new(entries: Vec<SpeciesWeight>) -> Self {
        Self {
            entries,
            cache: RwLock::new(WeightCache::Stale),
        }
    }

    /// The authored entries, in authoring order.
    pub fn entries(&self) -> &[SpeciesWeight] {
        &self.entries
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: SpeciesWeight) {
        self.entries.push(entry);
        self.invalidate();
    }

    /// Replaces all entries.
    pub fn set_entries(&mut self, entries: Vec<SpeciesWeight>) {
        self.entries = entries;
        self.invalidate();
    }

    /// Edits the entries in place.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Vec<SpeciesWeight>) -> R) -> R {
        let result = f(&mut self.entries);
        self.invalidate();
        result
    }

    /// Marks the cache stale.
    pub fn invalidate(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = WeightCache::Stale;
    }

    /// Whether the next lookup will use the cache without rebuilding it.
    pub fn is_fresh(&self) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_fresh()
    }

    /// Rebuilds the cache now if it is stale.
    pub fn warm(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if !cache.is_fresh() {
            *cache = WeightCache::Fresh(build_cache(&self.entries));
        }
    }

    /// The effective entry for `species`, if any.
    pub fn entry_for(&self, species: SpeciesId) -> Option<SpeciesWeight> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let WeightCache::Fresh(map) = &*cache {
                return map.get(&species).copied();
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let WeightCache::Fresh(map) = &*cache {
            return map.get(&species).copied();
        }
        let map = build_cache(&self.entries);
        let found = map.get(&species).copied();
        *cache = WeightCache::Fresh(map);
        found
    }

    /// Weight for `species`; 0 when the species is not listed.
    pub fn weight_for(&self, species: SpeciesId) -> f32 {
        self.entry_for(species).map_or(0.0, |entry| entry.weight)
    }

    /// Species listed more than once, in order of first appearance.
    pub fn duplicate_species(&self) -> Vec<SpeciesId> {
        let mut seen = HashMap::new();
        let mut duplicates = Vec::new();
        for species in self.entries.iter().filter_map(|entry| entry.species) {
            let count = seen.entry(species).or_insert(0usize);
            *count += 1;
            if *count == 2 {
                duplicates.push(species);
            }
        }
        duplicates
    }

    /// Warnings about this table, attributed to the rule called `rule`.
    pub fn validation_warnings(&self, rule: &str) -> Vec<ConfigWarning> {
        let mut warnings: Vec<ConfigWarning> = self
            .duplicate_species()
            .into_iter()
            .map(|species| ConfigWarning::DuplicateSpeciesWeight {
                rule: rule.to_owned(),
                species,
            })
            .collect();

        let unassigned = self.entries.iter().filter(|e| e.species.is_none()).count();
        if unassigned > 0 {
            warnings.push(ConfigWarning::UnassignedWeightEntry {
                rule: rule.to_owned(),
                count: unassigned,
            });
        }
        warnings
    }

    /// Rejects non-finite weights and negative or non-finite range overrides.
    ///
    /// Negative weights are accepted and count as no influence.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if !entry.weight.is_finite() {
                return Err(SwarmError::InvalidParams {
                    name: "weight",
                    reason: format!("must be finite, got {}", entry.weight),
                });
            }
            if let Some(range) = entry.range {
                require_non_negative("range", range)?;
            }
        }
        Ok(())
    }

    /// Aligns the entries with the set of known species.
    ///
    /// Species in `known` without an entry get one with `default_weight`.
    /// Entries without a species, or for a species not in `known`, are removed.
    pub fn sync_species(&mut self, known: &[SpeciesId], default_weight: f32) {
        self.edit(|entries| {
            for &species in known {
                if !entries.iter().any(|e| e.species == Some(species)) {
                    entries.push(SpeciesWeight::new(species, default_weight));
                }
            }
            entries.retain(|e| e.species.is_some_and(|s| known.contains(&s)));
        });
    }
}

impl Clone for WeightTable {
    fn clone(&self) -> Self {
        Self::new(self.entries.clone())
    }
}

impl PartialEq for WeightTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl From<Vec<SpeciesWeight>> for WeightTable {
    fn from(entries: Vec<SpeciesWeight>) -> Self {
        Self::new(entries)
    }
}

impl From<WeightTable> for Vec<SpeciesWeight> {
    fn from(table: WeightTable) -> Self {
        table.entries
    }
}

impl FromIterator<SpeciesWeight> for WeightTable {
    fn from_iter<I: IntoIterator<Item = SpeciesWeight>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const A: SpeciesId = SpeciesId(1);
    const B: SpeciesId = SpeciesId(2);

    #[test]
    fn unlisted_species_has_zero_weight() {
        let table = WeightTable::new(vec![SpeciesWeight::new(A, 0.7)]);
        assert!((table.weight_for(A) - 0.7).abs() < f32::EPSILON);
        assert_eq!(table.weight_for(B), 0.0);
    }

    #[test]
    fn first_entry_wins_and_is_reported() {
        let table = WeightTable::new(vec![
            SpeciesWeight::new(A, 1.0),
            SpeciesWeight::new(A, 0.2),
            SpeciesWeight::new(A, 0.4),
        ]);
        assert_eq!(table.weight_for(A), 1.0);
        assert_eq!(table.duplicate_species(), vec![A]);
        assert_eq!(table.entries().len(), 3);
    }

    #[test]
    fn unassigned_entries_are_skipped() {
        let table = WeightTable::new(vec![
            SpeciesWeight {
                species: None,
                weight: 5.0,
                range: None,
            },
            SpeciesWeight::new(B, 0.5),
        ]);
        assert_eq!(table.weight_for(B), 0.5);
        assert_eq!(build_cache(table.entries()).len(), 1);
        assert_eq!(
            table.validation_warnings("test"),
            vec![ConfigWarning::UnassignedWeightEntry {
                rule: "test".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn mutation_invalidates_cache() {
        let mut table = WeightTable::new(vec![SpeciesWeight::new(A, 1.0)]);
        assert!(!table.is_fresh());
        assert_eq!(table.weight_for(A), 1.0);
        assert!(table.is_fresh());

        table.edit(|entries| entries[0].weight = 0.25);
        assert!(!table.is_fresh());
        assert_eq!(table.weight_for(A), 0.25);

        table.push(SpeciesWeight::new(B, 2.0));
        assert_eq!(table.weight_for(B), 2.0);

        table.set_entries(Vec::new());
        assert_eq!(table.weight_for(A), 0.0);
    }

    #[test]
    fn sync_adds_missing_and_drops_unknown() {
        let mut table = WeightTable::new(vec![
            SpeciesWeight::new(A, 0.3),
            SpeciesWeight::new(SpeciesId(9), 1.0),
            SpeciesWeight {
                species: None,
                weight: 1.0,
                range: None,
            },
        ]);
        table.sync_species(&[A, B], 1.0);

        assert_eq!(
            table.entries(),
            &[SpeciesWeight::new(A, 0.3), SpeciesWeight::new(B, 1.0)]
        );
        assert_eq!(table.weight_for(SpeciesId(9)), 0.0);
    }

    #[test]
    fn clone_starts_stale() {
        let table = WeightTable::new(vec![SpeciesWeight::new(A, 1.0)]);
        table.warm();
        let copy = table.clone();
        assert!(table.is_fresh());
        assert!(!copy.is_fresh());
        assert_eq!(copy, table);
    }
}

//! Tech alias index.
//!
//! Several concrete units can count as the same tech for requirement
//! purposes (a Lair still satisfies "has a Hatchery"). Units opt in by
//! declaring the alias name; lookups expand an alias to every unit that
//! declared it.

use std::collections::{BTreeMap, BTreeSet};

/// Alias name → concrete unit names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl AliasIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `unit` stands for `alias`.
    pub fn register(&mut self, alias: impl Into<String>, unit: impl Into<String>) {
        self.entries
            .entry(alias.into())
            .or_default()
            .insert(unit.into());
    }

    /// Expand a name to the sorted set of concrete names it stands for.
    ///
    /// A name nobody aliased stands for itself.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Vec<String> {
        match self.entries.get(name) {
            Some(units) => units.iter().cloned().collect(),
            None => vec![name.to_string()],
        }
    }

    /// Whether any unit registered under `alias`.
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Number of distinct aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_alias_resolves_to_itself() {
        let index = AliasIndex::new();
        assert_eq!(index.resolve("Barracks"), vec!["Barracks".to_string()]);
    }

    #[test]
    fn test_alias_expands_sorted_and_deduplicated() {
        let mut index = AliasIndex::new();
        index.register("Alias_Hatchery", "Lair");
        index.register("Alias_Hatchery", "Hive");
        index.register("Alias_Hatchery", "Lair");
        assert_eq!(
            index.resolve("Alias_Hatchery"),
            vec!["Hive".to_string(), "Lair".to_string()]
        );
        assert!(index.contains("Alias_Hatchery"));
        assert_eq!(index.len(), 1);
    }
}

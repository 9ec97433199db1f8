//! Command card resolution.
//!
//! A unit's live command references are the buttons of its non-removed
//! cards, in card order then slot order, with later repeats dropped.

use std::collections::HashSet;

use crate::catalog::CatalogStore;
use crate::data::Unit;

/// A parsed `"Ability,Command"` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandRef<'a> {
    /// Ability name.
    pub ability: &'a str,
    /// Command slot key.
    pub command: &'a str,
}

impl std::fmt::Display for CommandRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.ability, self.command)
    }
}

/// Split a command reference. Anything but exactly one comma is rejected.
#[must_use]
pub fn split_command_ref(reference: &str) -> Option<CommandRef<'_>> {
    let (ability, command) = reference.split_once(',')?;
    if command.contains(',') {
        return None;
    }
    Some(CommandRef { ability, command })
}

/// Live, de-duplicated command references of a unit.
///
/// The first occurrence (lowest card, then lowest slot) wins.
#[must_use]
pub fn live_command_refs(unit: &Unit) -> Vec<&str> {
    let mut seen = HashSet::new();
    unit.cards
        .values()
        .filter(|card| !card.removed)
        .flat_map(|card| card.buttons.values())
        .map(String::as_str)
        .filter(|reference| !reference.is_empty())
        .filter(|reference| seen.insert(*reference))
        .collect()
}

/// Command card lookups by unit name.
#[derive(Debug, Clone, Copy)]
pub struct CommandCardResolver<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> CommandCardResolver<'a> {
    /// Create a resolver over a converged catalog.
    #[must_use]
    pub const fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    /// Live command references of a unit; empty for unknown units.
    #[must_use]
    pub fn live_command_refs(&self, unit: &str) -> Vec<&'a str> {
        self.catalog
            .unit(unit)
            .map(live_command_refs)
            .unwrap_or_default()
    }
}

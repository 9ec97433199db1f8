//! Ability command → stable ID mapping.
//!
//! Stable IDs are keyed by `"Ability,offset"`, where the offset is derived
//! from the command slot name: `Execute` is 0, `Train3` is 2.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::CatalogStore;
use crate::data::EXECUTE_SLOT;
use crate::math::parse_int;
use crate::stable_id::StableIdTable;

/// Slot prefixes carrying a 1-based command number.
const NUMBERED_PREFIXES: [&str; 3] = ["Build", "Train", "Research"];

/// Zero-based command offset of a slot name.
///
/// `Execute` and unrecognized slots map to 0. Numbered slots need at least
/// one character after the prefix; a number below 1 has no offset.
#[must_use]
pub fn command_offset(slot: &str) -> Option<u64> {
    if slot.eq_ignore_ascii_case(EXECUTE_SLOT) {
        return Some(0);
    }
    for prefix in NUMBERED_PREFIXES {
        let Some(head) = slot.get(..prefix.len()) else {
            continue;
        };
        if slot.len() > prefix.len() && head.eq_ignore_ascii_case(prefix) {
            let number = parse_int(&slot[prefix.len()..]);
            return number.checked_sub(1).and_then(|n| u64::try_from(n).ok());
        }
    }
    Some(0)
}

/// Maps ability commands to stable IDs.
#[derive(Debug, Clone, Copy)]
pub struct AbilityCommandIndexer<'a> {
    ids: &'a StableIdTable,
}

impl<'a> AbilityCommandIndexer<'a> {
    /// Create an indexer over a stable ID table.
    #[must_use]
    pub const fn new(ids: &'a StableIdTable) -> Self {
        Self { ids }
    }

    /// Stable ID lookup key, if the slot has an offset.
    #[must_use]
    pub fn key(ability: &str, slot: &str) -> Option<String> {
        command_offset(slot).map(|offset| format!("{ability},{offset}"))
    }

    /// Stable ID of an ability command; 0 when unmapped.
    #[must_use]
    pub fn index(&self, ability: &str, slot: &str) -> u64 {
        match Self::key(ability, slot) {
            Some(key) => self.ids.ability_command_id(&key),
            None => {
                tracing::debug!("No command offset for '{ability},{slot}', using 0");
                0
            }
        }
    }
}

/// Several exported commands sharing one stable ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCollision {
    /// The shared ID (0 for unmapped commands).
    pub id: u64,
    /// Colliding `"Ability,Command"` references, sorted.
    pub commands: BTreeSet<String>,
}

/// Find stable IDs reached by more than one exported ability command.
#[must_use]
pub fn find_collisions(catalog: &CatalogStore, ids: &StableIdTable) -> Vec<IdCollision> {
    let indexer = AbilityCommandIndexer::new(ids);
    let mut by_id: BTreeMap<u64, BTreeSet<String>> = BTreeMap::new();
    for ability in catalog.abilities() {
        for command in ability.exported_commands() {
            let id = indexer.index(&ability.name, &command.slot);
            by_id
                .entry(id)
                .or_default()
                .insert(format!("{},{}", ability.name, command.slot));
        }
    }

    by_id
        .into_iter()
        .filter(|(_, commands)| commands.len() > 1)
        .map(|(id, commands)| IdCollision { id, commands })
        .collect()
}

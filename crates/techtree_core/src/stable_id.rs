//! Stable external identifiers.
//!
//! The export is keyed by numeric IDs assigned outside this system. The
//! table is built once from a pre-supplied listing and then only read.
//! A missing mapping is not an error: callers get `0` and a debug log
//! line, because the catalog legitimately references deprecated names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which partition of the table a lookup hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StableIdKind {
    /// Unit names.
    Unit,
    /// `"Ability,index"` keys.
    AbilityCommand,
    /// Upgrade names.
    Upgrade,
}

impl std::fmt::Display for StableIdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => write!(f, "unit"),
            Self::AbilityCommand => write!(f, "ability command"),
            Self::Upgrade => write!(f, "upgrade"),
        }
    }
}

/// A named entry of the stable ID listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedId {
    /// Stable numeric ID.
    pub id: u64,
    /// Catalog name.
    pub name: String,
}

/// Command index of an ability entry; listings use both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandIndex {
    /// Numeric index.
    Number(u64),
    /// Textual index.
    Text(String),
}

impl std::fmt::Display for CommandIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// An ability command entry of the stable ID listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCommandId {
    /// Stable numeric ID.
    pub id: u64,
    /// Ability name.
    pub name: String,
    /// Command index within the ability.
    pub index: CommandIndex,
}

/// The stable ID listing as supplied.
///
/// # Example JSON
///
/// ```json
/// {
///   "Units": [{ "id": 86, "name": "Hatchery" }],
///   "Abilities": [{ "id": 1216, "name": "UpgradeToLair", "index": 0 }],
///   "Upgrades": [{ "id": 66, "name": "zerglingmovementspeed" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableIdListing {
    /// Unit entries.
    #[serde(rename = "Units", default)]
    pub units: Vec<NamedId>,
    /// Ability command entries.
    #[serde(rename = "Abilities", default)]
    pub abilities: Vec<AbilityCommandId>,
    /// Upgrade entries.
    #[serde(rename = "Upgrades", default)]
    pub upgrades: Vec<NamedId>,
}

/// Name → stable ID lookup, partitioned by kind.
#[derive(Debug, Clone, Default)]
pub struct StableIdTable {
    units: HashMap<String, u64>,
    ability_commands: HashMap<String, u64>,
    upgrades: HashMap<String, u64>,
}

impl From<StableIdListing> for StableIdTable {
    fn from(listing: StableIdListing) -> Self {
        let mut table = Self::new();
        for unit in listing.units {
            table.units.insert(unit.name, unit.id);
        }
        for ability in listing.abilities {
            let key = format!("{},{}", ability.name, ability.index);
            table.ability_commands.insert(key, ability.id);
        }
        for upgrade in listing.upgrades {
            table.upgrades.insert(upgrade.name, upgrade.id);
        }
        table
    }
}

impl StableIdTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit mapping.
    #[must_use]
    pub fn with_unit(mut self, name: impl Into<String>, id: u64) -> Self {
        self.units.insert(name.into(), id);
        self
    }

    /// Add an ability command mapping for `"ability,index"`.
    #[must_use]
    pub fn with_ability_command(mut self, ability: &str, index: u32, id: u64) -> Self {
        self.ability_commands.insert(format!("{ability},{index}"), id);
        self
    }

    /// Add an upgrade mapping.
    #[must_use]
    pub fn with_upgrade(mut self, name: impl Into<String>, id: u64) -> Self {
        self.upgrades.insert(name.into(), id);
        self
    }

    fn partition(&self, kind: StableIdKind) -> &HashMap<String, u64> {
        match kind {
            StableIdKind::Unit => &self.units,
            StableIdKind::AbilityCommand => &self.ability_commands,
            StableIdKind::Upgrade => &self.upgrades,
        }
    }

    /// Look up an ID without falling back.
    #[must_use]
    pub fn get(&self, kind: StableIdKind, name: &str) -> Option<u64> {
        self.partition(kind).get(name).copied()
    }

    /// Look up an ID, degrading to `0` when it is not mapped.
    #[must_use]
    pub fn lookup(&self, kind: StableIdKind, name: &str) -> u64 {
        self.get(kind, name).unwrap_or_else(|| {
            tracing::debug!("Missing stable {kind} id for '{name}', using 0");
            0
        })
    }

    /// Stable ID of a unit, or `0`.
    #[must_use]
    pub fn unit_id(&self, name: &str) -> u64 {
        self.lookup(StableIdKind::Unit, name)
    }

    /// Stable ID of an `"Ability,index"` key, or `0`.
    #[must_use]
    pub fn ability_command_id(&self, key: &str) -> u64 {
        self.lookup(StableIdKind::AbilityCommand, key)
    }

    /// Stable ID of an upgrade, or `0`.
    #[must_use]
    pub fn upgrade_id(&self, name: &str) -> u64 {
        self.lookup(StableIdKind::Upgrade, name)
    }

    /// Number of mappings in a partition.
    #[must_use]
    pub fn len(&self, kind: StableIdKind) -> usize {
        self.partition(kind).len()
    }
}

//! Race (faction) definitions and identifiers.

use serde::{Deserialize, Serialize};

/// Faction tag carried by every unit and upgrade.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    /// Critters, doodads, map objects.
    #[default]
    Neutral,
    /// Terran.
    Terran,
    /// Protoss.
    Protoss,
    /// Zerg.
    Zerg,
}

impl Race {
    /// Races that get a tech tree, in derivation order.
    pub const PLAYABLE: [Self; 3] = [Self::Zerg, Self::Protoss, Self::Terran];

    /// Parse the catalog race tag (`Terr`, `Prot`, `Zerg`), case-insensitively.
    ///
    /// Anything else is neutral.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("Terr") {
            Self::Terran
        } else if tag.eq_ignore_ascii_case("Prot") {
            Self::Protoss
        } else if tag.eq_ignore_ascii_case("Zerg") {
            Self::Zerg
        } else {
            Self::Neutral
        }
    }

    /// Lowercase name used as an export key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Terran => "terran",
            Self::Protoss => "protoss",
            Self::Zerg => "zerg",
        }
    }

    /// Whether this race gets a tech tree.
    #[must_use]
    pub const fn is_playable(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl std::fmt::Display for Race {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

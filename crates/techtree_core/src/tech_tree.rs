//! Per-race tech tree derivation.
//!
//! Walks each unit's live command card and classifies every command by
//! its ability kind: production (train/build), morphs, and research.

use std::fmt::Write as _;

use crate::catalog::CatalogStore;
use crate::command_card::{live_command_refs, split_command_ref, CommandRef};
use crate::data::{AbilityCommand, AbilityKind};
use crate::factions::Race;
use crate::filter::NameFilter;
use crate::math::Fixed;

/// Produced-unit names containing one of these are intermediate states.
pub const DEFAULT_TRANSIENT_MARKERS: [&str; 2] = ["Cocoon", "Egg"];

/// A unit-producing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEdge {
    /// Representative produced unit.
    pub unit: String,
    /// Ability name.
    pub ability: String,
    /// Command slot key.
    pub command: String,
    /// Duration.
    pub time: Fixed,
    /// Requirement reference, empty if none.
    pub requirements: String,
}

/// An upgrade research edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchEdge {
    /// Researched upgrade.
    pub upgrade: String,
    /// Ability name.
    pub ability: String,
    /// Command slot key.
    pub command: String,
    /// Duration.
    pub time: Fixed,
    /// Mineral cost.
    pub minerals: i64,
    /// Vespene cost.
    pub vespene: i64,
    /// Requirement reference, empty if none.
    pub requirements: String,
}

/// Everything one unit can produce, morph into, or research.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechTreeEntry {
    /// Unit name.
    pub unit: String,
    /// Train and build edges.
    pub builds: Vec<BuildEdge>,
    /// Morph edges.
    pub morphs: Vec<BuildEdge>,
    /// Research edges.
    pub researches: Vec<ResearchEdge>,
}

impl TechTreeEntry {
    /// Whether the entry has no edges at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty() && self.morphs.is_empty() && self.researches.is_empty()
    }
}

/// The tech tree of one race, entries sorted by unit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechTree {
    /// Race.
    pub race: Race,
    /// Entries with at least one edge.
    pub entries: Vec<TechTreeEntry>,
}

impl TechTree {
    /// Find the entry of a unit.
    #[must_use]
    pub fn entry(&self, unit: &str) -> Option<&TechTreeEntry> {
        self.entries.iter().find(|e| e.unit == unit)
    }

    /// Indented plain-text listing for eyeballing.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{}", entry.unit);
            if !entry.builds.is_empty() {
                out.push_str("  builds\n");
                for edge in &entry.builds {
                    let _ = writeln!(out, "    {}", edge.unit);
                }
            }
            if !entry.morphs.is_empty() {
                out.push_str("  morphs\n");
                for edge in &entry.morphs {
                    let _ = writeln!(out, "    {}", edge.unit);
                }
            }
            if !entry.researches.is_empty() {
                out.push_str("  upgrades\n");
                for edge in &entry.researches {
                    let _ = writeln!(out, "    {}", edge.upgrade);
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Pick the unit a production command is named after.
///
/// The first named unit without a transient marker, else the last one listed.
#[must_use]
pub fn representative_unit<'u, M: AsRef<str>>(units: &'u [String], markers: &[M]) -> Option<&'u str> {
    units
        .iter()
        .find(|unit| !unit.is_empty() && !markers.iter().any(|m| unit.contains(m.as_ref())))
        .or_else(|| units.last())
        .map(String::as_str)
}

/// Derives tech trees from a converged catalog.
#[derive(Debug, Clone)]
pub struct TechTreeDeriver<'a> {
    catalog: &'a CatalogStore,
    filter: NameFilter,
    transient_markers: Vec<String>,
}

impl<'a> TechTreeDeriver<'a> {
    /// Create a deriver with the default denylist and markers.
    #[must_use]
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self {
            catalog,
            filter: NameFilter::default(),
            transient_markers: DEFAULT_TRANSIENT_MARKERS.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    /// Replace the unit denylist.
    #[must_use]
    pub fn with_filter(mut self, filter: NameFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the transient markers.
    #[must_use]
    pub fn with_transient_markers(mut self, markers: Vec<String>) -> Self {
        self.transient_markers = markers;
        self
    }

    /// Derive the tech tree of a race.
    #[must_use]
    pub fn derive(&self, race: Race) -> TechTree {
        let entries: Vec<TechTreeEntry> = self
            .catalog
            .units_of(race)
            .filter(|unit| !self.filter.is_excluded(&unit.name))
            .map(|unit| {
                let mut entry = TechTreeEntry {
                    unit: unit.name.clone(),
                    ..TechTreeEntry::default()
                };
                for reference in live_command_refs(unit) {
                    let Some(command_ref) = split_command_ref(reference) else {
                        continue;
                    };
                    self.add_edge(&mut entry, command_ref);
                }
                entry
            })
            .filter(|entry| !entry.is_empty())
            .collect();

        tracing::info!("Derived {race} tech tree with {} entries", entries.len());
        TechTree { race, entries }
    }

    fn add_edge(&self, entry: &mut TechTreeEntry, reference: CommandRef<'_>) {
        let Some(ability) = self.catalog.ability(reference.ability) else {
            return;
        };
        let Some(command) = ability.command(reference.command) else {
            return;
        };

        match ability.kind {
            AbilityKind::Train | AbilityKind::Build | AbilityKind::Morph => {
                if command.is_upgrade {
                    return;
                }
                let Some(unit) =
                    representative_unit(&command.units, self.transient_markers.as_slice())
                else {
                    return;
                };
                let edge = BuildEdge {
                    unit: unit.to_string(),
                    ability: ability.name.clone(),
                    command: command.slot.clone(),
                    time: command.time,
                    requirements: command.requirements.clone(),
                };
                if ability.kind == AbilityKind::Morph {
                    entry.morphs.push(edge);
                } else {
                    entry.builds.push(edge);
                }
            }
            AbilityKind::Research if command.is_upgrade => {
                entry.researches.push(research_edge(&ability.name, command));
            }
            AbilityKind::Research | AbilityKind::Merge | AbilityKind::Other => {}
        }
    }
}

fn research_edge(ability: &str, command: &AbilityCommand) -> ResearchEdge {
    ResearchEdge {
        upgrade: command.upgrade.clone(),
        ability: ability.to_string(),
        command: command.slot.clone(),
        time: command.time,
        minerals: command.mineral_cost,
        vespene: command.vespene_cost,
        requirements: command.requirements.clone(),
    }
}

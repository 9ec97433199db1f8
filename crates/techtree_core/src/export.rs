//! Export records.
//!
//! Serializable views of the converged catalog, keyed by stable IDs.
//! Everything is collected into `BTreeMap`s so serialized output is
//! byte-for-byte reproducible.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ability_index::AbilityCommandIndexer;
use crate::catalog::CatalogStore;
use crate::command_card::live_command_refs;
use crate::data::{Ability, AbilityKind, Unit};
use crate::error::Result;
use crate::factions::Race;
use crate::filter::NameFilter;
use crate::footprint::{FootprintResolver, FootprintShape};
use crate::math::{decimal_serde, Fixed};
use crate::requirements::{RequirementExpr, RequirementResolver};
use crate::stable_id::StableIdTable;
use crate::tech_tree::{BuildEdge, ResearchEdge, TechTree};

/// Upgrade names shorter than this are placeholders and not exported.
const MIN_UPGRADE_NAME_LEN: usize = 2;

/// A unit's footprint as exported: the resolved shape, or `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FootprintField {
    /// Resolved shape.
    Resolved(FootprintShape),
    /// No footprint, serialized as an empty object.
    Empty {},
}

impl From<Option<FootprintShape>> for FootprintField {
    fn from(shape: Option<FootprintShape>) -> Self {
        shape.map_or(Self::Empty {}, Self::Resolved)
    }
}

/// One exported unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    /// Catalog name.
    pub name: String,
    /// Owning race.
    pub race: Race,
    /// Supply provided or used.
    #[serde(with = "decimal_serde")]
    pub food: Fixed,
    /// Mineral cost.
    pub mineral_cost: i64,
    /// Vespene cost.
    pub vespene_cost: i64,
    /// Movement speed.
    #[serde(with = "decimal_serde")]
    pub speed: Fixed,
    /// Acceleration.
    #[serde(with = "decimal_serde")]
    pub acceleration: Fixed,
    /// Speed multiplier on creep.
    #[serde(with = "decimal_serde")]
    pub speed_multiplier_creep: Fixed,
    /// Collision radius.
    #[serde(with = "decimal_serde")]
    pub radius: Fixed,
    /// Sight radius.
    pub sight: i64,
    /// Starting life.
    pub life_start: i64,
    /// Maximum life.
    pub life_max: i64,
    /// Life regeneration per second.
    #[serde(with = "decimal_serde")]
    pub life_regen_rate: Fixed,
    /// Base life armor.
    pub life_armor: i64,
    /// Starting shields.
    pub shields_start: i64,
    /// Maximum shields.
    pub shields_max: i64,
    /// Light armor class.
    pub light: bool,
    /// Biological.
    pub biological: bool,
    /// Mechanical.
    pub mechanical: bool,
    /// Armored.
    pub armored: bool,
    /// Structure.
    pub structure: bool,
    /// Psionic.
    pub psionic: bool,
    /// Massive.
    pub massive: bool,
    /// Transport cargo size.
    pub cargo_size: i64,
    /// Turning rate.
    #[serde(with = "decimal_serde")]
    pub turning_rate: Fixed,
    /// Delay before shields regenerate.
    pub shield_regen_delay: i64,
    /// Shield regeneration per second.
    pub shield_regen_rate: i64,
    /// Mover reference.
    pub mover: String,
    /// Score for making the unit.
    pub score_make: i64,
    /// Score for killing the unit.
    pub score_kill: i64,
    /// Placement footprint.
    pub footprint: FootprintField,
    /// `[type, "harvestable" | "raw"]`, empty for non-resources.
    pub resource: Vec<&'static str>,
    /// Cannot be damaged.
    pub invulnerable: bool,
    /// Weapon references, sorted.
    pub weapons: Vec<String>,
    /// Live `"Ability,Command"` references.
    pub ability_commands: Vec<String>,
}

/// One exported ability command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRecord {
    /// Stable ability command ID.
    pub index: u64,
    /// Duration.
    #[serde(with = "decimal_serde")]
    pub time: Fixed,
    /// Resolved requirement trees, when a requirement is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<RequirementExpr>>,
    /// Produced units.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
}

/// One exported ability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityRecord {
    /// Catalog name.
    pub name: String,
    /// Ability kind (`train`, `morph`, ...).
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Unit the caster morphs into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph_unit: Option<String>,
    /// Commands by slot key.
    pub commands: BTreeMap<String, CommandRecord>,
}

/// A build or morph edge in the tech tree export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    /// Stable unit ID.
    pub unit: u64,
    /// Produced unit.
    pub unit_name: String,
    /// `"Ability,Command"`.
    pub ability_name: String,
    /// Stable ability command ID.
    pub ability: u64,
    /// Duration.
    #[serde(with = "decimal_serde")]
    pub time: Fixed,
    /// Resolved requirement trees, when a requirement is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<RequirementExpr>>,
}

/// A research edge in the tech tree export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRecord {
    /// Stable upgrade ID.
    pub upgrade: u64,
    /// Researched upgrade.
    pub upgrade_name: String,
    /// `"Ability,Command"`.
    pub ability_name: String,
    /// Stable ability command ID.
    pub ability: u64,
    /// Duration.
    #[serde(with = "decimal_serde")]
    pub time: Fixed,
    /// Mineral cost.
    pub minerals: i64,
    /// Vespene cost.
    pub vespene: i64,
    /// Resolved requirement trees, when a requirement is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<RequirementExpr>>,
}

/// One unit's tech tree entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechTreeRecord {
    /// Catalog name.
    pub name: String,
    /// Train and build edges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub builds: Vec<BuildRecord>,
    /// Morph edges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub morphs: Vec<BuildRecord>,
    /// Research edges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub researches: Vec<ResearchRecord>,
}

/// Race name → stable unit ID → entry.
pub type TechTreeExport = BTreeMap<String, BTreeMap<String, TechTreeRecord>>;

/// Builds export records from a converged catalog.
#[derive(Debug, Clone)]
pub struct Exporter<'a> {
    catalog: &'a CatalogStore,
    ids: &'a StableIdTable,
    filter: NameFilter,
}

impl<'a> Exporter<'a> {
    /// Create an exporter with the default unit denylist.
    #[must_use]
    pub fn new(catalog: &'a CatalogStore, ids: &'a StableIdTable) -> Self {
        Self {
            catalog,
            ids,
            filter: NameFilter::default(),
        }
    }

    /// Replace the unit denylist.
    #[must_use]
    pub fn with_filter(mut self, filter: NameFilter) -> Self {
        self.filter = filter;
        self
    }

    fn requirements(&self, reference: &str) -> Option<Vec<RequirementExpr>> {
        if reference.is_empty() {
            return None;
        }
        Some(RequirementResolver::new(self.catalog, self.ids).resolve_requirement(reference))
    }

    /// Whether a unit appears in the unit export.
    #[must_use]
    pub fn exports_unit(&self, unit: &Unit) -> bool {
        !(unit.life_start == 0 && unit.life_max == 0)
            && unit.race != Race::Neutral
            && !self.filter.is_excluded(&unit.name)
    }

    /// Unit records keyed by stable unit ID.
    ///
    /// # Errors
    ///
    /// Propagates footprint cycles.
    pub fn units(&self) -> Result<BTreeMap<String, UnitRecord>> {
        let footprints = FootprintResolver::new(self.catalog);
        let mut out = BTreeMap::new();
        for unit in self.catalog.units().filter(|u| self.exports_unit(u)) {
            let record = self.unit_record(unit, footprints.resolve(&unit.footprint)?);
            let key = self.ids.unit_id(&unit.name).to_string();
            if let Some(previous) = out.insert(key.clone(), record) {
                tracing::warn!(
                    "Unit '{}' replaces '{}' under export key {key}",
                    unit.name,
                    previous.name
                );
            }
        }
        tracing::info!("Exported {} units", out.len());
        Ok(out)
    }

    fn unit_record(&self, unit: &Unit, footprint: Option<FootprintShape>) -> UnitRecord {
        let attrs = unit.attributes;
        UnitRecord {
            name: unit.name.clone(),
            race: unit.race,
            food: unit.food,
            mineral_cost: unit.mineral_cost,
            vespene_cost: unit.vespene_cost,
            speed: unit.speed,
            acceleration: unit.acceleration,
            speed_multiplier_creep: unit.speed_multiplier_creep,
            radius: unit.radius,
            sight: unit.sight,
            life_start: unit.life_start,
            life_max: unit.life_max,
            life_regen_rate: unit.life_regen_rate,
            life_armor: unit.life_armor,
            shields_start: unit.shields_start,
            shields_max: unit.shields_max,
            light: attrs.light,
            biological: attrs.biological,
            mechanical: attrs.mechanical,
            armored: attrs.armored,
            structure: attrs.structure,
            psionic: attrs.psionic,
            massive: attrs.massive,
            cargo_size: unit.cargo_size,
            turning_rate: unit.turning_rate,
            shield_regen_delay: unit.shield_regen_delay,
            shield_regen_rate: unit.shield_regen_rate,
            mover: unit.mover.clone(),
            score_make: unit.score_make,
            score_kill: unit.score_kill,
            footprint: footprint.into(),
            resource: unit.resource.map_or_else(Vec::new, |kind| {
                let state = if unit.resource_harvestable { "harvestable" } else { "raw" };
                vec![kind.as_str(), state]
            }),
            invulnerable: unit.invulnerable,
            weapons: unit.weapons.iter().cloned().collect(),
            ability_commands: live_command_refs(unit).into_iter().map(String::from).collect(),
        }
    }

    /// Ability records keyed by ability name.
    #[must_use]
    pub fn abilities(&self) -> BTreeMap<String, AbilityRecord> {
        let out: BTreeMap<String, AbilityRecord> = self
            .catalog
            .abilities()
            .filter(|ability| ability.kind != AbilityKind::Other)
            .map(|ability| (ability.name.clone(), self.ability_record(ability)))
            .collect();
        tracing::info!("Exported {} abilities", out.len());
        out
    }

    fn ability_record(&self, ability: &Ability) -> AbilityRecord {
        let indexer = AbilityCommandIndexer::new(self.ids);
        let commands = ability
            .exported_commands()
            .map(|command| {
                let record = CommandRecord {
                    index: indexer.index(&ability.name, &command.slot),
                    time: command.time,
                    requires: self.requirements(&command.requirements),
                    units: command.units.iter().filter(|u| !u.is_empty()).cloned().collect(),
                };
                (command.slot.clone(), record)
            })
            .collect();

        AbilityRecord {
            name: ability.name.clone(),
            kind: ability.kind.as_str(),
            morph_unit: (!ability.morph_unit.is_empty()).then(|| ability.morph_unit.clone()),
            commands,
        }
    }

    /// Tech tree records keyed by race, then stable unit ID.
    #[must_use]
    pub fn tech_trees(&self, trees: &[TechTree]) -> TechTreeExport {
        trees
            .iter()
            .map(|tree| {
                let entries = tree
                    .entries
                    .iter()
                    .map(|entry| {
                        let record = TechTreeRecord {
                            name: entry.unit.clone(),
                            builds: entry.builds.iter().map(|e| self.build_record(e)).collect(),
                            morphs: entry.morphs.iter().map(|e| self.build_record(e)).collect(),
                            researches: entry
                                .researches
                                .iter()
                                .filter(|e| e.upgrade.len() >= MIN_UPGRADE_NAME_LEN)
                                .map(|e| self.research_record(e))
                                .collect(),
                        };
                        (self.ids.unit_id(&entry.unit).to_string(), record)
                    })
                    .collect();
                (tree.race.as_str().to_string(), entries)
            })
            .collect()
    }

    fn build_record(&self, edge: &BuildEdge) -> BuildRecord {
        BuildRecord {
            unit: self.ids.unit_id(&edge.unit),
            unit_name: edge.unit.clone(),
            ability_name: format!("{},{}", edge.ability, edge.command),
            ability: AbilityCommandIndexer::new(self.ids).index(&edge.ability, &edge.command),
            time: edge.time,
            requires: self.requirements(&edge.requirements),
        }
    }

    fn research_record(&self, edge: &ResearchEdge) -> ResearchRecord {
        ResearchRecord {
            upgrade: self.ids.upgrade_id(&edge.upgrade),
            upgrade_name: edge.upgrade.clone(),
            ability_name: format!("{},{}", edge.ability, edge.command),
            ability: AbilityCommandIndexer::new(self.ids).index(&edge.ability, &edge.command),
            time: edge.time,
            minerals: edge.minerals,
            vespene: edge.vespene,
            requires: self.requirements(&edge.requirements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CatalogRecord;

    #[test]
    fn test_missing_footprint_is_empty_object() {
        let json = serde_json::to_value(FootprintField::from(None)).expect("serializable");
        assert_eq!(json, serde_json::json!({}));

        let shape = FootprintShape {
            offset: [0, 0],
            dimensions: [1, 1],
            data: "x".to_string(),
        };
        let json = serde_json::to_value(FootprintField::from(Some(shape))).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({ "offset": [0, 0], "dimensions": [1, 1], "data": "x" })
        );
    }

    #[test]
    fn test_unit_export_filter() {
        let store = CatalogStore::new();
        let ids = StableIdTable::new();
        let exporter = Exporter::new(&store, &ids);

        let mut unit = Unit::named("Zergling");
        unit.race = Race::Zerg;
        assert!(!exporter.exports_unit(&unit), "no life");

        unit.life_max = 35;
        assert!(exporter.exports_unit(&unit));

        unit.race = Race::Neutral;
        assert!(!exporter.exports_unit(&unit), "neutral");

        let mut bridge = Unit::named("ShakurasLightBridgeNE");
        bridge.race = Race::Protoss;
        bridge.life_start = 500;
        assert!(!exporter.exports_unit(&bridge), "denylisted");
    }
}

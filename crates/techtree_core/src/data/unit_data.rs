//! Unit records and their command cards.

use std::collections::{BTreeMap, BTreeSet};

use crate::alias::AliasIndex;
use crate::document::Element;
use crate::factions::Race;
use crate::math::{parse_index, Fixed};

use super::CatalogRecord;

/// Resource a unit provides when harvested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Mineral fields.
    Minerals,
    /// Vespene geysers.
    Vespene,
    /// Terrazine.
    Terrazine,
    /// Map-defined resource.
    Custom,
}

impl ResourceKind {
    /// Parse a catalog resource tag, case-insensitively.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        [
            ("Minerals", Self::Minerals),
            ("Vespene", Self::Vespene),
            ("Terrazine", Self::Terrazine),
            ("Custom", Self::Custom),
        ]
        .into_iter()
        .find(|(name, _)| tag.eq_ignore_ascii_case(name))
        .map(|(_, kind)| kind)
    }

    /// Lowercase export name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minerals => "minerals",
            Self::Vespene => "vespene",
            Self::Terrazine => "terrazine",
            Self::Custom => "custom",
        }
    }
}

/// Unit classification flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitAttributes {
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
}

impl UnitAttributes {
    fn set(&mut self, name: &str, value: bool) {
        let slot = match name.to_ascii_lowercase().as_str() {
            "light" => &mut self.light,
            "biological" => &mut self.biological,
            "mechanical" => &mut self.mechanical,
            "armored" => &mut self.armored,
            "structure" => &mut self.structure,
            "psionic" => &mut self.psionic,
            "massive" => &mut self.massive,
            _ => return,
        };
        *slot = value;
    }
}

/// A slot-indexed table of UI buttons on a unit.
///
/// Button slots map to `"Ability,Command"` references. State is cumulative
/// across layers: a re-declared card keeps its buttons, and buttons without
/// an explicit index continue after the last slot written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandCard {
    /// Card identifier (`CardId`).
    pub name: String,
    /// Removed cards take no part in resolution.
    pub removed: bool,
    /// Button slot → command reference.
    pub buttons: BTreeMap<usize, String>,
    /// Slot the next unindexed button lands in.
    pub next_slot: usize,
}

impl CommandCard {
    /// Apply a `CardLayouts` declaration.
    fn apply(&mut self, layout: &Element) {
        if let Some(card_id) = layout.attr("CardId") {
            self.name = card_id.to_string();
        }
        self.removed = layout.flag_attr("removed");

        let mut slot = self.next_slot;
        for button in layout.children_named("LayoutButtons") {
            if let Some(index) = button.attr("index") {
                slot = parse_index(index);
            }
            if button.flag_attr("removed") || button.attr_is("Type", "Undefined") {
                self.buttons.remove(&slot);
            } else if button.attr_is("Type", "AbilCmd") {
                if let Some(command) = button.attr("AbilCmd") {
                    self.buttons.insert(slot, command.to_string());
                }
            }
            slot += 1;
        }
        self.next_slot = slot;
    }
}

/// A resolved unit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Catalog identifier.
    pub name: String,
    /// Owning race.
    pub race: Race,
    /// Starting life.
    pub life_start: i64,
    /// Maximum life.
    pub life_max: i64,
    /// Life regeneration per second.
    pub life_regen_rate: Fixed,
    /// Base life armor.
    pub life_armor: i64,
    /// Starting shields.
    pub shields_start: i64,
    /// Maximum shields.
    pub shields_max: i64,
    /// Delay before shields regenerate.
    pub shield_regen_delay: i64,
    /// Shield regeneration per second.
    pub shield_regen_rate: i64,
    /// Movement speed.
    pub speed: Fixed,
    /// Acceleration.
    pub acceleration: Fixed,
    /// Turning rate.
    pub turning_rate: Fixed,
    /// Speed multiplier on creep.
    pub speed_multiplier_creep: Fixed,
    /// Supply provided (positive) or used (negative).
    pub food: Fixed,
    /// Sight radius.
    pub sight: i64,
    /// Transport cargo size.
    pub cargo_size: i64,
    /// Collision radius.
    pub radius: Fixed,
    /// Mineral cost.
    pub mineral_cost: i64,
    /// Vespene cost.
    pub vespene_cost: i64,
    /// Score awarded for making the unit.
    pub score_make: i64,
    /// Score awarded for killing the unit.
    pub score_kill: i64,
    /// Classification flags.
    pub attributes: UnitAttributes,
    /// Resource provided when harvested.
    pub resource: Option<ResourceKind>,
    /// Whether the resource is harvestable (vs. raw, e.g. a bare geyser).
    pub resource_harvestable: bool,
    /// Cannot be damaged.
    pub invulnerable: bool,
    /// Tagged as a campaign object.
    pub campaign: bool,
    /// Mover reference.
    pub mover: String,
    /// Footprint reference.
    pub footprint: String,
    /// Weapon references.
    pub weapons: BTreeSet<String>,
    /// Command cards by slot index.
    pub cards: BTreeMap<usize, CommandCard>,
}

impl CatalogRecord for Unit {
    const KIND: &'static str = "unit";

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            race: Race::Neutral,
            life_start: 0,
            life_max: 0,
            life_regen_rate: Fixed::ZERO,
            life_armor: 0,
            shields_start: 0,
            shields_max: 0,
            shield_regen_delay: 0,
            shield_regen_rate: 0,
            speed: Fixed::ZERO,
            acceleration: Fixed::ZERO,
            turning_rate: Fixed::ZERO,
            speed_multiplier_creep: Fixed::from_num(1),
            food: Fixed::ZERO,
            sight: 0,
            cargo_size: 0,
            radius: Fixed::ZERO,
            mineral_cost: 0,
            vespene_cost: 0,
            score_make: 0,
            score_kill: 0,
            attributes: UnitAttributes::default(),
            resource: None,
            resource_harvestable: false,
            invulnerable: false,
            campaign: false,
            mover: String::new(),
            footprint: String::new(),
            weapons: BTreeSet::new(),
            cards: BTreeMap::new(),
        }
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

impl Unit {
    /// Apply one `CUnit` declaration on top of the current record.
    ///
    /// `TechAliasArray` fields register this unit in `aliases`.
    pub fn apply(&mut self, decl: &Element, aliases: &mut AliasIndex) {
        let mut card_counter = 0;
        for field in &decl.children {
            self.apply_field(field, &mut card_counter, aliases);
        }
    }

    fn apply_field(&mut self, field: &Element, card_counter: &mut usize, aliases: &mut AliasIndex) {
        let value = field.attr("value");
        match field.name.to_ascii_lowercase().as_str() {
            "race" => self.race = Race::from_tag(value.unwrap_or_default()),
            "lifestart" => self.life_start = field.int_attr("value"),
            "lifemax" => self.life_max = field.int_attr("value"),
            "liferegenrate" => self.life_regen_rate = field.fixed_attr("value"),
            "lifearmor" => self.life_armor = field.int_attr("value"),
            "shieldsstart" => self.shields_start = field.int_attr("value"),
            "shieldsmax" => self.shields_max = field.int_attr("value"),
            "shieldregendelay" if value.is_some() => {
                self.shield_regen_delay = field.int_attr("value");
            }
            "shieldregenrate" if value.is_some() => {
                self.shield_regen_rate = field.int_attr("value");
            }
            "speed" => self.speed = field.fixed_attr("value"),
            "acceleration" => self.acceleration = field.fixed_attr("value"),
            "turningrate" => self.turning_rate = field.fixed_attr("value"),
            "speedmultipliercreep" => self.speed_multiplier_creep = field.fixed_attr("value"),
            "food" => self.food = field.fixed_attr("value"),
            "sight" => self.sight = field.int_attr("value"),
            "cargosize" => self.cargo_size = field.int_attr("value"),
            "radius" => self.radius = field.fixed_attr("value"),
            "scoremake" => self.score_make = field.int_attr("value"),
            "scorekill" => self.score_kill = field.int_attr("value"),
            "attributes" => {
                if let Some(index) = field.attr("index") {
                    self.attributes.set(index, field.flag_attr("value"));
                }
            }
            "costresource" => {
                if field.attr_is("index", "Minerals") {
                    self.mineral_cost = field.int_attr("value");
                } else if field.attr_is("index", "Vespene") {
                    self.vespene_cost = field.int_attr("value");
                }
            }
            "resourcetype" => self.resource = value.and_then(ResourceKind::from_tag),
            "resourcestate" => {
                if let Some(state) = value {
                    self.resource_harvestable = state.eq_ignore_ascii_case("Harvestable");
                }
            }
            "flagarray" if value.is_some() => {
                if field.attr_is("index", "Invulnerable") {
                    self.invulnerable = field.flag_attr("value");
                }
            }
            "editorcategories" => {
                if value.is_some_and(|v| v.contains("ObjectFamily:Campaign")) {
                    self.campaign = true;
                }
            }
            "mover" => {
                if let Some(mover) = value {
                    self.mover = mover.to_string();
                }
            }
            "footprint" => {
                if let Some(footprint) = value {
                    self.footprint = footprint.to_string();
                }
            }
            "weaponarray" => {
                if let Some(link) = field.attr("Link") {
                    self.weapons.insert(link.to_string());
                }
            }
            "techaliasarray" => {
                if let Some(alias) = value {
                    aliases.register(alias, self.name.as_str());
                }
            }
            "cardlayouts" => {
                let index = field.attr("index").map_or(*card_counter, parse_index);
                self.cards.entry(index).or_default().apply(field);
                *card_counter += 1;
            }
            _ => {}
        }
    }
}

//! Ability records and their commands.

use std::collections::BTreeMap;

use crate::document::Element;
use crate::math::Fixed;

use super::CatalogRecord;

/// Synthetic command slot used by every morph.
pub const EXECUTE_SLOT: &str = "Execute";

/// Kind of ability, from the declaring element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    /// Produces units from a queue.
    Train,
    /// Turns the caster into another unit.
    Morph,
    /// Constructs structures.
    Build,
    /// Combines casters into one unit.
    Merge,
    /// Researches upgrades.
    Research,
    /// Anything else.
    #[default]
    Other,
}

impl AbilityKind {
    /// Map a declaring element name to a kind, plus whether it is a warp-in.
    ///
    /// Unknown element names return `None` and leave the record's kind alone.
    #[must_use]
    pub fn from_element(name: &str) -> Option<(Self, bool)> {
        [
            ("CAbilTrain", Self::Train, false),
            ("CAbilWarpTrain", Self::Train, true),
            ("CAbilMorph", Self::Morph, false),
            ("CAbilBuild", Self::Build, false),
            ("CAbilMerge", Self::Merge, false),
            ("CAbilResearch", Self::Research, false),
        ]
        .into_iter()
        .find(|(element, _, _)| name.eq_ignore_ascii_case(element))
        .map(|(_, kind, warp)| (kind, warp))
    }

    /// Lowercase export name; empty for kinds without one.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Morph => "morph",
            Self::Build => "build",
            Self::Research => "research",
            Self::Merge | Self::Other => "",
        }
    }

    /// Whether commands of this kind produce units.
    #[must_use]
    pub const fn produces_units(&self) -> bool {
        matches!(self, Self::Train | Self::Build | Self::Morph)
    }
}

/// One command slot of an ability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilityCommand {
    /// Slot key, e.g. `Train1`, `Build3`, `Research2`, `Execute`.
    pub slot: String,
    /// Duration in game seconds.
    pub time: Fixed,
    /// Produced unit references, in declaration order.
    pub units: Vec<String>,
    /// Requirement reference (a requirement id or a node id).
    pub requirements: String,
    /// Set on research commands.
    pub is_upgrade: bool,
    /// Researched upgrade name.
    pub upgrade: String,
    /// Research mineral cost.
    pub mineral_cost: i64,
    /// Research vespene cost.
    pub vespene_cost: i64,
}

impl AbilityCommand {
    /// Create an empty command for a slot.
    #[must_use]
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            ..Self::default()
        }
    }

    fn apply_button(&mut self, child: &Element) {
        if child.is("Button") {
            if let Some(requirements) = child.attr("Requirements") {
                self.requirements = requirements.to_string();
            }
        }
    }
}

/// A resolved ability record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
    /// Catalog identifier.
    pub name: String,
    /// Ability kind.
    pub kind: AbilityKind,
    /// Warp-in variant of a train ability.
    pub warp: bool,
    /// Unit the caster morphs into, when declared directly.
    pub morph_unit: String,
    /// Commands by slot key.
    pub commands: BTreeMap<String, AbilityCommand>,
}

impl CatalogRecord for Ability {
    const KIND: &'static str = "ability";

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

impl Ability {
    /// Apply one ability declaration on top of the current record.
    pub fn apply(&mut self, decl: &Element) {
        if let Some((kind, warp)) = AbilityKind::from_element(&decl.name) {
            self.kind = kind;
            self.warp |= warp;
        }

        for field in &decl.children {
            if field.is("MorphUnit") {
                if let Some(unit) = field.attr("value") {
                    self.morph_unit = unit.to_string();
                }
            } else if field.is("InfoArray") {
                self.apply_info(field);
            } else if field.is("CmdButtonArray")
                && self.kind == AbilityKind::Morph
                && field.attr_is("index", EXECUTE_SLOT)
            {
                if let Some(requirements) = field.attr("Requirements") {
                    self.command_mut(EXECUTE_SLOT).requirements = requirements.to_string();
                }
            }
        }
    }

    fn command_mut(&mut self, slot: &str) -> &mut AbilityCommand {
        self.commands
            .entry(slot.to_string())
            .or_insert_with(|| AbilityCommand::new(slot))
    }

    fn apply_info(&mut self, info: &Element) {
        let slot = info.attr("index");
        match self.kind {
            AbilityKind::Train | AbilityKind::Build => {
                if let Some(slot) = slot {
                    Self::apply_production(self.command_mut(slot), info);
                }
            }
            AbilityKind::Morph => {
                if let Some(unit) = info.attr("Unit") {
                    let command = self.command_mut(EXECUTE_SLOT);
                    command.units.push(unit.to_string());
                    Self::apply_morph_delay(command, info);
                }
            }
            AbilityKind::Research => {
                if let Some(upgrade) = info.attr("Upgrade") {
                    let slot = slot.unwrap_or_default();
                    if upgrade.is_empty() {
                        self.commands.remove(slot);
                    } else {
                        Self::apply_research(self.command_mut(slot), info, upgrade);
                    }
                }
            }
            AbilityKind::Merge | AbilityKind::Other => {}
        }
    }

    fn apply_production(command: &mut AbilityCommand, info: &Element) {
        if info.attr("Time").is_some() {
            command.time = info.fixed_attr("Time");
        }
        if let Some(unit) = info.attr("Unit") {
            command.units.push(unit.to_string());
        }
        if info.child("Unit").is_some() {
            command.units.clear();
        }
        for child in &info.children {
            if child.is("Unit") {
                if let Some(unit) = child.attr("value") {
                    command.units.push(unit.to_string());
                }
            } else {
                command.apply_button(child);
            }
        }
    }

    fn apply_morph_delay(command: &mut AbilityCommand, info: &Element) {
        for section in info.children_named("SectionArray") {
            if !section.attr_is("index", "Actor") {
                continue;
            }
            if let Some(duration) = section.child("DurationArray") {
                if duration.attr_is("index", "Delay") && duration.attr("value").is_some() {
                    command.time = duration.fixed_attr("value");
                }
            }
        }
    }

    fn apply_research(command: &mut AbilityCommand, info: &Element, upgrade: &str) {
        if info.attr("Time").is_some() {
            command.time = info.fixed_attr("Time");
        }
        command.is_upgrade = true;
        command.upgrade = upgrade.to_string();
        for child in &info.children {
            if child.is("Resource") && child.attr("value").is_some() {
                if child.attr_is("index", "Minerals") {
                    command.mineral_cost = child.int_attr("value");
                } else if child.attr_is("index", "Vespene") {
                    command.vespene_cost = child.int_attr("value");
                }
            } else {
                command.apply_button(child);
            }
        }
    }

    /// Look up a command by slot key.
    #[must_use]
    pub fn command(&self, slot: &str) -> Option<&AbilityCommand> {
        self.commands.get(slot)
    }

    /// Commands that appear in exports: none for `Other` abilities, and
    /// train commands only when they produce something.
    pub fn exported_commands(&self) -> impl Iterator<Item = &AbilityCommand> {
        let kind = self.kind;
        self.commands.values().filter(move |command| match kind {
            AbilityKind::Other => false,
            AbilityKind::Train => !command.units.is_empty(),
            _ => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(index: &str) -> Element {
        Element::new("InfoArray").with_attr("index", index)
    }

    #[test]
    fn test_train_command() {
        let decl = Element::new("CAbilTrain").with_attr("id", "LarvaTrain").with_child(
            info("Train1")
                .with_attr("Time", "17")
                .with_attr("Unit", "Drone")
                .with_child(Element::new("Button").with_attr("Requirements", "HaveHatchery")),
        );
        let mut ability = Ability::named("LarvaTrain");
        ability.apply(&decl);

        assert_eq!(ability.kind, AbilityKind::Train);
        let command = ability.command("Train1").expect("train command");
        assert_eq!(command.units, vec!["Drone".to_string()]);
        assert_eq!(command.time, Fixed::from_num(17));
        assert_eq!(command.requirements, "HaveHatchery");
    }

    #[test]
    fn test_unit_children_replace_attribute_units() {
        let decl = Element::new("CAbilTrain").with_child(
            info("Train1")
                .with_attr("Unit", "Egg")
                .with_child(Element::new("Unit").with_attr("value", "Zergling"))
                .with_child(Element::new("Unit").with_attr("value", "Zergling")),
        );
        let mut ability = Ability::named("LarvaTrain");
        ability.apply(&decl);
        let command = ability.command("Train1").expect("train command");
        assert_eq!(command.units, vec!["Zergling".to_string(), "Zergling".to_string()]);
    }

    #[test]
    fn test_warp_train() {
        let decl = Element::new("CAbilWarpTrain");
        let mut ability = Ability::named("WarpGateTrain");
        ability.apply(&decl);
        assert_eq!(ability.kind, AbilityKind::Train);
        assert!(ability.warp);

        ability.apply(&Element::new("CAbilTrain"));
        assert_eq!(ability.kind, AbilityKind::Train);
        assert!(ability.warp, "plain redeclaration keeps the warp flag");
    }

    #[test]
    fn test_unknown_element_keeps_kind() {
        let mut ability = Ability::named("UpgradeToLair");
        ability.apply(&Element::new("CAbilMorph"));
        ability.apply(&Element::new("CAbilEffectTarget"));
        assert_eq!(ability.kind, AbilityKind::Morph);
    }

    #[test]
    fn test_morph_uses_execute_slot() {
        let decl = Element::new("CAbilMorph")
            .with_child(
                info("0").with_attr("Unit", "Lair").with_child(
                    Element::new("SectionArray")
                        .with_attr("index", "Actor")
                        .with_child(
                            Element::new("DurationArray")
                                .with_attr("index", "Delay")
                                .with_attr("value", "57.1428"),
                        ),
                ),
            )
            .with_child(
                Element::new("CmdButtonArray")
                    .with_attr("index", "Execute")
                    .with_attr("Requirements", "UpgradeToLair"),
            );
        let mut ability = Ability::named("UpgradeToLair");
        ability.apply(&decl);

        let command = ability.command(EXECUTE_SLOT).expect("execute command");
        assert_eq!(command.units, vec!["Lair".to_string()]);
        assert_eq!(command.time, crate::math::parse_fixed("57.1428"));
        assert_eq!(command.requirements, "UpgradeToLair");
        assert_eq!(ability.commands.len(), 1);
    }

    #[test]
    fn test_research_command_and_deletion() {
        let decl = Element::new("CAbilResearch").with_child(
            info("Research1")
                .with_attr("Time", "79")
                .with_attr("Upgrade", "overlordspeed")
                .with_child(
                    Element::new("Resource")
                        .with_attr("index", "Minerals")
                        .with_attr("value", "100"),
                )
                .with_child(
                    Element::new("Resource")
                        .with_attr("index", "Vespene")
                        .with_attr("value", "100"),
                ),
        );
        let mut ability = Ability::named("LairResearch");
        ability.apply(&decl);

        let command = ability.command("Research1").expect("research command");
        assert!(command.is_upgrade);
        assert_eq!(command.upgrade, "overlordspeed");
        assert_eq!(command.mineral_cost, 100);
        assert_eq!(command.vespene_cost, 100);

        let removal = Element::new("CAbilResearch")
            .with_child(info("Research1").with_attr("Upgrade", ""));
        ability.apply(&removal);
        assert!(ability.command("Research1").is_none());
    }

    #[test]
    fn test_exported_commands_skip_empty_trains() {
        let decl = Element::new("CAbilTrain")
            .with_child(info("Train1").with_attr("Unit", "Drone"))
            .with_child(info("Train2").with_attr("Time", "10"));
        let mut ability = Ability::named("LarvaTrain");
        ability.apply(&decl);
        let slots: Vec<_> = ability.exported_commands().map(|c| c.slot.as_str()).collect();
        assert_eq!(slots, vec!["Train1"]);

        let mut other = Ability::named("Attack");
        other.commands.insert("Execute".to_string(), AbilityCommand::new("Execute"));
        assert_eq!(other.exported_commands().count(), 0);
    }
}

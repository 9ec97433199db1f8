//! Test fixtures and helpers.
//!
//! Element builders for terse catalog declarations, plus a two-layer Zerg
//! catalog (Hatchery upgraded to Lair in a later layer) with matching
//! stable IDs.

use fixed::types::I32F32;
use techtree_core::catalog::Layer;
use techtree_core::document::Element;
use techtree_core::stable_id::{StableIdListing, StableIdTable};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// A `<Name value="..."/>` field.
#[must_use]
pub fn field(name: &str, value: &str) -> Element {
    Element::new(name).with_attr("value", value)
}

/// A `<CUnit id="..."/>` declaration.
#[must_use]
pub fn unit_decl(id: &str) -> Element {
    Element::new("CUnit").with_attr("id", id)
}

/// A `<CUnit id="..." parent="..."/>` declaration.
#[must_use]
pub fn child_unit_decl(id: &str, parent: &str) -> Element {
    unit_decl(id).with_attr("parent", parent)
}

/// An `AbilCmd` layout button at an explicit slot.
#[must_use]
pub fn button(slot: usize, command: &str) -> Element {
    Element::new("LayoutButtons")
        .with_attr("index", slot.to_string())
        .with_attr("Type", "AbilCmd")
        .with_attr("AbilCmd", command)
}

/// A `CardLayouts` field holding the given buttons.
#[must_use]
pub fn card(buttons: impl IntoIterator<Item = Element>) -> Element {
    Element::new("CardLayouts").with_children(buttons)
}

/// A Place layer footprint with `Area` and `Rows`.
#[must_use]
pub fn footprint_decl(id: &str, area: &str, rows: &[&str]) -> Element {
    let layer = Element::new("Layers")
        .with_attr("index", "Place")
        .with_attr("Area", area)
        .with_children(rows.iter().map(|row| field("Rows", row)));
    Element::new("CFootprint").with_attr("id", id).with_child(layer)
}

/// A morph ability producing `unit` after `delay` seconds.
#[must_use]
pub fn morph_decl(id: &str, unit: &str, delay: &str, requirements: Option<&str>) -> Element {
    let info = Element::new("InfoArray").with_attr("Unit", unit).with_child(
        Element::new("SectionArray").with_attr("index", "Actor").with_child(
            Element::new("DurationArray")
                .with_attr("index", "Delay")
                .with_attr("value", delay),
        ),
    );
    let decl = Element::new("CAbilMorph").with_attr("id", id).with_child(info);
    match requirements {
        Some(requirements) => decl.with_child(
            Element::new("CmdButtonArray")
                .with_attr("index", "Execute")
                .with_attr("Requirements", requirements),
        ),
        None => decl,
    }
}

/// Base layer: Hatchery, Queen, Spawning Pool and their abilities.
#[must_use]
pub fn zerg_core_layer() -> Layer {
    Layer::new("core.sc2mod")
        .with_units([
            unit_decl("Hatchery")
                .with_child(field("Race", "Zerg"))
                .with_child(field("LifeStart", "1500"))
                .with_child(field("LifeMax", "1500"))
                .with_child(field("Food", "6"))
                .with_child(
                    Element::new("CostResource")
                        .with_attr("index", "Minerals")
                        .with_attr("value", "300"),
                )
                .with_child(
                    Element::new("Attributes")
                        .with_attr("index", "Structure")
                        .with_attr("value", "1"),
                )
                .with_child(field("Footprint", "FootprintHatchery"))
                .with_child(field("TechAliasArray", "Alias_Hatchery"))
                .with_child(card([
                    button(0, "TrainQueen,Train1"),
                    button(1, "UpgradeToLair,Execute"),
                    button(2, "HatcheryResearch,Research1"),
                ])),
            unit_decl("Queen")
                .with_child(field("Race", "Zerg"))
                .with_child(field("LifeStart", "175"))
                .with_child(field("LifeMax", "175")),
            unit_decl("SpawningPool")
                .with_child(field("Race", "Zerg"))
                .with_child(field("LifeStart", "1000"))
                .with_child(field("LifeMax", "1000")),
        ])
        .with_abilities([
            Element::new("CAbilTrain").with_attr("id", "TrainQueen").with_child(
                Element::new("InfoArray")
                    .with_attr("index", "Train1")
                    .with_attr("Time", "50")
                    .with_attr("Unit", "Queen")
                    .with_child(Element::new("Button").with_attr("Requirements", "HavePool")),
            ),
            morph_decl("UpgradeToLair", "Lair", "57", Some("UseLair")),
            Element::new("CAbilResearch")
                .with_attr("id", "HatcheryResearch")
                .with_child(
                    Element::new("InfoArray")
                        .with_attr("index", "Research1")
                        .with_attr("Time", "100")
                        .with_attr("Upgrade", "Burrow")
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
                ),
        ])
        .with_requirements([Element::new("CRequirement")
            .with_attr("id", "UseLair")
            .with_child(
                Element::new("NodeArray")
                    .with_attr("index", "Use")
                    .with_attr("Link", "HavePool"),
            )])
        .with_requirement_nodes([Element::new("CRequirementCountUnit")
            .with_attr("id", "HavePool")
            .with_child(
                Element::new("Count")
                    .with_attr("Link", "SpawningPool")
                    .with_attr("State", "CompleteOnlyAtUnit"),
            )])
        .with_footprints([footprint_decl("FootprintHatchery", "-1,-1,1,1", &["xx", "xx"])])
}

/// Patch layer: Lair inherits from Hatchery and swaps its upgrade button.
#[must_use]
pub fn zerg_patch_layer() -> Layer {
    Layer::new("liberty.sc2mod")
        .with_units([child_unit_decl("Lair", "Hatchery")
            .with_child(field("LifeStart", "2000"))
            .with_child(field("LifeMax", "2000"))
            .with_child(field("Footprint", "FootprintLair"))
            .with_child(field("TechAliasArray", "Alias_Hatchery"))
            .with_child(card([button(1, "UpgradeToHive,Execute")]))])
        .with_abilities([morph_decl("UpgradeToHive", "Hive", "71", None)])
        .with_requirement_nodes([Element::new("CRequirementCountUnit")
            .with_attr("id", "HaveHatchery")
            .with_child(Element::new("Count").with_attr("Link", "Alias_Hatchery"))])
        .with_footprints([Element::new("CFootprint")
            .with_attr("id", "FootprintLair")
            .with_attr("parent", "FootprintHatchery")])
}

/// Both Zerg layers in application order.
#[must_use]
pub fn zerg_layers() -> Vec<Layer> {
    vec![zerg_core_layer(), zerg_patch_layer()]
}

/// Stable ID listing as JSON text, matching the Zerg layers.
pub const ZERG_STABLE_IDS_JSON: &str = r#"{
  "Units": [
    { "id": 86, "name": "Hatchery" },
    { "id": 89, "name": "SpawningPool" },
    { "id": 100, "name": "Lair" },
    { "id": 101, "name": "Hive" },
    { "id": 126, "name": "Queen" }
  ],
  "Abilities": [
    { "id": 1632, "name": "TrainQueen", "index": 0 },
    { "id": 1216, "name": "UpgradeToLair", "index": 0 },
    { "id": 1218, "name": "UpgradeToHive", "index": "0" },
    { "id": 1225, "name": "HatcheryResearch", "index": 0 }
  ],
  "Upgrades": [
    { "id": 64, "name": "Burrow" }
  ]
}"#;

/// Stable ID listing matching the Zerg layers.
///
/// # Panics
///
/// Never; the embedded JSON is well-formed.
#[must_use]
pub fn zerg_stable_id_listing() -> StableIdListing {
    serde_json::from_str(ZERG_STABLE_IDS_JSON).expect("fixture JSON is valid")
}

/// Stable ID table matching the Zerg layers.
#[must_use]
pub fn zerg_stable_ids() -> StableIdTable {
    StableIdTable::from(zerg_stable_id_listing())
}

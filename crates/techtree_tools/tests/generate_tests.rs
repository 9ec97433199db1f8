//! End-to-end tests: XML layers on disk through to the written exports.

use std::fs;
use std::path::Path;

use techtree_core::factions::Race;
use techtree_test_utils::fixtures::ZERG_STABLE_IDS_JSON;
use techtree_tools::output::{write_outputs, FOOTPRINTS_FILE, TECH_TREE_FILE, UNITS_FILE};
use techtree_tools::pipeline::{build_catalog, Generation};
use techtree_tools::validate::validate_data_directory;
use techtree_tools::{GeneratorConfig, ToolError};

const CORE_UNITS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Catalog>
    <CUnit id="Hatchery">
        <Race value="Zerg"/>
        <LifeStart value="1500"/>
        <LifeMax value="1500"/>
        <Food value="6"/>
        <CostResource index="Minerals" value="300"/>
        <Attributes index="Structure" value="1"/>
        <Footprint value="FootprintHatchery"/>
        <TechAliasArray value="Alias_Hatchery"/>
        <CardLayouts>
            <LayoutButtons index="0" Type="AbilCmd" AbilCmd="TrainQueen,Train1"/>
            <LayoutButtons index="1" Type="AbilCmd" AbilCmd="UpgradeToLair,Execute"/>
            <LayoutButtons index="2" Type="AbilCmd" AbilCmd="HatcheryResearch,Research1"/>
        </CardLayouts>
    </CUnit>
    <CUnit id="Queen">
        <Race value="Zerg"/>
        <LifeStart value="175"/>
        <LifeMax value="175"/>
    </CUnit>
    <CUnit id="SpawningPool">
        <Race value="Zerg"/>
        <LifeStart value="1000"/>
        <LifeMax value="1000"/>
    </CUnit>
</Catalog>"#;

const CORE_ABILITIES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Catalog>
    <CAbilTrain id="TrainQueen">
        <InfoArray index="Train1" Time="50" Unit="Queen">
            <Button Requirements="HavePool"/>
        </InfoArray>
    </CAbilTrain>
    <CAbilMorph id="UpgradeToLair">
        <InfoArray Unit="Lair">
            <SectionArray index="Actor">
                <DurationArray index="Delay" value="57"/>
            </SectionArray>
        </InfoArray>
        <CmdButtonArray index="Execute" Requirements="UseLair"/>
    </CAbilMorph>
    <CAbilResearch id="HatcheryResearch">
        <InfoArray index="Research1" Time="100" Upgrade="Burrow">
            <Resource index="Minerals" value="100"/>
            <Resource index="Vespene" value="100"/>
        </InfoArray>
    </CAbilResearch>
</Catalog>"#;

const CORE_REQUIREMENTS: &str = r#"<Catalog>
    <CRequirement id="UseLair">
        <NodeArray index="Use" Link="HavePool"/>
    </CRequirement>
</Catalog>"#;

const CORE_NODES: &str = r#"<Catalog>
    <CRequirementCountUnit id="HavePool">
        <Count Link="SpawningPool" State="CompleteOnlyAtUnit"/>
    </CRequirementCountUnit>
</Catalog>"#;

const CORE_FOOTPRINTS: &str = r#"<Catalog>
    <CFootprint id="FootprintHatchery">
        <Layers index="Place" Area="-1,-1,1,1">
            <Rows value="xx"/>
            <Rows value="xx"/>
        </Layers>
    </CFootprint>
</Catalog>"#;

const PATCH_UNITS: &str = r#"<Catalog>
    <CUnit id="Lair" parent="Hatchery">
        <LifeStart value="2000"/>
        <LifeMax value="2000"/>
        <Footprint value="FootprintLair"/>
        <TechAliasArray value="Alias_Hatchery"/>
        <CardLayouts>
            <LayoutButtons index="1" Type="AbilCmd" AbilCmd="UpgradeToHive,Execute"/>
        </CardLayouts>
    </CUnit>
</Catalog>"#;

const PATCH_ABILITIES: &str = r#"<Catalog>
    <CAbilMorph id="UpgradeToHive">
        <InfoArray Unit="Hive">
            <SectionArray index="Actor">
                <DurationArray index="Delay" value="71"/>
            </SectionArray>
        </InfoArray>
    </CAbilMorph>
</Catalog>"#;

const PATCH_FOOTPRINTS: &str = r#"<Catalog>
    <CFootprint id="FootprintLair" parent="FootprintHatchery"/>
</Catalog>"#;

const EMPTY_CATALOG: &str = "<Catalog/>";

fn write_layer(root: &Path, config: &GeneratorConfig, layer: &str, docs: [&str; 5]) {
    let dir = config.layer_dir(root, layer);
    fs::create_dir_all(&dir).expect("create layer dir");
    let names = [
        "UnitData.xml",
        "AbilData.xml",
        "RequirementData.xml",
        "RequirementNodeData.xml",
        "FootprintData.xml",
    ];
    for (name, doc) in names.iter().zip(docs) {
        fs::write(dir.join(name), doc).expect("write document");
    }
}

fn create_test_config() -> GeneratorConfig {
    GeneratorConfig {
        layers: vec!["core.sc2mod".to_string(), "liberty.sc2mod".to_string()],
        ..GeneratorConfig::default()
    }
}

fn create_test_root(config: &GeneratorConfig) -> tempfile::TempDir {
    let root = tempfile::tempdir().expect("temp dir");
    write_layer(
        root.path(),
        config,
        "core.sc2mod",
        [CORE_UNITS, CORE_ABILITIES, CORE_REQUIREMENTS, CORE_NODES, CORE_FOOTPRINTS],
    );
    write_layer(
        root.path(),
        config,
        "liberty.sc2mod",
        [PATCH_UNITS, PATCH_ABILITIES, EMPTY_CATALOG, EMPTY_CATALOG, PATCH_FOOTPRINTS],
    );
    fs::write(config.stable_id_path(root.path()), ZERG_STABLE_IDS_JSON).expect("write ids");
    root
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("output exists");
    serde_json::from_str(&text).expect("output is JSON")
}

#[test]
fn test_generation_from_disk() {
    let config = create_test_config();
    let root = create_test_root(&config);

    let generation = Generation::run(root.path(), &config).expect("pipeline succeeds");
    assert_eq!(generation.reports.len(), 2);
    assert_eq!(generation.reports[1].layer, "liberty.sc2mod");

    let lair = generation.store.unit("Lair").expect("Lair resolved");
    assert_eq!(lair.life_max, 2000);
    assert_eq!(lair.race, Race::Zerg, "race inherited from Hatchery");
    assert_eq!(lair.footprint, "FootprintLair");

    let zerg = generation.tree(Race::Zerg).expect("zerg tree");
    let hatchery = zerg.entry("Hatchery").expect("Hatchery entry");
    assert_eq!(hatchery.morphs[0].unit, "Lair");
    assert!(generation.tree(Race::Terran).is_some_and(|t| t.entries.is_empty()));
}

#[test]
fn test_outputs_written() {
    let config = create_test_config();
    let root = create_test_root(&config);
    let out = tempfile::tempdir().expect("temp dir");

    let generation = Generation::run(root.path(), &config).expect("pipeline succeeds");
    let written = write_outputs(&generation, &config, out.path()).expect("outputs written");
    assert_eq!(written.len(), 7);
    for name in [
        "units.json",
        "abilities.json",
        "techtree.json",
        "footprints.txt",
        "techtree-zerg.txt",
        "techtree-protoss.txt",
        "techtree-terran.txt",
    ] {
        assert!(out.path().join(name).is_file(), "{name} missing");
    }

    let units = read_json(&out.path().join(UNITS_FILE));
    assert_eq!(units["100"]["name"], "Lair");
    assert_eq!(units["100"]["footprint"]["dimensions"], serde_json::json!([2, 2]));

    let trees = read_json(&out.path().join(TECH_TREE_FILE));
    assert_eq!(trees["zerg"]["86"]["morphs"][0]["ability"], 1216);
    assert_eq!(trees["zerg"]["100"]["morphs"][0]["unitName"], "Hive");
    assert!(trees["terran"].as_object().is_some_and(serde_json::Map::is_empty));

    let raw = fs::read_to_string(out.path().join(TECH_TREE_FILE)).expect("readable");
    assert!(raw.starts_with("{\n  \""), "two-space indentation");

    let grids = fs::read_to_string(out.path().join(FOOTPRINTS_FILE)).expect("readable");
    assert!(grids.contains("FootprintHatchery (-1,-1,2,2)\nxx\nxx\n\n"));

    let text = fs::read_to_string(out.path().join("techtree-zerg.txt")).expect("readable");
    assert!(text.starts_with("Hatchery\n  builds\n    Queen\n  morphs\n    Lair\n"));
    assert!(text.contains("Lair\n"));
    assert!(text.contains("    Hive\n"));
    let terran = fs::read_to_string(out.path().join("techtree-terran.txt")).expect("readable");
    assert!(terran.is_empty());
}

#[test]
fn test_missing_document_fails() {
    let config = create_test_config();
    let root = create_test_root(&config);
    fs::remove_file(config.layer_dir(root.path(), "liberty.sc2mod").join("AbilData.xml"))
        .expect("remove document");

    let err = build_catalog(root.path(), &config).expect_err("missing document");
    match err {
        ToolError::Io { path, .. } => assert!(path.ends_with("AbilData.xml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unresolved_parent_fails() {
    let config = create_test_config();
    let root = create_test_root(&config);
    fs::write(
        config.layer_dir(root.path(), "liberty.sc2mod").join("UnitData.xml"),
        r#"<Catalog><CUnit id="Lair" parent="Nowhere"/></Catalog>"#,
    )
    .expect("overwrite document");

    let err = Generation::run(root.path(), &config).expect_err("orphaned parent");
    assert!(matches!(err, ToolError::Catalog(_)));
}

#[test]
fn test_validate_clean_data() {
    let config = create_test_config();
    let root = create_test_root(&config);

    let report = validate_data_directory(root.path(), &config).expect("data converges");
    assert_eq!(report.layers.len(), 2);
    assert!(report.is_clean());
}

#[test]
fn test_validate_reports_collisions() {
    let config = create_test_config();
    let root = create_test_root(&config);
    fs::write(
        config.layer_dir(root.path(), "liberty.sc2mod").join("AbilData.xml"),
        r#"<Catalog>
            <CAbilResearch id="EvolutionResearch">
                <InfoArray index="Research1" Time="160" Upgrade="ZergMeleeWeaponsLevel1"/>
                <InfoArray index="Research2" Time="160" Upgrade="ZergGroundArmorsLevel1"/>
            </CAbilResearch>
        </Catalog>"#,
    )
    .expect("overwrite document");

    let report = validate_data_directory(root.path(), &config).expect("data converges");
    assert_eq!(report.collisions.len(), 1);
    let collision = &report.collisions[0];
    assert_eq!(collision.id, 0);
    assert!(collision.commands.contains("EvolutionResearch,Research1"));
    assert!(collision.commands.contains("EvolutionResearch,Research2"));
}

//! Layer and stable ID loading.

use std::path::Path;

use techtree_core::catalog::Layer;
use techtree_core::document::Element;
use techtree_core::stable_id::{StableIdListing, StableIdTable};

use crate::error::{Result, ToolError};
use crate::xml::parse_document;

/// Root element of every catalog document.
const CATALOG_ROOT: &str = "Catalog";

/// Which root children a document contributes.
#[derive(Debug, Clone, Copy)]
enum Select {
    /// Only children with this element name.
    Named(&'static str),
    /// Every child (the element name is the record kind).
    All,
}

/// Read a catalog document and return the selected root children.
fn read_catalog(path: &Path, select: Select) -> Result<Vec<Element>> {
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let origin = path.display().to_string();
    let root = parse_document(&text, &origin)?;

    let root = match root {
        Some(root) if root.is(CATALOG_ROOT) => root,
        other => {
            return Err(ToolError::UnexpectedRoot {
                path: origin,
                expected: CATALOG_ROOT,
                found: other.map_or_else(|| "nothing".to_string(), |e| format!("<{}>", e.name)),
            })
        }
    };

    let children = root.children.into_iter();
    Ok(match select {
        Select::Named(name) => children.filter(|c| c.is(name)).collect(),
        Select::All => children.collect(),
    })
}

/// Load one layer from its catalog directory.
///
/// Every document must exist: `UnitData.xml`, `AbilData.xml`,
/// `RequirementData.xml`, `RequirementNodeData.xml`, `FootprintData.xml`.
pub fn load_layer(dir: &Path, name: &str) -> Result<Layer> {
    let layer = Layer::new(name)
        .with_units(read_catalog(&dir.join("UnitData.xml"), Select::Named("CUnit"))?)
        .with_abilities(read_catalog(&dir.join("AbilData.xml"), Select::All)?)
        .with_requirements(read_catalog(
            &dir.join("RequirementData.xml"),
            Select::Named("CRequirement"),
        )?)
        .with_requirement_nodes(read_catalog(
            &dir.join("RequirementNodeData.xml"),
            Select::All,
        )?)
        .with_footprints(read_catalog(
            &dir.join("FootprintData.xml"),
            Select::Named("CFootprint"),
        )?);

    tracing::debug!(
        "Loaded layer '{name}' from {}: {} units, {} abilities, {} requirements, {} nodes, {} footprints",
        dir.display(),
        layer.units.len(),
        layer.abilities.len(),
        layer.requirements.len(),
        layer.requirement_nodes.len(),
        layer.footprints.len()
    );
    Ok(layer)
}

/// Load the stable ID listing.
pub fn load_stable_ids(path: &Path) -> Result<StableIdTable> {
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let listing: StableIdListing = serde_json::from_str(&text)?;
    tracing::info!(
        "Loaded stable IDs: {} units, {} ability commands, {} upgrades",
        listing.units.len(),
        listing.abilities.len(),
        listing.upgrades.len()
    );
    Ok(StableIdTable::from(listing))
}

//! Load every layer, converge the catalog and derive the tech trees.

use std::path::Path;

use techtree_core::catalog::{CatalogStore, LayerReport};
use techtree_core::factions::Race;
use techtree_core::stable_id::StableIdTable;
use techtree_core::tech_tree::{TechTree, TechTreeDeriver};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::loader::{load_layer, load_stable_ids};

/// Apply the configured layers under `root`, in order.
pub fn build_catalog(
    root: &Path,
    config: &GeneratorConfig,
) -> Result<(CatalogStore, Vec<LayerReport>)> {
    let mut store = CatalogStore::with_max_parent_passes(config.max_parent_passes);
    let mut reports = Vec::with_capacity(config.layers.len());
    for name in &config.layers {
        let layer = load_layer(&config.layer_dir(root, name), name)?;
        reports.push(store.apply_layer(&layer)?);
    }
    Ok((store, reports))
}

/// Everything one generator run produces before writing.
#[derive(Debug)]
pub struct Generation {
    /// Converged catalog.
    pub store: CatalogStore,
    /// Stable ID table.
    pub ids: StableIdTable,
    /// One report per applied layer.
    pub reports: Vec<LayerReport>,
    /// Tech trees of the playable races.
    pub trees: Vec<TechTree>,
}

impl Generation {
    /// Run the full pipeline for the data under `root`.
    pub fn run(root: &Path, config: &GeneratorConfig) -> Result<Self> {
        let (store, reports) = build_catalog(root, config)?;
        let ids = load_stable_ids(&config.stable_id_path(root))?;

        let deriver = TechTreeDeriver::new(&store)
            .with_filter(config.filter.clone())
            .with_transient_markers(config.transient_markers.clone());
        let trees: Vec<TechTree> = Race::PLAYABLE
            .iter()
            .map(|race| deriver.derive(*race))
            .collect();

        Ok(Self {
            store,
            ids,
            reports,
            trees,
        })
    }

    /// Tech tree of one race, if derived.
    #[must_use]
    pub fn tree(&self, race: Race) -> Option<&TechTree> {
        self.trees.iter().find(|tree| tree.race == race)
    }
}

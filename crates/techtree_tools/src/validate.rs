//! Data validation utilities.

use std::path::Path;

use techtree_core::ability_index::{find_collisions, IdCollision};
use techtree_core::catalog::LayerReport;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::loader::load_stable_ids;
use crate::pipeline::build_catalog;

/// Outcome of a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// One report per applied layer.
    pub layers: Vec<LayerReport>,
    /// Stable IDs reached by more than one exported ability command.
    pub collisions: Vec<IdCollision>,
}

impl ValidationReport {
    /// Whether no ability command IDs collide.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty()
    }
}

/// Validate the layered data under `root`.
///
/// Loading and parent resolution must succeed; ID collisions are
/// reported but do not fail validation.
///
/// # Errors
///
/// Returns an error if a document fails to load or the catalog does not
/// converge.
pub fn validate_data_directory(root: &Path, config: &GeneratorConfig) -> Result<ValidationReport> {
    let (store, layers) = build_catalog(root, config)?;
    let ids = load_stable_ids(&config.stable_id_path(root))?;
    let collisions = find_collisions(&store, &ids);
    for collision in &collisions {
        tracing::warn!(
            "Stable ID {} shared by {} commands",
            collision.id,
            collision.commands.len()
        );
    }
    Ok(ValidationReport { layers, collisions })
}

//! Generator configuration.
//!
//! Loaded from a RON file; every field has a default, so an empty `()`
//! file (or no file at all) gives the stock five-layer setup.
//!
//! ```ron
//! (
//!     layers: ["core.sc2mod", "liberty.sc2mod"],
//!     max_parent_passes: 12,
//!     filter: (excluded_prefixes: ["XelNaga"], allowed: ["XelNagaTower"]),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use techtree_core::catalog::DEFAULT_MAX_PARENT_PASSES;
use techtree_core::filter::NameFilter;
use techtree_core::tech_tree::DEFAULT_TRANSIENT_MARKERS;

use crate::error::{Result, ToolError};

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Layer directory names under `<root>/mods`, in application order.
    pub layers: Vec<String>,
    /// Sub-directory of each layer holding the catalog documents.
    pub data_dir: String,
    /// Stable ID listing, relative to the root.
    pub stable_id_file: String,
    /// Parent resolution pass bound per layer.
    pub max_parent_passes: usize,
    /// Units excluded from exports and tech trees.
    pub filter: NameFilter,
    /// Markers of intermediate produced units (cocoons, eggs).
    pub transient_markers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            layers: [
                "core.sc2mod",
                "liberty.sc2mod",
                "swarm.sc2mod",
                "void.sc2mod",
                "voidmulti.sc2mod",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            data_dir: "base.sc2data/GameData".to_string(),
            stable_id_file: "stableid.json".to_string(),
            max_parent_passes: DEFAULT_MAX_PARENT_PASSES,
            filter: NameFilter::default(),
            transient_markers: DEFAULT_TRANSIENT_MARKERS.iter().map(|m| (*m).to_string()).collect(),
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron)?;
        Ok(config)
    }

    /// Load from `path` when given, else use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Catalog directory of a layer.
    #[must_use]
    pub fn layer_dir(&self, root: &Path, layer: &str) -> PathBuf {
        root.join("mods").join(layer).join(&self.data_dir)
    }

    /// Path of the stable ID listing.
    #[must_use]
    pub fn stable_id_path(&self, root: &Path) -> PathBuf {
        root.join(&self.stable_id_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GeneratorConfig::from_ron_str("()").expect("valid RON");
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.layers.len(), 5);
        assert_eq!(config.layers[0], "core.sc2mod");
        assert_eq!(config.max_parent_passes, 10);
    }

    #[test]
    fn test_partial_override() {
        let config = GeneratorConfig::from_ron_str(
            r#"(
                layers: ["core.sc2mod"],
                filter: (excluded_prefixes: ["Aiur"]),
                transient_markers: ["Cocoon"],
            )"#,
        )
        .expect("valid RON");
        assert_eq!(config.layers, vec!["core.sc2mod".to_string()]);
        assert!(config.filter.is_excluded("AiurTempleBridge"));
        assert!(config.filter.allowed.contains(&"XelNagaTower".to_string()));
        assert_eq!(config.transient_markers, vec!["Cocoon".to_string()]);
        assert_eq!(config.data_dir, "base.sc2data/GameData");
    }

    #[test]
    fn test_layer_paths() {
        let config = GeneratorConfig::default();
        let dir = config.layer_dir(Path::new("/data"), "swarm.sc2mod");
        assert_eq!(
            dir,
            Path::new("/data/mods/swarm.sc2mod/base.sc2data/GameData")
        );
        assert_eq!(
            config.stable_id_path(Path::new("/data")),
            Path::new("/data/stableid.json")
        );
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            GeneratorConfig::from_ron_str("(layers: 3)"),
            Err(ToolError::Config(_))
        ));
    }
}

//! Export writers.

use std::path::{Path, PathBuf};

use serde::Serialize;
use techtree_core::export::Exporter;
use techtree_core::footprint::render_grid;

use crate::config::GeneratorConfig;
use crate::error::{Result, ToolError};
use crate::pipeline::Generation;

/// Unit export file name.
pub const UNITS_FILE: &str = "units.json";
/// Ability export file name.
pub const ABILITIES_FILE: &str = "abilities.json";
/// Tech tree export file name.
pub const TECH_TREE_FILE: &str = "techtree.json";
/// Footprint grid dump file name.
pub const FOOTPRINTS_FILE: &str = "footprints.txt";

/// File name of a race's plain-text tech tree.
#[must_use]
pub fn tech_tree_text_file(race: &str) -> String {
    format!("techtree-{race}.txt")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| ToolError::io(path, e))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, &json)
}

/// Write every export of a generation into `out_dir`.
///
/// Returns the written paths in write order.
pub fn write_outputs(
    generation: &Generation,
    config: &GeneratorConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| ToolError::io(out_dir, e))?;
    let exporter =
        Exporter::new(&generation.store, &generation.ids).with_filter(config.filter.clone());
    let mut written = Vec::new();

    let path = out_dir.join(UNITS_FILE);
    write_json(&path, &exporter.units()?)?;
    written.push(path);

    let path = out_dir.join(ABILITIES_FILE);
    write_json(&path, &exporter.abilities())?;
    written.push(path);

    let path = out_dir.join(TECH_TREE_FILE);
    write_json(&path, &exporter.tech_trees(&generation.trees))?;
    written.push(path);

    let grids: String = generation
        .store
        .footprints()
        .filter(|footprint| !footprint.removed)
        .map(render_grid)
        .collect();
    let path = out_dir.join(FOOTPRINTS_FILE);
    write_file(&path, &grids)?;
    written.push(path);

    for tree in &generation.trees {
        let path = out_dir.join(tech_tree_text_file(tree.race.as_str()));
        write_file(&path, &tree.render_text())?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tech_tree_text_file_name() {
        assert_eq!(tech_tree_text_file("zerg"), "techtree-zerg.txt");
    }

    #[test]
    fn test_write_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing").join("out.txt");
        let err = write_file(&missing, "x").expect_err("parent does not exist");
        match err {
            ToolError::Io { path, .. } => assert!(path.ends_with("out.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

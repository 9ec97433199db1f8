//! Footprint resolution.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::CatalogStore;
use crate::data::Footprint;
use crate::error::{CatalogError, Result};

/// A resolved placement shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootprintShape {
    /// Top-left corner.
    pub offset: [i32; 2],
    /// Width and height.
    pub dimensions: [i32; 2],
    /// Row-major bitmap, `x` occupied and `.` empty.
    pub data: String,
}

impl FootprintShape {
    fn of(footprint: &Footprint) -> Self {
        Self {
            offset: [footprint.x, footprint.y],
            dimensions: [footprint.w, footprint.h],
            data: bitmap_rows(footprint).concat(),
        }
    }
}

fn bitmap_rows(footprint: &Footprint) -> Vec<String> {
    (0..footprint.h.max(0))
        .map(|row| {
            (0..footprint.w.max(0))
                .map(|col| if footprint.occupied(col, row) { 'x' } else { '.' })
                .collect()
        })
        .collect()
}

/// Render a footprint's own rectangle as a text block.
///
/// The first line is `Id (x,y,w,h)`, followed by one line per row and a
/// trailing blank line.
#[must_use]
pub fn render_grid(footprint: &Footprint) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({},{},{},{})",
        footprint.id, footprint.x, footprint.y, footprint.w, footprint.h
    );
    for row in bitmap_rows(footprint) {
        out.push_str(&row);
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Resolves footprint references, following parents of empty footprints.
#[derive(Debug, Clone, Copy)]
pub struct FootprintResolver<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> FootprintResolver<'a> {
    /// Create a resolver.
    #[must_use]
    pub const fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    /// Resolve a footprint name to its shape.
    ///
    /// Unknown names (including the empty name) resolve to `None`, as do
    /// chains ending in an unknown parent.
    ///
    /// # Errors
    ///
    /// [`CatalogError::FootprintCycle`] when a parent chain loops.
    pub fn resolve(&self, name: &str) -> Result<Option<FootprintShape>> {
        let mut visited = HashSet::new();
        let mut current = name;
        loop {
            let Some(footprint) = self.catalog.footprint(current) else {
                return Ok(None);
            };
            if !visited.insert(current) {
                return Err(CatalogError::FootprintCycle(current.to_string()));
            }
            if footprint.is_degenerate() && !footprint.parent.is_empty() {
                current = &footprint.parent;
                continue;
            }
            return Ok(Some(FootprintShape::of(footprint)));
        }
    }
}

//! Placement footprint records.

use crate::document::Element;
use crate::error::{CatalogError, Result};
use crate::math::parse_int;

/// A placement footprint.
///
/// The rectangle and bitmap come from the footprint's own `Place` layer;
/// a footprint with an empty rectangle defers to its parent when resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footprint {
    /// Catalog identifier.
    pub id: String,
    /// Parent footprint, empty if none.
    pub parent: String,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in cells.
    pub w: i32,
    /// Height in cells.
    pub h: i32,
    /// Place layer removed.
    pub removed: bool,
    /// Row-major occupancy, `w * h` cells.
    pub placement: Vec<bool>,
}

impl Footprint {
    /// Create an empty footprint.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Whether the footprint's own rectangle is empty.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.w < 1 || self.h < 1
    }

    /// Whether the cell at (`col`, `row`) is occupied.
    #[must_use]
    pub fn occupied(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.w || row >= self.h {
            return false;
        }
        usize::try_from(row * self.w + col)
            .ok()
            .and_then(|index| self.placement.get(index).copied())
            .unwrap_or(false)
    }

    /// Apply one `CFootprint` declaration.
    pub fn apply(&mut self, decl: &Element) -> Result<()> {
        if let Some(parent) = decl.attr("parent") {
            self.parent = parent.to_string();
        }

        for layer in decl.children_named("Layers") {
            if !layer.attr_is("index", "Place") {
                continue;
            }
            if layer.int_attr("removed") == 1 {
                self.removed = true;
                continue;
            }
            self.removed = false;

            if let Some(area) = layer.attr("Area") {
                self.apply_area(area)?;
            }

            let rows_removed = layer
                .child("Rows")
                .is_some_and(|rows| rows.int_attr("removed") != 0);
            if layer.child("Rows").is_some() && !rows_removed {
                self.apply_rows(layer)?;
            }
        }
        Ok(())
    }

    fn apply_area(&mut self, area: &str) -> Result<()> {
        let parts: Vec<i64> = area.split(',').map(parse_int).collect();
        let &[x0, y0, x1, y1] = parts.as_slice() else {
            return Err(CatalogError::MalformedShape {
                entity: self.id.clone(),
                message: format!("Area '{area}' needs 4 components, got {}", parts.len()),
            });
        };
        let clamp = |v: i64| i32::try_from(v).unwrap_or(0);
        self.x = clamp(x0);
        self.y = clamp(y0);
        self.w = clamp(x1.saturating_sub(x0));
        self.h = clamp(y1.saturating_sub(y0));
        Ok(())
    }

    fn apply_rows(&mut self, layer: &Element) -> Result<()> {
        let mut rows = Vec::new();
        for row in layer.children_named("Rows") {
            let Some(value) = row.attr("value") else {
                return Err(CatalogError::MalformedShape {
                    entity: self.id.clone(),
                    message: "Rows entry without a value".to_string(),
                });
            };
            rows.push(value);
        }

        let widest = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        self.h = self.h.max(i32::try_from(rows.len()).unwrap_or(i32::MAX));
        self.w = self.w.max(i32::try_from(widest).unwrap_or(i32::MAX));

        let width = usize::try_from(self.w).unwrap_or(0);
        let height = usize::try_from(self.h).unwrap_or(0);
        self.placement = vec![false; width * height];
        for (row, value) in rows.iter().enumerate() {
            for (col, cell) in value.bytes().enumerate() {
                if cell == b'x' {
                    self.placement[row * width + col] = true;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_layer() -> Element {
        Element::new("Layers").with_attr("index", "Place")
    }

    fn row(value: &str) -> Element {
        Element::new("Rows").with_attr("value", value)
    }

    #[test]
    fn test_extreme_area_saturates() {
        let decl = Element::new("CFootprint").with_child(
            place_layer().with_attr("Area", "-9223372036854775808,0,9223372036854775807,1"),
        );
        let mut fp = Footprint::new("FootprintHuge");
        fp.apply(&decl).expect("four components");
        assert_eq!((fp.x, fp.y, fp.w, fp.h), (0, 0, 0, 1));
        assert!(fp.is_degenerate());
    }

    #[test]
    fn test_area_and_rows() {
        let decl = Element::new("CFootprint").with_child(
            place_layer()
                .with_attr("Area", "-1,-1,1,1")
                .with_child(row("xx"))
                .with_child(row("x.")),
        );
        let mut fp = Footprint::new("Footprint2x2");
        fp.apply(&decl).expect("valid footprint");

        assert_eq!((fp.x, fp.y, fp.w, fp.h), (-1, -1, 2, 2));
        assert!(fp.occupied(0, 0));
        assert!(fp.occupied(1, 0));
        assert!(fp.occupied(0, 1));
        assert!(!fp.occupied(1, 1));
        assert!(!fp.occupied(5, 5));
    }

    #[test]
    fn test_rows_grow_rectangle() {
        let decl = Element::new("CFootprint").with_child(
            place_layer()
                .with_child(row("xxx"))
                .with_child(row("x"))
                .with_child(row("x")),
        );
        let mut fp = Footprint::new("Tall");
        fp.apply(&decl).expect("valid footprint");
        assert_eq!((fp.w, fp.h), (3, 3));
        assert_eq!(fp.placement.len(), 9);
    }

    #[test]
    fn test_bad_area_arity() {
        let decl = Element::new("CFootprint")
            .with_child(place_layer().with_attr("Area", "0,0,2"));
        let mut fp = Footprint::new("Broken");
        let err = fp.apply(&decl).expect_err("three components");
        assert!(matches!(err, CatalogError::MalformedShape { .. }));
    }

    #[test]
    fn test_row_without_value() {
        let decl = Element::new("CFootprint")
            .with_child(place_layer().with_child(row("xx")).with_child(Element::new("Rows")));
        let mut fp = Footprint::new("Broken");
        assert!(fp.apply(&decl).is_err());
    }

    #[test]
    fn test_removed_place_layer() {
        let decl = Element::new("CFootprint").with_child(
            place_layer()
                .with_attr("removed", "1")
                .with_attr("Area", "0,0,2"),
        );
        let mut fp = Footprint::new("Gone");
        fp.apply(&decl).expect("removed layers are not parsed");
        assert!(fp.removed);
        assert!(fp.is_degenerate());
    }

    #[test]
    fn test_other_layers_ignored() {
        let decl = Element::new("CFootprint").with_attr("parent", "Base").with_child(
            Element::new("Layers")
                .with_attr("index", "Pathing")
                .with_child(row("xx")),
        );
        let mut fp = Footprint::new("Child");
        fp.apply(&decl).expect("valid footprint");
        assert_eq!(fp.parent, "Base");
        assert!(fp.is_degenerate());
    }
}

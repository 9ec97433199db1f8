//! Layered catalog store.
//!
//! The store owns every resolved record. Layers are applied one at a time,
//! in the caller's order; later layers override fields of earlier ones and
//! may introduce children that inherit from existing records.
//!
//! ## Inheritance
//!
//! A unit or ability declaring `parent="X"` is seeded as a copy of `X` the
//! first time it appears, then its own fields are applied. If `X` has not
//! been resolved yet (it may appear later in the same layer), the
//! declaration is deferred and retried on the next pass. Passes are bounded
//! by [`DEFAULT_MAX_PARENT_PASSES`]; anything still pending after that is
//! an [`CatalogError::UnresolvedParent`].

use std::collections::{BTreeMap, BTreeSet};

use crate::alias::AliasIndex;
use crate::data::{Ability, CatalogRecord, Footprint, Requirement, RequirementNode, Unit};
use crate::document::Element;
use crate::error::{CatalogError, Result};
use crate::factions::Race;

/// Default bound on parent-resolution passes per layer.
pub const DEFAULT_MAX_PARENT_PASSES: usize = 10;

/// One ordered patch of catalog declarations.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    /// Layer name, for diagnostics.
    pub name: String,
    /// `CUnit` declarations.
    pub units: Vec<Element>,
    /// Ability declarations (`CAbil*`).
    pub abilities: Vec<Element>,
    /// `CRequirement` declarations.
    pub requirements: Vec<Element>,
    /// Requirement node declarations (`CRequirement*`).
    pub requirement_nodes: Vec<Element>,
    /// `CFootprint` declarations.
    pub footprints: Vec<Element>,
}

impl Layer {
    /// Create an empty layer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add unit declarations.
    #[must_use]
    pub fn with_units(mut self, units: impl IntoIterator<Item = Element>) -> Self {
        self.units.extend(units);
        self
    }

    /// Add ability declarations.
    #[must_use]
    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = Element>) -> Self {
        self.abilities.extend(abilities);
        self
    }

    /// Add requirement declarations.
    #[must_use]
    pub fn with_requirements(mut self, requirements: impl IntoIterator<Item = Element>) -> Self {
        self.requirements.extend(requirements);
        self
    }

    /// Add requirement node declarations.
    #[must_use]
    pub fn with_requirement_nodes(mut self, nodes: impl IntoIterator<Item = Element>) -> Self {
        self.requirement_nodes.extend(nodes);
        self
    }

    /// Add footprint declarations.
    #[must_use]
    pub fn with_footprints(mut self, footprints: impl IntoIterator<Item = Element>) -> Self {
        self.footprints.extend(footprints);
        self
    }
}

/// Counters for one inheritable category of a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InheritanceStats {
    /// Declarations applied.
    pub applied: usize,
    /// Records created as copies of their parent.
    pub seeded: usize,
    /// Deferrals (a declaration deferred twice counts twice).
    pub deferred: usize,
    /// Passes needed to converge.
    pub passes: usize,
}

/// Summary of a converged layer application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerReport {
    /// Layer name.
    pub layer: String,
    /// Unit inheritance counters.
    pub units: InheritanceStats,
    /// Ability inheritance counters.
    pub abilities: InheritanceStats,
    /// Requirement declarations applied.
    pub requirements: usize,
    /// Requirement node declarations applied.
    pub requirement_nodes: usize,
    /// Footprint declarations applied.
    pub footprints: usize,
}

/// Owner of every resolved catalog record.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    units: BTreeMap<String, Unit>,
    abilities: BTreeMap<String, Ability>,
    requirements: BTreeMap<String, Requirement>,
    requirement_nodes: BTreeMap<String, RequirementNode>,
    footprints: BTreeMap<String, Footprint>,
    aliases: AliasIndex,
    max_parent_passes: usize,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty store with the default pass bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_parent_passes(DEFAULT_MAX_PARENT_PASSES)
    }

    /// Create an empty store with a custom pass bound (at least one pass).
    #[must_use]
    pub fn with_max_parent_passes(max_parent_passes: usize) -> Self {
        Self {
            units: BTreeMap::new(),
            abilities: BTreeMap::new(),
            requirements: BTreeMap::new(),
            requirement_nodes: BTreeMap::new(),
            footprints: BTreeMap::new(),
            aliases: AliasIndex::new(),
            max_parent_passes: max_parent_passes.max(1),
        }
    }

    /// Apply one layer on top of the current state.
    ///
    /// Categories are applied in order: units, abilities, requirements,
    /// requirement nodes, footprints.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnresolvedParent`] when a unit or ability parent
    /// never resolves, [`CatalogError::MalformedShape`] for malformed
    /// footprints. The store may be partially updated on error.
    pub fn apply_layer(&mut self, layer: &Layer) -> Result<LayerReport> {
        let aliases = &mut self.aliases;
        let units = apply_inherited(
            &mut self.units,
            &layer.units,
            self.max_parent_passes,
            |unit, decl| unit.apply(decl, aliases),
        )?;
        let abilities = apply_inherited(
            &mut self.abilities,
            &layer.abilities,
            self.max_parent_passes,
            Ability::apply,
        )?;

        let mut requirements = 0;
        for (id, decl) in with_ids(&layer.requirements) {
            self.requirements
                .entry(id.to_string())
                .or_insert_with(|| Requirement::new(id))
                .apply(decl);
            requirements += 1;
        }

        let mut requirement_nodes = 0;
        for (id, decl) in with_ids(&layer.requirement_nodes) {
            self.requirement_nodes
                .entry(id.to_string())
                .or_insert_with(|| RequirementNode::new(id))
                .apply(decl);
            requirement_nodes += 1;
        }

        let mut footprints = 0;
        for (id, decl) in with_ids(&layer.footprints) {
            self.footprints
                .entry(id.to_string())
                .or_insert_with(|| Footprint::new(id))
                .apply(decl)?;
            footprints += 1;
        }

        let report = LayerReport {
            layer: layer.name.clone(),
            units,
            abilities,
            requirements,
            requirement_nodes,
            footprints,
        };
        tracing::info!(
            "Applied layer '{}': {} units ({} seeded), {} abilities, {} requirements, {} nodes, {} footprints",
            report.layer,
            report.units.applied,
            report.units.seeded,
            report.abilities.applied,
            report.requirements,
            report.requirement_nodes,
            report.footprints
        );
        Ok(report)
    }

    /// Apply several layers in order.
    ///
    /// # Errors
    ///
    /// Stops at the first layer that fails.
    pub fn apply_layers<'a>(
        &mut self,
        layers: impl IntoIterator<Item = &'a Layer>,
    ) -> Result<Vec<LayerReport>> {
        layers.into_iter().map(|layer| self.apply_layer(layer)).collect()
    }

    /// Get a unit by name.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// All units, sorted by name.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Units of one race, sorted by name.
    pub fn units_of(&self, race: Race) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.race == race)
    }

    /// Get an ability by name.
    #[must_use]
    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.get(name)
    }

    /// All abilities, sorted by name.
    pub fn abilities(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    /// Get a requirement by id.
    #[must_use]
    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.get(id)
    }

    /// Get a requirement node by id.
    #[must_use]
    pub fn requirement_node(&self, id: &str) -> Option<&RequirementNode> {
        self.requirement_nodes.get(id)
    }

    /// Get a footprint by name.
    #[must_use]
    pub fn footprint(&self, name: &str) -> Option<&Footprint> {
        self.footprints.get(name)
    }

    /// All footprints, sorted by name.
    pub fn footprints(&self) -> impl Iterator<Item = &Footprint> {
        self.footprints.values()
    }

    /// Tech alias index populated by unit declarations.
    #[must_use]
    pub const fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }
}

/// Declarations paired with their `id`; declarations without one are skipped.
fn with_ids(decls: &[Element]) -> impl Iterator<Item = (&str, &Element)> {
    decls.iter().filter_map(|decl| decl.id().map(|id| (id, decl)))
}

/// Apply declarations with parent inheritance, deferring until parents exist.
///
/// Once a declaration is deferred, later declarations of the same id in
/// that pass are deferred with it, so they are re-applied in document order.
fn apply_inherited<T, F>(
    table: &mut BTreeMap<String, T>,
    decls: &[Element],
    max_passes: usize,
    mut apply: F,
) -> Result<InheritanceStats>
where
    T: CatalogRecord,
    F: FnMut(&mut T, &Element),
{
    let mut stats = InheritanceStats::default();
    let mut pending: Vec<(&str, &Element)> = with_ids(decls).collect();

    while !pending.is_empty() {
        if stats.passes == max_passes {
            return Err(unresolved::<T>(&pending, stats.passes));
        }
        stats.passes += 1;

        let attempted = pending.len();
        let mut deferred = Vec::new();
        let mut deferred_ids = BTreeSet::new();
        for (id, decl) in pending {
            if deferred_ids.contains(id) {
                deferred.push((id, decl));
                continue;
            }
            if let Some(parent) = decl.parent() {
                let Some(parent_record) = table.get(parent) else {
                    tracing::debug!(
                        "Deferring {} '{id}': parent '{parent}' not resolved yet",
                        T::KIND
                    );
                    deferred_ids.insert(id);
                    deferred.push((id, decl));
                    continue;
                };
                if !table.contains_key(id) {
                    tracing::debug!("Seeding {} '{id}' from parent '{parent}'", T::KIND);
                    let child = parent_record.inherit(id);
                    table.insert(id.to_string(), child);
                    stats.seeded += 1;
                }
            }

            let record = table.entry(id.to_string()).or_insert_with(|| T::named(id));
            apply(record, decl);
            stats.applied += 1;
        }

        stats.deferred += deferred.len();
        if deferred.len() == attempted {
            return Err(unresolved::<T>(&deferred, stats.passes));
        }
        pending = deferred;
    }

    Ok(stats)
}

fn unresolved<T: CatalogRecord>(pending: &[(&str, &Element)], passes: usize) -> CatalogError {
    CatalogError::UnresolvedParent {
        kind: T::KIND,
        pending: pending.iter().map(|(id, _)| (*id).to_string()).collect(),
        passes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str) -> Element {
        Element::new("CUnit").with_attr("id", id)
    }

    fn child(id: &str, parent: &str) -> Element {
        unit(id).with_attr("parent", parent)
    }

    fn life(value: &str) -> Element {
        Element::new("LifeMax").with_attr("value", value)
    }

    #[test]
    fn test_child_seeded_from_parent() {
        let layer = Layer::new("base")
            .with_units([unit("Hatchery").with_child(life("1500")), child("Lair", "Hatchery")]);
        let mut store = CatalogStore::new();
        let report = store.apply_layer(&layer).expect("layer converges");

        assert_eq!(store.unit("Lair").map(|u| u.life_max), Some(1500));
        assert_eq!(report.units.seeded, 1);
        assert_eq!(report.units.passes, 1);
    }

    #[test]
    fn test_forward_reference_is_deferred() {
        let layer = Layer::new("base")
            .with_units([child("Lair", "Hatchery"), unit("Hatchery").with_child(life("1500"))]);
        let mut store = CatalogStore::new();
        let report = store.apply_layer(&layer).expect("layer converges");

        assert_eq!(store.unit("Lair").map(|u| u.life_max), Some(1500));
        assert_eq!(report.units.passes, 2);
        assert_eq!(report.units.deferred, 1);
        assert_eq!(report.units.applied, 2);
    }

    #[test]
    fn test_missing_parent_is_fatal() {
        let layer = Layer::new("base").with_units([child("Lair", "Nowhere")]);
        let mut store = CatalogStore::new();
        let err = store.apply_layer(&layer).expect_err("parent never appears");

        match err {
            CatalogError::UnresolvedParent { kind, pending, .. } => {
                assert_eq!(kind, "unit");
                assert_eq!(pending, vec!["Lair".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pass_bound_is_enforced() {
        // each pass resolves exactly one link of a reversed chain
        let layer = Layer::new("chain").with_units([
            child("D", "C"),
            child("C", "B"),
            child("B", "A"),
            unit("A"),
        ]);

        let mut tight = CatalogStore::with_max_parent_passes(2);
        assert!(matches!(
            tight.apply_layer(&layer),
            Err(CatalogError::UnresolvedParent { passes: 2, .. })
        ));

        let mut store = CatalogStore::new();
        let report = store.apply_layer(&layer).expect("chain converges");
        assert_eq!(report.units.passes, 4);
    }

    #[test]
    fn test_repeated_declarations_keep_document_order() {
        let layer = Layer::new("base").with_units([
            child("Lair", "Hatchery").with_child(life("1800")),
            unit("Lair").with_child(life("2000")),
            unit("Hatchery").with_child(life("1500")),
        ]);
        let mut store = CatalogStore::new();
        let report = store.apply_layer(&layer).expect("layer converges");

        assert_eq!(store.unit("Lair").map(|u| u.life_max), Some(2000));
        assert_eq!(report.units.deferred, 2);
        assert_eq!(report.units.passes, 2);
    }

    #[test]
    fn test_existing_child_is_not_reseeded() {
        let base = Layer::new("base").with_units([
            unit("Hatchery").with_child(life("1500")),
            child("Lair", "Hatchery").with_child(life("2000")),
        ]);
        let patch = Layer::new("patch")
            .with_units([unit("Hatchery").with_child(life("1000")), child("Lair", "Hatchery")]);

        let mut store = CatalogStore::new();
        store.apply_layers([&base, &patch]).expect("layers converge");
        assert_eq!(store.unit("Lair").map(|u| u.life_max), Some(2000));
        assert_eq!(store.unit("Hatchery").map(|u| u.life_max), Some(1000));
    }

    #[test]
    fn test_declarations_without_id_are_skipped() {
        let layer = Layer::new("base")
            .with_units([Element::new("CUnit").with_child(life("10"))])
            .with_requirement_nodes([Element::new("CRequirementAnd")]);
        let mut store = CatalogStore::new();
        let report = store.apply_layer(&layer).expect("nothing to resolve");
        assert_eq!(report.units.applied, 0);
        assert_eq!(report.requirement_nodes, 0);
        assert_eq!(store.units().count(), 0);
    }

    #[test]
    fn test_ability_inheritance() {
        let layer = Layer::new("base").with_abilities([
            Element::new("CAbilMorph")
                .with_attr("id", "BurrowChild")
                .with_attr("parent", "BurrowBase"),
            Element::new("CAbilMorph").with_attr("id", "BurrowBase").with_child(
                Element::new("InfoArray").with_attr("Unit", "ZerglingBurrowed"),
            ),
        ]);
        let mut store = CatalogStore::new();
        store.apply_layer(&layer).expect("abilities converge");

        let ability = store.ability("BurrowChild").expect("seeded ability");
        assert_eq!(ability.name, "BurrowChild");
        assert_eq!(
            ability.command("Execute").map(|c| c.units.clone()),
            Some(vec!["ZerglingBurrowed".to_string()])
        );
    }
}

//! Proptest strategies for catalog testing.
//!
//! These strategies generate random but reproducible declaration sets for
//! property-based testing of layer application.

use proptest::prelude::*;
use techtree_core::document::Element;

use crate::fixtures::{child_unit_decl, field, unit_decl};

/// Name of the `index`-th unit of a generated chain.
#[must_use]
pub fn chain_unit_name(index: usize) -> String {
    format!("ChainUnit{index}")
}

/// A linear parent chain: unit `i` inherits from unit `i - 1`.
///
/// The root declares `root_life`; when `orphaned` the root itself points
/// at a parent that is never declared.
#[must_use]
pub fn parent_chain(len: usize, root_life: u32, orphaned: bool) -> Vec<Element> {
    (0..len)
        .map(|i| {
            let name = chain_unit_name(i);
            match i {
                0 if orphaned => child_unit_decl(&name, "MissingAncestor"),
                0 => unit_decl(&name).with_child(field("LifeMax", &root_life.to_string())),
                _ => child_unit_decl(&name, &chain_unit_name(i - 1)),
            }
        })
        .collect()
}

/// Generate a shuffled, fully covered parent chain of 1 to `max_len` units.
pub fn arb_parent_chain(max_len: usize) -> impl Strategy<Value = (u32, Vec<Element>)> {
    (1..=max_len, 1u32..5000u32).prop_flat_map(|(len, life)| {
        (Just(life), Just(parent_chain(len, life, false)).prop_shuffle())
    })
}

/// Generate a shuffled parent chain whose root parent never appears.
pub fn arb_orphaned_chain(max_len: usize) -> impl Strategy<Value = Vec<Element>> {
    (1..=max_len).prop_flat_map(|len| Just(parent_chain(len, 0, true)).prop_shuffle())
}

/// Generate a numbered command slot (`Build`, `Train` or `Research` + 1..100).
pub fn arb_numbered_slot() -> impl Strategy<Value = (String, u64)> {
    (
        prop_oneof![Just("Build"), Just("Train"), Just("Research"), Just("TRAIN")],
        1u64..100u64,
    )
        .prop_map(|(prefix, n)| (format!("{prefix}{n}"), n))
}

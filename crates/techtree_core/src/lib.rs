//! # Tech Tree Core
//!
//! Layered game catalog resolution and tech-tree derivation.
//!
//! This crate contains **only** deterministic logic:
//! - No IO (documents arrive as parsed [`document::Element`] trees)
//! - No floating-point math (uses fixed-point)
//! - Ordered maps everywhere, so exports are reproducible
//!
//! ## Pipeline
//!
//! 1. [`catalog::CatalogStore::apply_layer`] folds each layer's
//!    declarations onto the store, resolving parent inheritance.
//! 2. [`tech_tree::TechTreeDeriver`] walks command cards per race.
//! 3. [`export::Exporter`] turns the store into serializable records keyed
//!    by stable IDs.
//!
//! ## Crate Structure
//!
//! - [`data`] - Catalog record types
//! - [`catalog`] - Layer application and inheritance
//! - [`command_card`] - Live command references of a unit
//! - [`requirements`] - Requirement expression trees
//! - [`ability_index`] - Ability command stable IDs
//! - [`footprint`] - Placement footprint shapes
//! - [`math`] - Fixed-point math and lenient parsing

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ability_index;
pub mod alias;
pub mod catalog;
pub mod command_card;
pub mod data;
pub mod document;
pub mod error;
pub mod export;
pub mod factions;
pub mod filter;
pub mod footprint;
pub mod math;
pub mod requirements;
pub mod stable_id;
pub mod tech_tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ability_index::{
        command_offset, find_collisions, AbilityCommandIndexer, IdCollision,
    };
    pub use crate::alias::AliasIndex;
    pub use crate::catalog::{CatalogStore, Layer, LayerReport};
    pub use crate::command_card::{live_command_refs, split_command_ref, CommandCardResolver};
    pub use crate::data::{Ability, AbilityKind, CatalogRecord, Footprint, Unit};
    pub use crate::document::Element;
    pub use crate::error::{CatalogError, Result, Unresolvable, UnresolvableReason};
    pub use crate::export::Exporter;
    pub use crate::factions::Race;
    pub use crate::filter::NameFilter;
    pub use crate::footprint::{render_grid, FootprintResolver, FootprintShape};
    pub use crate::math::Fixed;
    pub use crate::requirements::{RequirementExpr, RequirementResolver};
    pub use crate::stable_id::{StableIdListing, StableIdTable};
    pub use crate::tech_tree::{TechTree, TechTreeDeriver};
}

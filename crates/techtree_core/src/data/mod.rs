//! Catalog record types.
//!
//! Each record knows how to fold one declaration element onto itself.
//! Layer ordering, inheritance and deferral are handled by
//! [`crate::catalog::CatalogStore`]; records never look at each other.

mod ability_data;
mod footprint_data;
mod requirement_data;
mod unit_data;

pub use ability_data::{Ability, AbilityCommand, AbilityKind, EXECUTE_SLOT};
pub use footprint_data::Footprint;
pub use requirement_data::{CountKind, LogicOp, NodeBody, Requirement, RequirementNode};
pub use unit_data::{CommandCard, ResourceKind, Unit, UnitAttributes};

/// A record that can inherit from a parent of the same kind.
pub trait CatalogRecord: Clone {
    /// Category name used in diagnostics.
    const KIND: &'static str;

    /// A fresh record with default fields.
    fn named(name: &str) -> Self;

    /// Replace the record's identifier.
    fn set_name(&mut self, name: &str);

    /// Seed a child record as a full copy of this one.
    #[must_use]
    fn inherit(&self, name: &str) -> Self {
        let mut child = self.clone();
        child.set_name(name);
        child
    }
}

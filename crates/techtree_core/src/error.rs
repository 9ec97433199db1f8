//! Error types for catalog resolution.

use thiserror::Error;

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Top-level error type for fatal catalog errors.
///
/// Reference errors (unknown aliases, dangling requirement nodes, unmapped
/// stable IDs) are not represented here: they degrade into partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Entities whose parent never appeared within the pass budget.
    #[error("Unresolved {kind} parents after {passes} passes: {pending:?}")]
    UnresolvedParent {
        /// Entity category ("unit", "ability").
        kind: &'static str,
        /// Identifiers still waiting on a parent.
        pending: Vec<String>,
        /// Passes attempted before giving up.
        passes: usize,
    },

    /// A declaration does not have the shape the schema requires.
    #[error("Malformed {entity}: {message}")]
    MalformedShape {
        /// Identifier of the offending declaration.
        entity: String,
        /// What was wrong with it.
        message: String,
    },

    /// A footprint's parent chain loops back on itself.
    #[error("Footprint parent cycle through '{0}'")]
    FootprintCycle(String),
}

/// Why a requirement node could not be turned into an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvableReason {
    /// The node's element kind is not one of the known requirement kinds.
    UnknownKind,
    /// A logic node without a single resolvable operand.
    NoOperands,
    /// The node references itself through its operands.
    Cycle,
}

impl std::fmt::Display for UnresolvableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind => write!(f, "unknown node kind"),
            Self::NoOperands => write!(f, "no resolvable operands"),
            Self::Cycle => write!(f, "operand cycle"),
        }
    }
}

/// A requirement branch that could not be resolved.
///
/// Recovered locally: the enclosing logic node drops the branch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Requirement node '{node}' is unresolvable: {reason}")]
pub struct Unresolvable {
    /// The node reference that failed.
    pub node: String,
    /// Failure cause.
    pub reason: UnresolvableReason,
}

impl Unresolvable {
    /// Create a new unresolvable marker.
    #[must_use]
    pub fn new(node: impl Into<String>, reason: UnresolvableReason) -> Self {
        Self {
            node: node.into(),
            reason,
        }
    }
}

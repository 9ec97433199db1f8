//! Requirement expression resolution.
//!
//! Requirement nodes form a graph of boolean combinators over counting
//! leaves. Resolution turns a node reference into a serializable
//! [`RequirementExpr`] tree. Failures are local: a logic node drops the
//! operands it cannot resolve and only fails when none are left.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogStore;
use crate::data::{CountKind, LogicOp, NodeBody};
use crate::error::{Unresolvable, UnresolvableReason};
use crate::math::parse_int;
use crate::stable_id::StableIdTable;

/// References shorter than this are treated as numeric literals.
///
/// Real node ids are longer; short operands such as `"0"` or `"1"` in
/// `Eq` nodes are counts to compare against.
pub const LITERAL_THRESHOLD: usize = 5;

/// A resolved requirement expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RequirementExpr {
    /// Numeric literal.
    Value {
        /// Literal value.
        value: i64,
    },
    /// All operands hold.
    And {
        /// Resolved operands.
        operands: Vec<RequirementExpr>,
    },
    /// Any operand holds.
    Or {
        /// Resolved operands.
        operands: Vec<RequirementExpr>,
    },
    /// Operands are equal.
    Eq {
        /// Resolved operands.
        operands: Vec<RequirementExpr>,
    },
    /// Negation.
    Not {
        /// Resolved operands.
        operands: Vec<RequirementExpr>,
    },
    /// Count of units, alias-expanded.
    UnitCount {
        /// Concrete unit names.
        #[serde(rename = "unitName")]
        unit_name: Vec<String>,
        /// Stable IDs, parallel to `unit_name`.
        unit: Vec<u64>,
        /// Optional state qualifier.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
    },
    /// Count of an upgrade.
    UpgradeCount {
        /// Upgrade name.
        #[serde(rename = "upgradeName")]
        upgrade_name: String,
        /// Stable upgrade ID.
        upgrade: u64,
        /// Optional state qualifier.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
    },
}

impl RequirementExpr {
    /// Build a logic node.
    #[must_use]
    pub fn logic(op: LogicOp, operands: Vec<Self>) -> Self {
        match op {
            LogicOp::And => Self::And { operands },
            LogicOp::Or => Self::Or { operands },
            LogicOp::Eq => Self::Eq { operands },
            LogicOp::Not => Self::Not { operands },
        }
    }

    /// Operands of a logic node; empty for leaves.
    #[must_use]
    pub fn operands(&self) -> &[Self] {
        match self {
            Self::And { operands }
            | Self::Or { operands }
            | Self::Eq { operands }
            | Self::Not { operands } => operands,
            Self::Value { .. } | Self::UnitCount { .. } | Self::UpgradeCount { .. } => &[],
        }
    }
}

/// Resolves requirement references against a converged catalog.
#[derive(Debug, Clone, Copy)]
pub struct RequirementResolver<'a> {
    catalog: &'a CatalogStore,
    ids: &'a StableIdTable,
}

impl<'a> RequirementResolver<'a> {
    /// Create a resolver.
    #[must_use]
    pub const fn new(catalog: &'a CatalogStore, ids: &'a StableIdTable) -> Self {
        Self { catalog, ids }
    }

    /// Resolve a node reference into an expression tree.
    ///
    /// # Errors
    ///
    /// [`Unresolvable`] for unknown node kinds, logic nodes without a
    /// resolvable operand, and operand cycles.
    pub fn resolve(&self, node_ref: &str) -> Result<RequirementExpr, Unresolvable> {
        let mut visiting = BTreeSet::new();
        self.resolve_node(node_ref, &mut visiting)
    }

    fn resolve_node<'n>(
        &self,
        node_ref: &'n str,
        visiting: &mut BTreeSet<&'n str>,
    ) -> Result<RequirementExpr, Unresolvable>
    where
        'a: 'n,
    {
        let node = match self.catalog.requirement_node(node_ref) {
            Some(node) if node_ref.len() >= LITERAL_THRESHOLD => node,
            _ => {
                return Ok(RequirementExpr::Value {
                    value: parse_int(node_ref),
                })
            }
        };

        match &node.body {
            NodeBody::Unknown => Err(Unresolvable::new(node_ref, UnresolvableReason::UnknownKind)),
            NodeBody::Count { kind, link, state } => {
                let state = (!state.is_empty()).then(|| state.clone());
                Ok(match kind {
                    CountKind::Unit => {
                        let unit_name = self.catalog.aliases().resolve(link);
                        let unit = unit_name.iter().map(|name| self.ids.unit_id(name)).collect();
                        RequirementExpr::UnitCount {
                            unit_name,
                            unit,
                            state,
                        }
                    }
                    CountKind::Upgrade => RequirementExpr::UpgradeCount {
                        upgrade_name: link.clone(),
                        upgrade: self.ids.upgrade_id(link),
                        state,
                    },
                })
            }
            NodeBody::Logic { op, operands } => {
                if !visiting.insert(node_ref) {
                    return Err(Unresolvable::new(node_ref, UnresolvableReason::Cycle));
                }
                let mut resolved = Vec::with_capacity(operands.len());
                for operand in operands.values() {
                    match self.resolve_node(operand, visiting) {
                        Ok(expr) => resolved.push(expr),
                        Err(err) => tracing::debug!("Dropping operand of '{node_ref}': {err}"),
                    }
                }
                visiting.remove(node_ref);

                if resolved.is_empty() {
                    return Err(Unresolvable::new(node_ref, UnresolvableReason::NoOperands));
                }
                Ok(RequirementExpr::logic(*op, resolved))
            }
        }
    }

    /// Resolve a command's requirement reference.
    ///
    /// A known requirement yields its use and show trees (in that order);
    /// any other reference is resolved directly as a node. Branches that
    /// fail are dropped, so the result may be empty.
    #[must_use]
    pub fn resolve_requirement(&self, id: &str) -> Vec<RequirementExpr> {
        let refs: Vec<&str> = match self.catalog.requirement(id) {
            Some(requirement) => requirement.node_refs().collect(),
            None => vec![id],
        };

        refs.into_iter()
            .filter_map(|node_ref| match self.resolve(node_ref) {
                Ok(expr) => Some(expr),
                Err(err) => {
                    tracing::warn!("Dropping requirement branch of '{id}': {err}");
                    None
                }
            })
            .collect()
    }
}

//! Requirement and requirement node records.

use std::collections::BTreeMap;

use crate::document::Element;
use crate::math::parse_index;

/// A named pair of node references.
///
/// The "use" node gates whether the command can be issued, the "show"
/// node whether its button is visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    /// Catalog identifier.
    pub id: String,
    /// Node gating use.
    pub use_node: String,
    /// Node gating visibility.
    pub show_node: String,
}

impl Requirement {
    /// Create an empty requirement.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Apply one `CRequirement` declaration.
    pub fn apply(&mut self, decl: &Element) {
        for child in decl.children_named("NodeArray") {
            let (Some(index), Some(link)) = (child.attr("index"), child.attr("Link")) else {
                continue;
            };
            if index.eq_ignore_ascii_case("Use") {
                self.use_node = link.to_string();
            }
            if index.eq_ignore_ascii_case("Show") {
                self.show_node = link.to_string();
            }
        }
    }

    /// Non-empty node references, use first.
    pub fn node_refs(&self) -> impl Iterator<Item = &str> {
        [self.use_node.as_str(), self.show_node.as_str()]
            .into_iter()
            .filter(|name| !name.is_empty())
    }
}

/// What a counting leaf counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    /// Units (through the alias index).
    Unit,
    /// Upgrades.
    Upgrade,
}

/// Boolean combinator of an interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// All operands.
    And,
    /// Any operand.
    Or,
    /// Operands equal.
    Eq,
    /// Negation.
    Not,
}

/// Body of a requirement node, by declaring element kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeBody {
    /// Element kind not modeled; never resolves.
    #[default]
    Unknown,
    /// Counting leaf.
    Count {
        /// Units or upgrades.
        kind: CountKind,
        /// Counted name.
        link: String,
        /// Optional state qualifier (e.g. `CompleteOnlyAtUnit`).
        state: String,
    },
    /// Interior node.
    Logic {
        /// Combinator.
        op: LogicOp,
        /// Operand index → node reference or numeric literal.
        operands: BTreeMap<usize, String>,
    },
}

/// Parsed form of a requirement node element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeTag {
    Count(CountKind),
    Logic(LogicOp),
    Unknown,
}

impl NodeTag {
    fn from_element(name: &str) -> Self {
        [
            ("CRequirementCountUpgrade", Self::Count(CountKind::Upgrade)),
            ("CRequirementCountUnit", Self::Count(CountKind::Unit)),
            ("CRequirementAnd", Self::Logic(LogicOp::And)),
            ("CRequirementOr", Self::Logic(LogicOp::Or)),
            ("CRequirementEq", Self::Logic(LogicOp::Eq)),
            ("CRequirementNot", Self::Logic(LogicOp::Not)),
        ]
        .into_iter()
        .find(|(element, _)| name.eq_ignore_ascii_case(element))
        .map_or(Self::Unknown, |(_, tag)| tag)
    }
}

/// A requirement expression node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementNode {
    /// Catalog identifier.
    pub id: String,
    /// Node body.
    pub body: NodeBody,
}

impl RequirementNode {
    /// Create an unknown node.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: NodeBody::Unknown,
        }
    }

    /// Apply one requirement node declaration.
    ///
    /// The element kind always replaces the node kind. Logic declarations
    /// start from an empty operand set; counting leaves keep their link
    /// and state unless the declaration overrides them.
    pub fn apply(&mut self, decl: &Element) {
        let body = std::mem::take(&mut self.body);
        self.body = match (NodeTag::from_element(&decl.name), body) {
            (NodeTag::Count(kind), NodeBody::Count { link, state, .. }) => {
                NodeBody::Count { kind, link, state }
            }
            (NodeTag::Count(kind), _) => NodeBody::Count {
                kind,
                link: String::new(),
                state: String::new(),
            },
            (NodeTag::Logic(op), _) => NodeBody::Logic {
                op,
                operands: BTreeMap::new(),
            },
            (NodeTag::Unknown, _) => NodeBody::Unknown,
        };

        for child in &decl.children {
            match &mut self.body {
                NodeBody::Count { link, state, .. } if child.is("Count") => {
                    if let Some(value) = child.attr("Link") {
                        *link = value.to_string();
                    }
                    if let Some(value) = child.attr("State") {
                        *state = value.to_string();
                    }
                }
                NodeBody::Logic { operands, .. } if child.is("OperandArray") => {
                    if let Some(value) = child.attr("value") {
                        let index = child.attr("index").map_or(operands.len(), parse_index);
                        operands.insert(index, value.to_string());
                    }
                }
                _ => {}
            }
        }
    }
}

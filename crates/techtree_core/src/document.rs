//! Parsed catalog document elements.
//!
//! The physical document format is read elsewhere; the core only sees a
//! tree of named elements with string attributes. Element names are
//! matched case-insensitively, attribute names exactly.

use crate::math::{parse_fixed, parse_int, Fixed};

/// One element of a catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Element (tag) name, e.g. `CUnit` or `LifeMax`.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child elements.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Check the element name, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a non-empty attribute value.
    #[must_use]
    pub fn non_empty_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).filter(|v| !v.is_empty())
    }

    /// Compare an attribute value, ignoring ASCII case.
    #[must_use]
    pub fn attr_is(&self, key: &str, expected: &str) -> bool {
        self.attr(key)
            .is_some_and(|v| v.eq_ignore_ascii_case(expected))
    }

    /// Integer attribute; missing or unparseable values are `0`.
    #[must_use]
    pub fn int_attr(&self, key: &str) -> i64 {
        self.attr(key).map_or(0, parse_int)
    }

    /// Fixed-point attribute; missing or unparseable values are zero.
    #[must_use]
    pub fn fixed_attr(&self, key: &str) -> Fixed {
        self.attr(key).map_or(Fixed::ZERO, parse_fixed)
    }

    /// Flag attribute: set when the integer value is positive.
    #[must_use]
    pub fn flag_attr(&self, key: &str) -> bool {
        self.int_attr(key) > 0
    }

    /// The `id` attribute, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// The `parent` attribute, if present and non-empty.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.non_empty_attr("parent")
    }

    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(name))
    }

    /// All children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(name))
    }
}

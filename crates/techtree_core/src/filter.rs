//! Unit name denylist.

use serde::{Deserialize, Serialize};

/// Excludes map-specific and campaign doodad units from exports.
///
/// A name is excluded when it starts with one of `excluded_prefixes`
/// (ignoring ASCII case) and is not listed in `allowed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameFilter {
    /// Case-insensitive name prefixes to exclude.
    pub excluded_prefixes: Vec<String>,
    /// Exact names (case-insensitive) kept despite a matching prefix.
    pub allowed: Vec<String>,
}

impl Default for NameFilter {
    fn default() -> Self {
        Self {
            excluded_prefixes: ["XelNaga", "Aiur", "PortCity", "Shakuras", "ExtendingBridge"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed: vec!["XelNagaTower".to_string()],
        }
    }
}

impl NameFilter {
    /// A filter that excludes nothing.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            excluded_prefixes: Vec::new(),
            allowed: Vec::new(),
        }
    }

    /// Whether `name` is excluded.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        if self.allowed.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            return false;
        }
        self.excluded_prefixes.iter().any(|prefix| {
            name.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
    }
}

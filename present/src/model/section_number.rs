//! Section number representation

use serde::{Deserialize, Serialize};

/// Position of a section in the document tree
///
/// Root sections carry a single component, nested sections append their
/// 1-based index among siblings (e.g. `[2, 1]` is the first subsection of
/// the second section).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionNumber {
    /// Number components, outermost first
    pub parts: Vec<u32>,
}

impl SectionNumber {
    /// Create a section number from its components
    pub fn new(parts: Vec<u32>) -> Self {
        Self { parts }
    }

    /// Number of the `index`-th child of this section (or of the document
    /// root when `self` is empty)
    pub fn child(&self, index: u32) -> Self {
        let mut parts = Vec::with_capacity(self.parts.len() + 1);
        parts.extend_from_slice(&self.parts);
        parts.push(index);
        Self { parts }
    }

    /// Nesting depth, equal to the number of components
    pub fn depth(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Components joined with a trailing dot each, e.g. `"2.1."`
    pub fn formatted(&self) -> String {
        self.parts.iter().map(|n| format!("{}.", n)).collect()
    }
}

impl From<Vec<u32>> for SectionNumber {
    fn from(parts: Vec<u32>) -> Self {
        Self { parts }
    }
}

impl std::fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .parts
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

//! Named symbols for the expression layer

use std::sync::Arc;

/// A named indeterminate appearing in symbolic form factors.
///
/// Symbols marked `positive` are assumed real and strictly positive
/// (masses, the renormalization scale); the evaluator rejects any binding
/// that violates the assumption. Name equality is symbol equality.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: Arc<str>,
    positive: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Arc::from(name.into()), positive: false }
    }

    /// A symbol carrying a positivity assumption, e.g. a mass.
    pub fn mass(name: impl Into<String>) -> Self {
        Self { name: Arc::from(name.into()), positive: true }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

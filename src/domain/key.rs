use crate::utils::canonicalize;
use serde::Serialize;
use std::fmt;

/// Canonical identity of an entity label. Two nodes with equal keys are the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn of(label: &str) -> Self {
        Self(canonicalize(label))
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an edge: canonical source label, canonical predicate, canonical target label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeKey {
    pub source: CanonicalKey,
    pub predicate: CanonicalKey,
    pub target: CanonicalKey,
}

impl EdgeKey {
    pub fn new(source_label: &str, predicate: &str, target_label: &str) -> Self {
        Self {
            source: CanonicalKey::of(source_label),
            predicate: CanonicalKey::of(predicate),
            target: CanonicalKey::of(target_label),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.predicate, self.target)
    }
}

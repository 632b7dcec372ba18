use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw (subject, predicate, object) fact, as extracted from a completion or an import file.
///
/// The field names double as the export/import document format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Tuple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Trims each field and rejects the triple if any field ends up empty.
    pub fn from_fields(subject: &str, predicate: &str, object: &str) -> Option<Self> {
        let subject = subject.trim();
        let predicate = predicate.trim();
        let object = object.trim();
        if subject.is_empty() || predicate.is_empty() || object.is_empty() {
            return None;
        }
        Some(Self::new(subject, predicate, object))
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

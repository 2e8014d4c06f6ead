//! Identifiers for curriculum entities.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Unique identifier for a Course.
///
/// Course ids come from the curriculum file (e.g. `MAT101`) and are
/// compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Create a course id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CourseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for CourseId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for CourseId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

/// The set of completed course ids.
pub type CompletionSet = std::collections::BTreeSet<CourseId>;

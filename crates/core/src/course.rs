//! Course model - the static units of a curriculum.

use crate::id::CourseId;
use serde::{Deserialize, Serialize};

/// A course in the curriculum.
///
/// Identity and prerequisites are fixed once the graph is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Courses that must be completed first, in declaration order
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,

    /// Containing semester (0-based)
    #[serde(alias = "semesterIndex", alias = "semester_index")]
    pub semester: u32,
}

impl Course {
    /// Create a course without prerequisites.
    pub fn new(id: impl Into<CourseId>, semester: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            prerequisites: Vec::new(),
            semester,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add prerequisites, keeping their order.
    pub fn with_prerequisites<I, T>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CourseId>,
    {
        self.prerequisites
            .extend(prerequisites.into_iter().map(Into::into));
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Whether the course has no prerequisites.
    pub fn is_entry(&self) -> bool {
        self.prerequisites.is_empty()
    }
}

/// On-disk curriculum document.
///
/// Accepts either a bare list of courses or an object with a `courses` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CurriculumFile {
    /// `[ {..}, {..} ]`
    List(Vec<Course>),
    /// `{ "courses": [ {..} ] }`
    Document {
        /// Course descriptors
        courses: Vec<Course>,
    },
}

impl CurriculumFile {
    /// Unwrap into the course descriptors.
    pub fn into_courses(self) -> Vec<Course> {
        match self {
            CurriculumFile::List(courses) => courses,
            CurriculumFile::Document { courses } => courses,
        }
    }
}

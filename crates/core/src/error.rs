//! Errors raised while building or querying a course graph.

use crate::id::CourseId;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while loading or querying the curriculum.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An identifier that is not part of the graph
    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    /// The curriculum configuration is malformed
    #[error("Invalid graph: {0}")]
    InvalidGraph(GraphDefect),

    /// The curriculum document could not be parsed
    #[error("Curriculum parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What makes a curriculum configuration malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphDefect {
    /// A prerequisite that is not itself a defined course
    #[error("course '{course}' requires undefined course '{prerequisite}'")]
    UndefinedPrerequisite {
        /// The dependent course
        course: CourseId,
        /// The missing prerequisite id
        prerequisite: CourseId,
    },

    /// The same id was declared twice
    #[error("course '{0}' is defined more than once")]
    DuplicateCourse(CourseId),
}

impl From<GraphDefect> for GraphError {
    fn from(defect: GraphDefect) -> Self {
        GraphError::InvalidGraph(defect)
    }
}

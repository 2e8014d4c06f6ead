//! Engine errors.

use malla_core::{CourseId, CourseStates, GraphError};
use malla_storage::StorageError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors reported by the mutation engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The id is not part of the curriculum
    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    /// Toggle-on of a course whose prerequisites are not all completed
    #[error("Course '{course}' is locked; complete {} first", join_ids(.missing))]
    LockedCourse {
        /// The course that was toggled
        course: CourseId,
        /// Prerequisites still missing
        missing: Vec<CourseId>,
    },

    /// The curriculum configuration is malformed
    #[error(transparent)]
    InvalidGraph(GraphError),

    /// Progress could not be read from storage
    #[error("Failed to load progress: {0}")]
    Load(#[source] StorageError),

    /// The change was applied in memory but could not be written.
    ///
    /// `states` is the authoritative result after the change.
    #[error("Failed to persist progress: {source}")]
    Persistence {
        /// The write failure
        source: StorageError,
        /// Resulting state of every course
        states: CourseStates,
    },
}

impl EngineError {
    /// The state to show for a persistence failure.
    pub fn states(&self) -> Option<&CourseStates> {
        match self {
            EngineError::Persistence { states, .. } => Some(states),
            _ => None,
        }
    }
}

impl From<GraphError> for EngineError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownCourse(id) => EngineError::UnknownCourse(id),
            other => EngineError::InvalidGraph(other),
        }
    }
}

fn join_ids(ids: &[CourseId]) -> String {
    ids.iter().map(CourseId::as_str).collect::<Vec<_>>().join(", ")
}

//! Malla core data models.
//!
//! Courses, the prerequisite graph, and the pure unlock evaluation that
//! the progress engine builds on.

#![warn(missing_docs)]

// Identities
mod id;

// Curriculum definition
mod course;
mod graph;
mod error;

// Derived state
mod unlock;
mod state;

// Re-exports
pub use id::{CourseId, CompletionSet};
pub use course::{Course, CurriculumFile};
pub use graph::CourseGraph;
pub use error::{GraphError, GraphDefect, Result};
pub use unlock::{is_unlocked, missing_prerequisites, prerequisites_met};
pub use state::{CourseState, CourseStates, SemesterProgress};

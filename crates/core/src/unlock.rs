//! Unlock evaluation.
//!
//! A course is unlocked when every one of its prerequisites is in the
//! completion set. Courses without prerequisites are always unlocked.

use crate::course::Course;
use crate::error::Result;
use crate::graph::CourseGraph;
use crate::id::{CompletionSet, CourseId};

/// Whether a course is selectable given the completed courses.
pub fn is_unlocked(graph: &CourseGraph, id: &str, completed: &CompletionSet) -> Result<bool> {
    Ok(prerequisites_met(graph.course(id)?, completed))
}

/// Whether every prerequisite of an already resolved course is completed.
pub fn prerequisites_met(course: &Course, completed: &CompletionSet) -> bool {
    course
        .prerequisites
        .iter()
        .all(|prereq| completed.contains(prereq))
}

/// Prerequisites of a course that are not yet completed, in declaration order.
pub fn missing_prerequisites(
    graph: &CourseGraph,
    id: &str,
    completed: &CompletionSet,
) -> Result<Vec<CourseId>> {
    Ok(graph
        .prerequisites_of(id)?
        .iter()
        .filter(|prereq| !completed.contains(*prereq))
        .cloned()
        .collect())
}

//! Derived per-course state and progress summaries.

use crate::graph::CourseGraph;
use crate::id::{CompletionSet, CourseId};
use crate::unlock::prerequisites_met;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion and lock state of a single course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseState {
    /// Marked completed by the student
    pub completed: bool,

    /// Some prerequisite is not completed
    pub locked: bool,
}

/// Result set: the state of every course in the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseStates(BTreeMap<CourseId, CourseState>);

impl CourseStates {
    /// Evaluate every course of the graph against a completion set.
    ///
    /// Ids in `completed` that are not part of the graph are ignored.
    pub fn evaluate(graph: &CourseGraph, completed: &CompletionSet) -> Self {
        let states = graph
            .all_courses()
            .iter()
            .map(|course| {
                let state = CourseState {
                    completed: completed.contains(&course.id),
                    locked: !prerequisites_met(course, completed),
                };
                (course.id.clone(), state)
            })
            .collect();
        Self(states)
    }

    /// State of one course.
    pub fn get(&self, id: &str) -> Option<&CourseState> {
        self.0.get(id)
    }

    /// Iterate in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&CourseId, &CourseState)> {
        self.0.iter()
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no courses.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of completed courses.
    pub fn completed_count(&self) -> usize {
        self.0.values().filter(|s| s.completed).count()
    }

    /// Courses that can be taken now: unlocked and not completed.
    pub fn available(&self) -> Vec<&CourseId> {
        self.0
            .iter()
            .filter(|(_, s)| !s.locked && !s.completed)
            .map(|(id, _)| id)
            .collect()
    }

    /// Per-semester completion, semester ascending.
    pub fn progress(&self, graph: &CourseGraph) -> Vec<SemesterProgress> {
        graph
            .semesters()
            .into_iter()
            .map(|semester| {
                let mut total = 0;
                let mut completed = 0;
                for course in graph.courses_in(semester) {
                    total += 1;
                    if self.get(&course.id).is_some_and(|s| s.completed) {
                        completed += 1;
                    }
                }
                SemesterProgress::new(semester, completed, total)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a CourseStates {
    type Item = (&'a CourseId, &'a CourseState);
    type IntoIter = std::collections::btree_map::Iter<'a, CourseId, CourseState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Completion progress for one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterProgress {
    /// Semester index
    pub semester: u32,

    /// Completed courses
    pub completed: usize,

    /// Total courses
    pub total: usize,

    /// Percentage complete
    pub percentage: f32,
}

impl SemesterProgress {
    fn new(semester: u32, completed: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            (completed as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        Self {
            semester,
            completed,
            total,
            percentage,
        }
    }

    /// Every course of the semester is completed.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

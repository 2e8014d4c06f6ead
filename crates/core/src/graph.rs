//! Course graph - courses and their prerequisite edges.

use crate::course::{Course, CurriculumFile};
use crate::error::{GraphDefect, GraphError, Result};
use crate::id::CourseId;
use std::collections::{HashMap, HashSet};

/// The static prerequisite graph of a curriculum.
///
/// Courses are held in semester order, keeping declaration order within a
/// semester. Every prerequisite edge points at a defined course.
#[derive(Debug, Clone)]
pub struct CourseGraph {
    /// All courses, semester ascending
    courses: Vec<Course>,
    /// course -> position in `courses`
    index: HashMap<CourseId, usize>,
    /// course -> [direct dependents]
    dependents: HashMap<CourseId, Vec<CourseId>>,
}

impl CourseGraph {
    /// Build a graph from course descriptors.
    ///
    /// Fails with [`GraphError::InvalidGraph`] when an id is declared twice
    /// or a prerequisite is not a defined course.
    pub fn load(courses: impl IntoIterator<Item = Course>) -> Result<Self> {
        let mut courses: Vec<Course> = courses.into_iter().collect();
        courses.sort_by_key(|c| c.semester);

        let mut index = HashMap::with_capacity(courses.len());
        for (pos, course) in courses.iter().enumerate() {
            if index.insert(course.id.clone(), pos).is_some() {
                return Err(GraphDefect::DuplicateCourse(course.id.clone()).into());
            }
        }

        let mut dependents: HashMap<CourseId, Vec<CourseId>> = HashMap::new();
        for course in &courses {
            for prereq in &course.prerequisites {
                if !index.contains_key(prereq) {
                    return Err(GraphDefect::UndefinedPrerequisite {
                        course: course.id.clone(),
                        prerequisite: prereq.clone(),
                    }
                    .into());
                }
                dependents
                    .entry(prereq.clone())
                    .or_default()
                    .push(course.id.clone());
            }
        }

        Ok(Self {
            courses,
            index,
            dependents,
        })
    }

    /// Parse a curriculum JSON document and build the graph.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CurriculumFile = serde_json::from_str(json)?;
        Self::load(file.into_courses())
    }

    /// All courses, semester ascending.
    pub fn all_courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the graph has no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Whether the id names a course in this graph.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a course.
    pub fn course(&self, id: &str) -> Result<&Course> {
        self.index
            .get(id)
            .map(|&pos| &self.courses[pos])
            .ok_or_else(|| GraphError::UnknownCourse(CourseId::new(id)))
    }

    /// Prerequisites of a course, in declaration order.
    pub fn prerequisites_of(&self, id: &str) -> Result<&[CourseId]> {
        Ok(&self.course(id)?.prerequisites)
    }

    /// Semester a course belongs to.
    pub fn semester_of(&self, id: &str) -> Result<u32> {
        Ok(self.course(id)?.semester)
    }

    /// Courses that list this one as a direct prerequisite.
    pub fn dependents_of(&self, id: &str) -> Result<&[CourseId]> {
        self.course(id)?;
        Ok(self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Distinct semester indices, ascending.
    pub fn semesters(&self) -> Vec<u32> {
        let mut semesters: Vec<u32> = self.courses.iter().map(|c| c.semester).collect();
        semesters.dedup();
        semesters
    }

    /// Courses of one semester, in declaration order.
    pub fn courses_in(&self, semester: u32) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(move |c| c.semester == semester)
    }

    /// Find prerequisite cycles.
    ///
    /// Each cycle is reported as the path of ids along the prerequisite
    /// edges, starting at the first course of the cycle that was reached.
    pub fn find_cycles(&self) -> Vec<Vec<CourseId>> {
        let mut cycles = Vec::new();
        let mut visited: HashSet<&CourseId> = HashSet::new();
        let mut on_path: HashSet<&CourseId> = HashSet::new();
        let mut path: Vec<&CourseId> = Vec::new();

        for course in &self.courses {
            if !visited.contains(&course.id) {
                self.visit(&course.id, &mut visited, &mut on_path, &mut path, &mut cycles);
            }
        }

        cycles
    }

    /// Whether the prerequisite edges form a DAG.
    pub fn is_acyclic(&self) -> bool {
        self.find_cycles().is_empty()
    }

    fn visit<'a>(
        &'a self,
        id: &'a CourseId,
        visited: &mut HashSet<&'a CourseId>,
        on_path: &mut HashSet<&'a CourseId>,
        path: &mut Vec<&'a CourseId>,
        cycles: &mut Vec<Vec<CourseId>>,
    ) {
        visited.insert(id);
        on_path.insert(id);
        path.push(id);

        if let Some(&pos) = self.index.get(id) {
            for prereq in &self.courses[pos].prerequisites {
                if on_path.contains(prereq) {
                    let start = path.iter().position(|p| *p == prereq).unwrap_or(0);
                    cycles.push(path[start..].iter().map(|p| (*p).clone()).collect());
                } else if !visited.contains(prereq) {
                    self.visit(prereq, visited, on_path, path, cycles);
                }
            }
        }

        path.pop();
        on_path.remove(id);
    }
}

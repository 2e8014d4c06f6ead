//! Consistency enforcement.
//!
//! Demotes completed courses whose prerequisites are no longer all
//! completed, until the completion set is closed under prerequisites.
//!
//! Courses are visited in graph order (semester ascending). A demotion is
//! visible to every later course in the same pass, so a curriculum whose
//! prerequisites always come earlier settles in one demoting pass.
//! Back-references and cycles take further passes; since passes only ever
//! remove courses, at most `|courses| + 1` passes run.

use crate::store::CompletionStore;
use malla_core::{prerequisites_met, CourseGraph, CourseId};
use malla_storage::StorageError;
use tracing::{debug, info};

/// Outcome of an enforcement run.
#[derive(Debug, Default)]
pub struct Enforcement {
    /// Courses demoted, in demotion order
    pub demoted: Vec<CourseId>,

    /// Full passes over the graph, including the final quiet one
    pub passes: usize,

    /// Failure of the last write, if it failed
    pub write_error: Option<StorageError>,
}

impl Enforcement {
    /// Whether anything was demoted.
    pub fn changed(&self) -> bool {
        !self.demoted.is_empty()
    }

    /// Combine with the outcome of a write made before enforcement.
    ///
    /// Writes replace the whole set, so the latest write decides whether
    /// storage matches memory.
    pub fn after_write(self, earlier: Option<StorageError>) -> Option<StorageError> {
        if self.changed() {
            self.write_error
        } else {
            earlier
        }
    }
}

/// Run passes over the graph until no completed course is locked.
pub async fn enforce(graph: &CourseGraph, store: &mut CompletionStore) -> Enforcement {
    let mut outcome = Enforcement::default();
    let max_passes = graph.len() + 1;

    loop {
        outcome.passes += 1;
        let mut demoted_this_pass = 0;

        for course in graph.all_courses() {
            if !store.is_completed(&course.id) {
                continue;
            }
            if prerequisites_met(course, store.snapshot()) {
                continue;
            }

            debug!("Demoting {}: prerequisites no longer completed", course.id);
            outcome.write_error = store.mark_incomplete(&course.id).await.err();
            outcome.demoted.push(course.id.clone());
            demoted_this_pass += 1;
        }

        if demoted_this_pass == 0 || outcome.passes >= max_passes {
            break;
        }
    }

    if outcome.changed() {
        info!(
            "Demoted {} course(s) in {} pass(es): {:?}",
            outcome.demoted.len(),
            outcome.passes,
            outcome.demoted
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use malla_core::{Course, CompletionSet};
    use malla_storage::MemoryStorage;

    async fn store_with(ids: &[&str]) -> (CompletionStore, MemoryStorage) {
        let completed: CompletionSet = ids.iter().map(|id| CourseId::from(*id)).collect();
        let storage = MemoryStorage::with_completed(completed);
        let mut store = CompletionStore::new(Box::new(storage.clone()));
        store.reload().await.unwrap();
        (store, storage)
    }

    fn closed_under_prerequisites(graph: &CourseGraph, completed: &CompletionSet) -> bool {
        completed.iter().all(|id| {
            graph
                .prerequisites_of(id)
                .map(|prereqs| prereqs.iter().all(|p| completed.contains(p)))
                .unwrap_or(true)
        })
    }

    #[tokio::test]
    async fn test_consistent_set_untouched() {
        let graph = CourseGraph::load(vec![
            Course::new("A", 0),
            Course::new("B", 1).with_prerequisites(["A"]),
        ])
        .unwrap();
        let (mut store, storage) = store_with(&["A", "B"]).await;

        let outcome = enforce(&graph, &mut store).await;
        assert!(!outcome.changed());
        assert_eq!(outcome.passes, 1);
        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(storage.writes().await, 0);
    }

    #[tokio::test]
    async fn test_forward_chain_settles_in_one_pass() {
        let graph = CourseGraph::load(vec![
            Course::new("A", 0),
            Course::new("B", 1).with_prerequisites(["A"]),
            Course::new("C", 2).with_prerequisites(["B"]),
            Course::new("D", 3).with_prerequisites(["C"]),
        ])
        .unwrap();
        let (mut store, storage) = store_with(&["B", "C", "D"]).await;

        let outcome = enforce(&graph, &mut store).await;
        assert_eq!(
            outcome.demoted,
            vec![CourseId::from("B"), CourseId::from("C"), CourseId::from("D")]
        );
        // one demoting pass plus the quiet confirmation pass
        assert_eq!(outcome.passes, 2);
        assert!(store.snapshot().is_empty());
        assert!(storage.persisted().await.is_empty());
        assert!(outcome.write_error.is_none());
    }

    #[tokio::test]
    async fn test_back_reference_reaches_fixed_point() {
        // X is listed before Y although it depends on it.
        let graph = CourseGraph::load(vec![
            Course::new("X", 0).with_prerequisites(["Y"]),
            Course::new("Y", 1).with_prerequisites(["Z"]),
            Course::new("Z", 2),
        ])
        .unwrap();
        let (mut store, _) = store_with(&["X", "Y"]).await;

        let outcome = enforce(&graph, &mut store).await;
        assert_eq!(outcome.demoted, vec![CourseId::from("Y"), CourseId::from("X")]);
        assert_eq!(outcome.passes, 3);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_is_demoted() {
        let graph = CourseGraph::load(vec![
            Course::new("A", 0).with_prerequisites(["B"]),
            Course::new("B", 0).with_prerequisites(["A"]),
            Course::new("C", 0),
        ])
        .unwrap();
        let (mut store, _) = store_with(&["B", "C"]).await;

        let outcome = enforce(&graph, &mut store).await;
        assert_eq!(outcome.demoted, vec![CourseId::from("B")]);
        assert_eq!(store.snapshot().len(), 1);
        assert!(store.is_completed("C"));
    }

    #[tokio::test]
    async fn test_every_subset_ends_closed() {
        let graph = CourseGraph::load(vec![
            Course::new("A", 0),
            Course::new("B", 0),
            Course::new("C", 1).with_prerequisites(["A"]),
            Course::new("D", 1).with_prerequisites(["A", "B"]),
            Course::new("E", 2).with_prerequisites(["C", "D"]),
        ])
        .unwrap();
        let ids: Vec<&str> = graph.all_courses().iter().map(|c| c.id.as_str()).collect();

        for mask in 0u32..(1 << ids.len()) {
            let subset: Vec<&str> = ids
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| *id)
                .collect();
            let (mut store, _) = store_with(&subset).await;
            let before = store.snapshot().clone();

            enforce(&graph, &mut store).await;

            let after = store.snapshot();
            assert!(closed_under_prerequisites(&graph, after), "mask {mask:b}");
            assert!(after.is_subset(&before), "mask {mask:b}");
        }
    }

    #[test]
    fn test_after_write_prefers_latest() {
        let quiet = Enforcement::default();
        let earlier = Some(StorageError::Other("disk full".into()));
        assert!(quiet.after_write(earlier).is_some());

        let wrote = Enforcement {
            demoted: vec![CourseId::from("A")],
            passes: 2,
            write_error: None,
        };
        let earlier = Some(StorageError::Other("disk full".into()));
        assert!(wrote.after_write(earlier).is_none());
    }
}

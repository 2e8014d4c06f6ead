//! Completion store - the authoritative set of completed courses.
//!
//! Every mutation updates the in-memory set first and then writes the whole
//! set through to storage. A failed write is returned to the caller but the
//! in-memory change stands; the store stays dirty until a later write
//! succeeds.
//!
//! Persisted ids the curriculum does not know can be set aside: they are
//! invisible to the engine but still written back with every save.

use malla_core::{CompletionSet, CourseId};
use malla_storage::{Storage, StorageError};
use tracing::{debug, warn};

type StoreResult = std::result::Result<(), StorageError>;

/// In-memory completion set backed by write-through storage.
pub struct CompletionStore {
    completed: CompletionSet,
    /// Persisted ids outside the curriculum
    foreign: CompletionSet,
    storage: Box<dyn Storage>,
    dirty: bool,
}

impl CompletionStore {
    /// Create an empty store over `storage`. Call [`reload`](Self::reload)
    /// to pick up persisted progress.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            completed: CompletionSet::new(),
            foreign: CompletionSet::new(),
            storage,
            dirty: false,
        }
    }

    /// Whether a course is marked completed.
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// Read-only view of the completion set.
    pub fn snapshot(&self) -> &CompletionSet {
        &self.completed
    }

    /// Whether the last write failed and storage is behind memory.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark a course completed. Idempotent.
    pub async fn mark_completed(&mut self, id: &str) -> StoreResult {
        self.completed.insert(CourseId::new(id));
        self.persist().await
    }

    /// Mark a course not completed. Idempotent.
    pub async fn mark_incomplete(&mut self, id: &str) -> StoreResult {
        self.completed.remove(id);
        self.persist().await
    }

    /// Forget all progress, including set-aside ids.
    pub async fn clear_all(&mut self) -> StoreResult {
        self.completed.clear();
        self.foreign.clear();
        let result = self.storage.clear().await;
        self.record(result)
    }

    /// Move ids for which `keep` returns false out of the visible set.
    ///
    /// Nothing is written; set-aside ids are still saved by later writes.
    pub fn set_aside(&mut self, mut keep: impl FnMut(&CourseId) -> bool) -> Vec<CourseId> {
        let mut moved = Vec::new();
        self.completed.retain(|id| {
            let kept = keep(id);
            if !kept {
                moved.push(id.clone());
            }
            kept
        });
        self.foreign.extend(moved.iter().cloned());
        moved
    }

    /// Set-aside ids.
    pub fn foreign(&self) -> &CompletionSet {
        &self.foreign
    }

    /// Drop set-aside ids so the next write removes them from storage.
    /// Returns whether there was anything to drop.
    pub fn forget_foreign(&mut self) -> bool {
        let had_any = !self.foreign.is_empty();
        self.foreign.clear();
        had_any
    }

    /// Replace the in-memory set with what storage holds.
    ///
    /// On failure the in-memory set is left unchanged.
    pub async fn reload(&mut self) -> StoreResult {
        let completed = self.storage.load_completed().await?;
        debug!("Reloaded {} completed courses", completed.len());
        self.completed = completed;
        self.foreign.clear();
        self.dirty = false;
        Ok(())
    }

    /// Write the current set to storage.
    pub async fn persist(&mut self) -> StoreResult {
        let result = if self.foreign.is_empty() {
            self.storage.save_completed(&self.completed).await
        } else {
            let all: CompletionSet = self.completed.union(&self.foreign).cloned().collect();
            self.storage.save_completed(&all).await
        };
        self.record(result)
    }

    fn record(&mut self, result: StoreResult) -> StoreResult {
        match &result {
            Ok(()) => self.dirty = false,
            Err(e) => {
                warn!("Progress write failed: {}", e);
                self.dirty = true;
            }
        }
        result
    }
}

//! In-memory storage.
//!
//! Clones share the same underlying set, so a test can hand one clone to
//! an engine and inspect what was persisted through another.

use std::sync::Arc;
use malla_core::CompletionSet;
use super::{Storage, Result};
use tokio::sync::Mutex;

/// Volatile storage backend.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    completed: Arc<Mutex<CompletionSet>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with a completion set.
    pub fn with_completed(completed: CompletionSet) -> Self {
        Self {
            completed: Arc::new(Mutex::new(completed)),
            writes: Arc::new(Mutex::new(0)),
        }
    }

    /// Copy of the persisted set.
    pub async fn persisted(&self) -> CompletionSet {
        self.completed.lock().await.clone()
    }

    /// Number of saves and clears performed.
    pub async fn writes(&self) -> usize {
        *self.writes.lock().await
    }

    /// Replace the persisted set without counting a write, as another
    /// session sharing the store would.
    pub async fn overwrite(&self, completed: CompletionSet) {
        *self.completed.lock().await = completed;
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load_completed(&self) -> Result<CompletionSet> {
        Ok(self.completed.lock().await.clone())
    }

    async fn save_completed(&mut self, completed: &CompletionSet) -> Result<()> {
        *self.completed.lock().await = completed.clone();
        *self.writes.lock().await += 1;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.completed.lock().await.clear();
        *self.writes.lock().await += 1;
        Ok(())
    }
}

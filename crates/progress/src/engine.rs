//! The progress engine - the only way to change completion state.
//!
//! Each call runs the whole sequence under one lock:
//! ```text
//! Read snapshot → Mutate store → Enforce consistency → Persist → Notify
//! ```

use crate::enforcer::enforce;
use crate::error::{EngineError, Result};
use crate::observer::Observer;
use crate::store::CompletionStore;
use malla_core::{missing_prerequisites, Course, CourseGraph, CourseStates};
use malla_storage::{Storage, StorageError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Configuration for the progress engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether `refresh` notifies observers
    pub notify_on_refresh: bool,
    /// Whether `refresh` removes persisted ids that are not in the curriculum
    pub prune_unknown: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            notify_on_refresh: true,
            prune_unknown: false,
        }
    }
}

/// Tracks a student's completed courses against a curriculum.
pub struct Engine {
    graph: CourseGraph,
    store: Mutex<CompletionStore>,
    observers: Vec<Arc<dyn Observer>>,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine over `storage`.
    ///
    /// Starts with nothing completed; call [`refresh`](Self::refresh) to
    /// load persisted progress.
    pub fn new(graph: CourseGraph, storage: impl Storage + 'static) -> Self {
        for cycle in graph.find_cycles() {
            let path: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            warn!("Prerequisite cycle, these courses can never unlock: {}", path.join(" -> "));
        }
        info!("Loaded curriculum: {} courses in {} semesters", graph.len(), graph.semesters().len());

        Self {
            graph,
            store: Mutex::new(CompletionStore::new(Box::new(storage))),
            observers: Vec::new(),
            config: EngineConfig::default(),
        }
    }

    /// Build the graph from course descriptors and create an engine.
    pub fn from_courses(
        courses: impl IntoIterator<Item = Course>,
        storage: impl Storage + 'static,
    ) -> Result<Self> {
        let graph = CourseGraph::load(courses).map_err(EngineError::InvalidGraph)?;
        Ok(Self::new(graph, storage))
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an observer.
    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.subscribe(observer);
        self
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Arc::new(observer));
    }

    /// The curriculum.
    pub fn graph(&self) -> &CourseGraph {
        &self.graph
    }

    /// Current state of every course, without changing anything.
    pub async fn states(&self) -> CourseStates {
        let store = self.store.lock().await;
        CourseStates::evaluate(&self.graph, store.snapshot())
    }

    /// Whether storage holds the current in-memory progress.
    pub async fn is_persisted(&self) -> bool {
        !self.store.lock().await.is_dirty()
    }

    /// Flip the completion of a course.
    ///
    /// A completed course can always be toggled off; dependents that lose a
    /// prerequisite are demoted. An incomplete course can only be toggled on
    /// when it is unlocked.
    pub async fn toggle(&self, id: &str) -> Result<CourseStates> {
        let mut store = self.store.lock().await;
        let course = self.graph.course(id)?;

        let write_error = if store.is_completed(id) {
            info!("Marking {} incomplete", course.id);
            store.mark_incomplete(id).await.err()
        } else {
            let missing = missing_prerequisites(&self.graph, id, store.snapshot())?;
            if !missing.is_empty() {
                debug!("Refusing to complete locked course {}: missing {:?}", course.id, missing);
                return Err(EngineError::LockedCourse {
                    course: course.id.clone(),
                    missing,
                });
            }
            info!("Marking {} completed", course.id);
            store.mark_completed(id).await.err()
        };

        let write_error = enforce(&self.graph, &mut store).await.after_write(write_error);
        self.finish(&store, write_error, true)
    }

    /// Clear all progress.
    pub async fn reset(&self) -> Result<CourseStates> {
        let mut store = self.store.lock().await;
        info!("Resetting progress");

        let write_error = store.clear_all().await.err();
        self.finish(&store, write_error, true)
    }

    /// Reload progress from storage and restore consistency.
    ///
    /// Used at startup and whenever storage may have changed underneath the
    /// engine. A read failure leaves the current state untouched.
    pub async fn refresh(&self) -> Result<CourseStates> {
        let mut store = self.store.lock().await;
        store.reload().await.map_err(EngineError::Load)?;

        let unknown = store.set_aside(|id| self.graph.contains(id));
        let mut write_error = None;
        if !unknown.is_empty() {
            debug!("Ignoring {} persisted course(s) not in the curriculum: {:?}", unknown.len(), unknown);
            if self.config.prune_unknown && store.forget_foreign() {
                info!("Pruning {} unknown course(s) from storage", unknown.len());
                write_error = store.persist().await.err();
            }
        }

        let write_error = enforce(&self.graph, &mut store).await.after_write(write_error);
        info!("Refreshed progress: {} completed", store.snapshot().len());
        self.finish(&store, write_error, self.config.notify_on_refresh)
    }

    /// Write the in-memory progress to storage again, after a
    /// [`EngineError::Persistence`].
    pub async fn persist(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        let write_error = store.persist().await.err();
        self.finish(&store, write_error, false).map(|_| ())
    }

    fn finish(
        &self,
        store: &CompletionStore,
        write_error: Option<StorageError>,
        notify: bool,
    ) -> Result<CourseStates> {
        let states = CourseStates::evaluate(&self.graph, store.snapshot());

        if notify {
            for observer in &self.observers {
                observer.on_update(&states);
            }
        }

        match write_error {
            None => Ok(states),
            Some(source) => Err(EngineError::Persistence { source, states }),
        }
    }
}

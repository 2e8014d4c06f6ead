//! Storage trait abstraction.

use async_trait::async_trait;
use malla_core::CompletionSet;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Marker value stored for a completed course.
pub const COMPLETED_MARKER: &str = "completed";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Durable home of the completion set.
///
/// The persisted layout is a key/value mapping from course id to
/// [`COMPLETED_MARKER`]; presence means completed. Every save replaces
/// the whole mapping.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the persisted completion set. Missing state loads as empty.
    async fn load_completed(&self) -> Result<CompletionSet>;

    /// Replace the persisted completion set.
    async fn save_completed(&mut self, completed: &CompletionSet) -> Result<()>;

    /// Remove all persisted progress.
    async fn clear(&mut self) -> Result<()>;
}

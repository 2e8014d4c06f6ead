//! JSON file storage implementation.
//!
//! Stores the completion set as a flat JSON object in `progress.json`
//! (`{"MAT101": "completed", ...}`) and keeps a small meta marker
//! (version + updated_at) next to it under `meta/`.

use std::path::{Path, PathBuf};
use malla_core::{CompletionSet, CourseId};
use super::{Storage, Result, COMPLETED_MARKER};
use tokio::fs;
use tracing::{debug, warn};

const PROGRESS_FILE: &str = "progress.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory layout.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn progress_path(&self) -> PathBuf {
        self.root.join(PROGRESS_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join("meta").join("progress.meta.json")
    }

    /// Current meta version, 0 if never written.
    pub async fn version(&self) -> u64 {
        match fs::read_to_string(self.meta_path()).await {
            Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
                .ok()
                .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
                .unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Read and increment the meta version, return the new version.
    async fn bump_version(&self) -> Result<u64> {
        let version = self.version().await + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_completed(&self) -> Result<CompletionSet> {
        let json = match fs::read_to_string(self.progress_path()).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CompletionSet::new()),
            Err(e) => return Err(e.into()),
        };

        let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&json)?;
        let mut completed = CompletionSet::new();
        for (id, marker) in entries {
            match completed_marker(&marker) {
                Some(true) => {
                    completed.insert(CourseId::new(id));
                }
                Some(false) => {}
                None => warn!("Ignoring unrecognized marker for {}: {}", id, marker),
            }
        }

        debug!("Loaded {} completed courses from {}", completed.len(), self.root.display());
        Ok(completed)
    }

    async fn save_completed(&mut self, completed: &CompletionSet) -> Result<()> {
        let entries: serde_json::Map<String, serde_json::Value> = completed
            .iter()
            .map(|id| (id.to_string(), serde_json::Value::from(COMPLETED_MARKER)))
            .collect();
        let json = serde_json::to_string_pretty(&entries)?;

        // Write beside the map, then rename over it.
        let tmp = self.root.join(format!("{}.tmp", PROGRESS_FILE));
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, self.progress_path()).await?;

        let version = self.bump_version().await?;
        debug!("Saved {} completed courses (version {})", completed.len(), version);
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        fs::remove_file(self.progress_path()).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;

        let version = self.bump_version().await?;
        debug!("Cleared progress (version {})", version);
        Ok(())
    }
}

/// `"completed"` and `true` both mean completed; `false` means not.
fn completed_marker(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::String(s) if s == COMPLETED_MARKER => Some(true),
        serde_json::Value::Bool(b) => Some(*b),
        _ => None,
    }
}

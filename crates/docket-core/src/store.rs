//! Local demand persistence.
//!
//! Demands live in a single JSON document at `.docket/demands.json`. The
//! store is the interface the board asks for the initial collection and
//! hands the updated collection back to; all mutation happens in memory
//! between `load` and `save`. Saves go through a temp file and rename so a
//! crash mid-write cannot truncate the store.
//!
//! Older records may carry the legacy `"completed"` status value; it is
//! normalized to `finalized` during deserialization and never written back.

use crate::error::StoreError;
use crate::model::demand::Demand;
use std::path::{Path, PathBuf};

/// Name of the project data directory.
pub const DOCKET_DIR: &str = ".docket";

const DEMANDS_FILE: &str = "demands.json";

/// Find the `.docket` directory by walking up from `start`.
#[must_use]
pub fn find_docket_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DOCKET_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Handle on one project's demand store.
#[derive(Debug, Clone)]
pub struct DemandStore {
    docket_dir: PathBuf,
}

impl DemandStore {
    /// Open the store for the project containing `start`, walking up the
    /// directory tree to find `.docket`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotInitialized`] when no `.docket` directory exists on
    /// the path from `start` to the filesystem root.
    pub fn open(start: &Path) -> Result<Self, StoreError> {
        find_docket_dir(start)
            .map(|docket_dir| Self { docket_dir })
            .ok_or_else(|| StoreError::NotInitialized {
                search_root: start.to_path_buf(),
            })
    }

    /// Create the `.docket` directory and an empty store under
    /// `project_root`. Idempotent: an existing store is left untouched.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] when the directory or the store file cannot be
    /// created.
    pub fn init(project_root: &Path) -> Result<Self, StoreError> {
        let docket_dir = project_root.join(DOCKET_DIR);
        std::fs::create_dir_all(&docket_dir).map_err(|source| StoreError::Io {
            path: docket_dir.clone(),
            source,
        })?;

        let store = Self { docket_dir };
        if !store.demands_path().exists() {
            store.save(&[])?;
        }
        Ok(store)
    }

    /// Directory this store lives in.
    #[must_use]
    pub fn docket_dir(&self) -> &Path {
        &self.docket_dir
    }

    /// Path of the demand document.
    #[must_use]
    pub fn demands_path(&self) -> PathBuf {
        self.docket_dir.join(DEMANDS_FILE)
    }

    /// Load the full demand collection. A missing file reads as empty.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on read failure, [`StoreError::Corrupt`] when the
    /// document is not valid demand JSON.
    pub fn load(&self) -> Result<Vec<Demand>, StoreError> {
        let path = self.demands_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let demands: Vec<Demand> =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(count = demands.len(), path = %path.display(), "loaded demands");
        Ok(demands)
    }

    /// Replace the stored collection.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] when serialization output cannot be written or the
    /// temp file cannot be renamed into place.
    pub fn save(&self, demands: &[Demand]) -> Result<(), StoreError> {
        let path = self.demands_path();
        let content = serde_json::to_string_pretty(demands).map_err(|source| {
            StoreError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;

        let tmp_path = self.docket_dir.join(format!("{DEMANDS_FILE}.tmp"));
        std::fs::write(&tmp_path, content).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(count = demands.len(), path = %path.display(), "saved demands");
        Ok(())
    }
}

//! Deletion of remote files with confirmation gating, per-path progress and
//! resynchronization after every mutation.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use snafu::Snafu;

use crate::prompt::UserPrompt;
use crate::storage::{FileEntry, StorageClient, StorageError};

mod status;

pub use status::DeletionStatus;
use status::StatusTracker;


#[derive(Debug, Snafu)]
pub enum CoordinatorError {
    #[snafu(display("Could not load the file listing"))]
    StorageUnavailable { source: StorageError },

    #[snafu(display("Failed to delete {path}"))]
    DeletionFailed { path: String, source: StorageError },

    #[snafu(display("Wipe incomplete: {report}"))]
    PartialFailure { report: WipeReport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    AlreadyDeleting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WipeOutcome {
    Wiped(WipeReport),
    Declined,
    AlreadyDeleting,
    NothingToDelete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub path: String,
    pub reason: String,
}

/// What a wipe sweep did. Files already deleted stay deleted when others fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WipeReport {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
    pub flush_error: Option<String>,
}

impl WipeReport {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.flush_error.is_none()
    }
}

impl Display for WipeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "deleted {} of {} files", self.deleted.len(), self.attempted())?;
        for failure in &self.failed {
            write!(f, "; {}: {}", failure.path, failure.reason)?;
        }
        if let Some(reason) = &self.flush_error {
            write!(f, "; clearing stored keys failed: {}", reason)?;
        }
        Ok(())
    }
}

/// Point-in-time view of the coordinator for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorSnapshot {
    pub listing: Vec<FileEntry>,
    pub status: DeletionStatus,
}

impl CoordinatorSnapshot {
    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }
}

pub struct DeletionCoordinator<S, P> {
    storage: S,
    prompt: P,
    root: String,
    listing: Mutex<Vec<FileEntry>>,
    status: StatusTracker,
}

impl<S: StorageClient, P: UserPrompt> DeletionCoordinator<S, P> {
    pub fn new(storage: S, prompt: P, root: impl Into<String>) -> Self {
        DeletionCoordinator {
            storage,
            prompt,
            root: root.into(),
            listing: Mutex::new(Vec::new()),
            status: StatusTracker::default(),
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    fn lock_listing(&self) -> MutexGuard<'_, Vec<FileEntry>> {
        self.listing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn listing(&self) -> Vec<FileEntry> {
        self.lock_listing().clone()
    }

    pub fn status(&self) -> DeletionStatus {
        self.status.snapshot()
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            listing: self.listing(),
            status: self.status(),
        }
    }

    /// Replaces the listing with the storage's current directory contents.
    /// On failure the previous listing is kept.
    pub async fn load_listing(&self) -> Result<Vec<FileEntry>, CoordinatorError> {
        match self.storage.read_directory(&self.root).await {
            Ok(entries) => {
                let entries = unique_by_path(entries);
                info!("Loaded {} files from {}", entries.len(), self.root);
                *self.lock_listing() = entries.clone();
                Ok(entries)
            }
            Err(source) => {
                error!("Error loading files from {}: {}", self.root, source);
                Err(CoordinatorError::StorageUnavailable { source })
            }
        }
    }

    async fn reload(&self) {
        if let Err(err) = self.load_listing().await {
            warn!("File listing may be stale: {}", err);
            self.prompt
                .alert("Could not refresh the file list; it may be out of date.");
        }
    }

    fn display_name(&self, path: &str) -> String {
        self.lock_listing()
            .iter()
            .find(|entry| entry.path == path)
            .map_or_else(|| path.to_string(), |entry| entry.name.clone())
    }

    /// Deletes one file and its stored key after confirmation.
    pub async fn delete_one(&self, path: &str) -> Result<DeleteOutcome, CoordinatorError> {
        if self.status.blocks(path) {
            debug!("Deletion of {} already in progress", path);
            return Ok(DeleteOutcome::AlreadyDeleting);
        }

        let prompt = format!("Delete {}?", self.display_name(path));
        if !self.prompt.confirm(&prompt) {
            info!("Deletion of {} declined", path);
            return Ok(DeleteOutcome::Declined);
        }

        let Some(in_flight) = self.status.begin_one(path) else {
            return Ok(DeleteOutcome::AlreadyDeleting);
        };

        debug!("Deleting {}", path);
        let file_result = self.storage.delete_file(path).await;
        let key_result = self.storage.delete_key(path).await;
        drop(in_flight);

        let failure = match (file_result, key_result) {
            (Ok(()), Ok(())) => None,
            (Err(file_err), Err(key_err)) => {
                error!("Error deleting key {}: {}", path, key_err);
                Some(file_err)
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Some(err),
        };
        if let Some(source) = failure {
            error!("Error deleting file {}: {}", path, source);
            self.prompt.alert("Failed to delete the file.");
            return Err(CoordinatorError::DeletionFailed {
                path: path.to_string(),
                source,
            });
        }

        self.lock_listing().retain(|entry| entry.path != path);
        info!("Deleted {}", path);
        self.reload().await;

        Ok(DeleteOutcome::Deleted)
    }

    /// Deletes every listed file one after another, then clears all stored
    /// keys and reloads. Individual failures do not stop the sweep.
    pub async fn delete_all(&self) -> Result<WipeOutcome, CoordinatorError> {
        if self.lock_listing().is_empty() {
            return Ok(WipeOutcome::NothingToDelete);
        }
        if self.status.is_busy() {
            debug!("Refusing to wipe while deletions are in flight");
            return Ok(WipeOutcome::AlreadyDeleting);
        }

        if !self
            .prompt
            .confirm("Are you sure you want to delete ALL files?")
        {
            info!("Wipe declined");
            return Ok(WipeOutcome::Declined);
        }

        let paths: Vec<String> = self
            .lock_listing()
            .iter()
            .map(|entry| entry.path.clone())
            .collect();
        let Some(in_flight) = self.status.begin_bulk(&paths) else {
            return Ok(WipeOutcome::AlreadyDeleting);
        };

        let mut report = WipeReport::default();
        for path in paths {
            debug!("Deleting {}", path);
            match self.storage.delete_file(&path).await {
                Ok(()) => report.deleted.push(path),
                Err(err) => {
                    error!("Error deleting file {}: {}", path, err);
                    report.failed.push(FailedDeletion {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if let Err(err) = self.storage.flush_all_keys().await {
            error!("Error clearing stored keys: {}", err);
            report.flush_error = Some(err.to_string());
        }

        self.lock_listing()
            .retain(|entry| !report.deleted.contains(&entry.path));
        self.reload().await;
        drop(in_flight);

        if report.is_complete() {
            info!("Wiped {} files", report.deleted.len());
            Ok(WipeOutcome::Wiped(report))
        } else {
            self.prompt
                .alert(&format!("Wipe did not complete: {}", report));
            Err(CoordinatorError::PartialFailure { report })
        }
    }
}

fn unique_by_path(entries: Vec<FileEntry>) -> Vec<FileEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let fresh = seen.insert(entry.path.clone());
            if !fresh {
                warn!("Ignoring duplicate listing entry for {}", entry.path);
            }
            fresh
        })
        .collect()
}

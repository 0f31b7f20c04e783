use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Paths with a deletion in flight, plus whether a wipe currently owns them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionStatus {
    paths: BTreeSet<String>,
    bulk: bool,
}

impl DeletionStatus {
    pub fn is_deleting(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn is_wiping(&self) -> bool {
        self.bulk
    }

    pub fn is_busy(&self) -> bool {
        self.bulk || !self.paths.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_busy()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Owns the [`DeletionStatus`] and hands out [`InFlight`] markers. Checking
/// and marking happen under one lock so a path can never be claimed twice.
#[derive(Debug, Default)]
pub(crate) struct StatusTracker {
    inner: Mutex<DeletionStatus>,
}

impl StatusTracker {
    fn lock(&self) -> MutexGuard<'_, DeletionStatus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> DeletionStatus {
        self.lock().clone()
    }

    /// Whether a new single deletion of `path` would be refused.
    pub fn blocks(&self, path: &str) -> bool {
        let status = self.lock();
        status.bulk || status.paths.contains(path)
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    pub fn begin_one(&self, path: &str) -> Option<InFlight<'_>> {
        let mut status = self.lock();
        if status.bulk || !status.paths.insert(path.to_string()) {
            return None;
        }
        Some(InFlight {
            tracker: self,
            paths: vec![path.to_string()],
            bulk: false,
        })
    }

    /// Claims every path for a wipe. Refused while anything else is in flight.
    pub fn begin_bulk(&self, paths: &[String]) -> Option<InFlight<'_>> {
        let mut status = self.lock();
        if status.is_busy() {
            return None;
        }
        status.bulk = true;
        status.paths.extend(paths.iter().cloned());
        Some(InFlight {
            tracker: self,
            paths: paths.to_vec(),
            bulk: true,
        })
    }
}

/// Deleting markers held for the lifetime of one operation. Dropping it
/// clears them, whatever the outcome.
#[derive(Debug)]
pub(crate) struct InFlight<'a> {
    tracker: &'a StatusTracker,
    paths: Vec<String>,
    bulk: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut status = self.tracker.lock();
        for path in &self.paths {
            status.paths.remove(path);
        }
        if self.bulk {
            status.bulk = false;
        }
    }
}

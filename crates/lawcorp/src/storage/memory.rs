//! In-memory store.

use std::sync::{Arc, RwLock};

use super::{Changeset, CommitReceipt, FirmData, FirmStore, Snapshot};
use crate::error::Result;

/// Holds the firm data behind a lock. Commits clone the current state,
/// apply to the clone and publish it only if every change succeeded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: RwLock<Arc<FirmData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing data, e.g. a fixture or an exported file.
    pub fn with_data(data: FirmData) -> Self {
        Self {
            current: RwLock::new(Arc::new(data)),
        }
    }
}

impl FirmStore for MemoryStore {
    fn snapshot(&self) -> Snapshot {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn commit(&self, changeset: Changeset) -> Result<CommitReceipt> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let mut next = FirmData::clone(&guard);
        let receipt = next.apply(changeset, crate::time::now()).map_err(|e| {
            log::debug!("commit rejected: {e}");
            e
        })?;
        *guard = Arc::new(next);
        Ok(receipt)
    }
}

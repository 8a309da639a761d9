//! Single-file JSON store.
//!
//! The whole firm data set lives in one file:
//! ```json
//! {
//!     "version": 1,
//!     "firm": { ... FirmData ... }
//! }
//! ```
//! Commits write the new state to `<path>.tmp` and rename it over the
//! original before publishing it to readers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use super::{Changeset, CommitReceipt, FirmData, FirmStore, Snapshot};
use crate::error::{FirmError, Result};

// ── File format ──────────────────────────────────────────────────────────────

const STORE_FILE_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    firm: &'a FirmData,
}

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    firm: FirmData,
}

// ── JsonFileStore ────────────────────────────────────────────────────────────

/// File-backed store. Safe for concurrent use within one process; separate
/// processes writing the same file are not coordinated.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    current: RwLock<Arc<FirmData>>,
    writer: Mutex<()>,
}

impl JsonFileStore {
    /// Create a new, empty store file. Fails if `path` already exists.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Err(FirmError::StorageError(format!(
                "store already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = FirmData::default();
        write_atomic(&path, &data)?;
        Ok(Self::from_parts(path, data))
    }

    /// Open an existing store file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(FirmError::NotFound(format!(
                "store not found: {}",
                path.display()
            )));
        }
        let bytes = std::fs::read(&path)?;
        let file: StoreFile = serde_json::from_slice(&bytes).map_err(|e| {
            FirmError::InvalidFileFormat(format!(
                "failed to parse store file {}: {e}",
                path.display()
            ))
        })?;
        if file.version != STORE_FILE_VERSION {
            return Err(FirmError::InvalidFileFormat(format!(
                "unsupported store version {} in {}",
                file.version,
                path.display()
            )));
        }
        log::debug!(
            "opened store {} ({} people, {} cases)",
            path.display(),
            file.firm.people.len(),
            file.firm.cases.len()
        );
        Ok(Self::from_parts(path, file.firm))
    }

    /// Open `path`, creating an empty store if it does not exist.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn from_parts(path: PathBuf, data: FirmData) -> Self {
        Self {
            path,
            current: RwLock::new(Arc::new(data)),
            writer: Mutex::new(()),
        }
    }
}

fn write_atomic(path: &Path, data: &FirmData) -> Result<()> {
    let file = StoreFileRef {
        version: STORE_FILE_VERSION,
        firm: data,
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| FirmError::SerializationError(e.to_string()))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, json.as_bytes())?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl FirmStore for JsonFileStore {
    fn snapshot(&self) -> Snapshot {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn commit(&self, changeset: Changeset) -> Result<CommitReceipt> {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = FirmData::clone(&self.snapshot());
        let receipt = next.apply(changeset, crate::time::now()).map_err(|e| {
            log::debug!("commit rejected: {e}");
            e
        })?;
        write_atomic(&self.path, &next)?;

        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(next);
        Ok(receipt)
    }
}

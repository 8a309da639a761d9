//! Firm storage.
//!
//! Readers take an immutable snapshot; writers submit a [`Changeset`] that
//! is applied atomically against the latest committed state. Two
//! implementations: [`MemoryStore`] and the single-file [`JsonFileStore`].

mod changeset;
mod data;
mod file;
mod memory;

use std::sync::Arc;

pub use changeset::{Change, Changeset, CommitReceipt, Expectation};
pub use data::{FirmData, SubjectMatch};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// A read-committed view of the firm data.
pub type Snapshot = Arc<FirmData>;

/// Storage seam shared by the MCP server, the CLI and tests.
pub trait FirmStore: Send + Sync {
    /// The latest committed state.
    fn snapshot(&self) -> Snapshot;

    /// Apply every write in `changeset` or none of them.
    ///
    /// # Errors
    ///
    /// `FirmError::WriteConflict` when a row-version expectation no longer
    /// holds, `FirmError::InvalidChangeset` when the changeset is empty,
    /// lacks its audit entry or references missing rows, and storage errors
    /// from the backing medium.
    fn commit(&self, changeset: Changeset) -> Result<CommitReceipt>;
}

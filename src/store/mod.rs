//! Attempt storage.
//!
//! # Data Flow
//! ```text
//! LockoutGuard
//!     → AttemptStore::update (atomic read-modify-write per subject)
//!     → AttemptStore::get / delete
//!
//! Housekeeping:
//!     sweeper.rs (interval tick)
//!     → AttemptStore::retain (drop records with no information)
//!     → AttemptStore::flush (snapshot, if the backend persists)
//! ```
//!
//! # Design Decisions
//! - The guard holds no state of its own; everything lives behind this trait
//! - `update` is the only write path the guard needs for failures and must be
//!   atomic with respect to other callers on the same subject
//! - Store failures are surfaced as `StoreError`, never folded into "unlocked"

pub mod memory;
pub mod sweeper;

use thiserror::Error;

use crate::guard::record::AttemptRecord;
use crate::guard::subject::SubjectId;

pub use memory::MemoryStore;
pub use sweeper::EvictionSweeper;

/// Infrastructure failure of the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("attempt store unavailable: {0}")]
    Unavailable(String),
    #[error("attempt store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("attempt store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Capability interface over per-subject attempt records.
pub trait AttemptStore: Send + Sync {
    /// Current record for `subject`, if any.
    fn get(&self, subject: &SubjectId) -> Result<Option<AttemptRecord>, StoreError>;

    /// Atomically replace the record for `subject` with `f(current)`.
    /// Returning `None` removes the record. Returns the stored result.
    fn update(
        &self,
        subject: &SubjectId,
        f: &mut dyn FnMut(Option<AttemptRecord>) -> Option<AttemptRecord>,
    ) -> Result<Option<AttemptRecord>, StoreError>;

    /// Unconditionally store `record`.
    fn set(&self, subject: &SubjectId, record: AttemptRecord) -> Result<(), StoreError>;

    /// Remove the record. Returns whether one existed.
    fn delete(&self, subject: &SubjectId) -> Result<bool, StoreError>;

    /// Keep only records for which `keep` returns true. Returns how many were removed.
    fn retain(
        &self,
        keep: &mut dyn FnMut(&SubjectId, &AttemptRecord) -> bool,
    ) -> Result<usize, StoreError>;

    /// All records, in no particular order.
    fn snapshot(&self) -> Result<Vec<(SubjectId, AttemptRecord)>, StoreError>;

    /// Persist buffered state, for backends that have any.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

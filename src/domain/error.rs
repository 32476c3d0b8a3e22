//! Store-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::id::ItemId;

/// Conditions the strict store API reports.
///
/// The lenient API tolerates all of these: lookups return `None`, mutations
/// become no-ops, orphans get truncated paths.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),

    #[error("item {id} references missing parent {parent}")]
    OrphanedParent { id: ItemId, parent: ItemId },

    #[error("cycle detected in ancestry of: {0}")]
    CycleDetected(ItemId),
}

/// Result type for strict store operations.
pub type StoreResult<T> = Result<T, StoreError>;

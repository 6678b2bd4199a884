//! Error taxonomy for the record store.

use uuid::Uuid;

/// Errors returned by [`RecordStore`](crate::record_store::RecordStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A heading or description was empty after trimming.
    #[error("task {field} cannot be empty")]
    Validation {
        /// Which field failed (`heading` or `description`).
        field: &'static str,
    },

    /// An update targeted an id that is not in the collection.
    #[error("task not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// The persisted slot could not be read or did not parse into valid records.
    #[error("failed to read stored tasks: {0}")]
    StorageRead(String),

    /// The storage port rejected a write.
    #[error("failed to write stored tasks: {0}")]
    StorageWrite(String),
}

impl StoreError {
    pub(crate) fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    /// True for errors the caller caused (bad input or unknown id).
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

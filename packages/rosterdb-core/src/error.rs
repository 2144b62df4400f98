//! Store error types.

use thiserror::Error;

/// Record store operation errors.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Table insert attempted beyond capacity
    #[error("Table '{table}' is full (capacity: {capacity})")]
    CapacityExceeded {
        table: &'static str,
        capacity: usize,
    },

    /// No present record with the requested id
    #[error("No record with id {id} in table '{table}'")]
    NotFound { table: &'static str, id: u64 },

    /// A text line did not match the record grammar
    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },

    /// Attempted to delete a protected account
    #[error("Forbidden operation: {0}")]
    ForbiddenOperation(String),

    /// An account's student reference points to a non-existent student
    #[error("Account {account_id} references a student record that does not exist")]
    DanglingReference { account_id: u64 },

    /// A post-validation operation failed unexpectedly
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// A field value violates the record grammar or data model
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    /// Data corruption detected
    #[error("Data corruption detected: {0}")]
    DataCorruption(String),

    /// Disk full error during persistence
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// I/O error during persistence
    #[error("I/O error: {0}")]
    IoError(String),

    /// Transient I/O error that may succeed on retry
    #[error("Transient I/O error: {0}")]
    TransientIoError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

//! # Storage Error Types
//!
//! Error types for the flat-file storage layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error (file read/write)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds record-level failures on top          │
//! │       │                      (corrupt rows, unsupported operations)     │
//! │       ▼                                                                 │
//! │  CoreError rides along via StoreError::Core so service operations      │
//! │  return one error type to the caller                                   │
//! │                                                                         │
//! │  Nothing here is swallowed except the best-effort association-map      │
//! │  load and the bulk send/receive operations, which degrade and log.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bodega_core::CoreError;

/// Storage layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    ///
    /// ## When This Occurs
    /// - Backing file or directory cannot be created
    /// - Read or write fails mid-operation (a partially written file is an
    ///   accepted risk, not hidden: the error surfaces, the bytes stay)
    #[error("Storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be parsed.
    ///
    /// Only raised by stores that make corruption visible (supplier and
    /// order headers); stores that tolerate corruption skip the row and log
    /// instead.
    #[error("Corrupt record in {file} line {line}: {reason}")]
    Corrupt {
        file: String,
        line: usize,
        reason: String,
    },

    /// The store does not support this operation.
    ///
    /// ## When This Occurs
    /// - `delete` on an append-only store (sales, orders)
    #[error("{store} does not support {operation}")]
    Unsupported {
        store: &'static str,
        operation: &'static str,
    },

    /// A domain rule was violated while servicing the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a Corrupt error for a record that failed to parse.
    pub fn corrupt(file: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Creates an Unsupported error.
    pub const fn unsupported(store: &'static str, operation: &'static str) -> Self {
        StoreError::Unsupported { store, operation }
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

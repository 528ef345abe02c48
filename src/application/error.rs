use thiserror::Error;

use crate::domain::MemoId;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid required input on create.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Well-formed but semantically empty request, e.g. an update that
    /// supplies no fields.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Update targeting an id with no stored row. Delete never reports
    /// this; it is idempotent.
    #[error("Memo not found: {0}")]
    MemoNotFound(MemoId),

    /// Underlying storage unavailable or a statement failed. Not retried.
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

//! Core error handling
//!
//! Almost nothing in this crate is fatal: the store absorbs read failures
//! as absent data and logs write failures. The errors here surface only
//! from the construction paths (configuration, storage backend setup)
//! where the caller genuinely needs to know that nothing durable exists.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced while assembling the tracker
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error")]
    Config(#[from] anyhow::Error),

    #[error("Storage error")]
    Storage(#[from] StorageError),
}

/// Result type alias for core construction paths
pub type CoreResult<T> = Result<T, CoreError>;

//! Workspace error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `MmError` via `From` impls or wrap `MmError` as one variant.  Both patterns
//! are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::{PathId, UnitId};

/// The top-level error type for `mm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum MmError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("path {0} not found")]
    PathNotFound(PathId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `mm-*` crates.
pub type MmResult<T> = Result<T, MmError>;

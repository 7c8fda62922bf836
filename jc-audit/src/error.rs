//! Error types for jc-audit
//!
//! Record-level problems (unresolved owner, unresolved period, duplicates) are
//! not errors: they are expressed through `Status` and diagnostics on the
//! record. `AuditError` covers failures of the run itself and of single files.

use std::path::PathBuf;
use thiserror::Error;

/// Audit engine error type
#[derive(Debug, Error)]
pub enum AuditError {
    /// A journal file could not be read for fingerprinting; only that file is skipped
    #[error("Cannot read file {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Roster file missing or malformed; aborts the run
    #[error("Roster error: {0}")]
    Roster(String),

    /// jc-common error
    #[error("Common error: {0}")]
    Common(#[from] jc_common::Error),
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

//! Error types for tffix-edit.
//!
//! This module defines error types that distinguish between:
//! - Soft failures: the file is left untouched and the run continues
//!   (input that cannot be outlined, patched output that is not valid HCL).
//! - Runtime errors: I/O failures that abort the run.

use camino::Utf8PathBuf;
use tffix_hcl::OutlineError;
use tffix_types::apply::OpStatus;
use thiserror::Error;

/// The top-level error type for tffix-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// The target file could not be outlined; nothing was changed.
    #[error("cannot outline {path}: {source}")]
    Unparseable {
        path: Utf8PathBuf,
        #[source]
        source: OutlineError,
    },

    /// The patched text failed the HCL syntax check; nothing was written.
    #[error("patched {path} is not valid HCL: {message}")]
    InvalidOutput { path: Utf8PathBuf, message: String },

    /// An I/O failure; the run stops here.
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

impl EditError {
    /// The status a soft error is reported with.
    pub fn status(&self) -> OpStatus {
        match self {
            EditError::Unparseable { .. } => OpStatus::Skipped,
            EditError::InvalidOutput { .. } | EditError::Runtime(_) => OpStatus::Failed,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;

// ============================================================================
// vidscan-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for vidscan-core
//
// This module defines the error type surfaced by the core library. Only
// configuration-class errors abort a scan; per-file probe failures are
// recorded in the report as `ProbeErrorKind` values instead (see `probe`).
//
// KEY COMPONENTS:
// - CoreError: enum of every fatal condition the core can report
// - CoreResult: convenience alias

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::resolution::ResolutionError;

/// Errors returned by the core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Configuration errors (fatal, surfaced before scanning) ----
    #[error("Invalid resolution format: {0}")]
    InvalidResolution(#[from] ResolutionError),

    #[error("Invalid comparison type: '{0}'. Must be one of: eq, lte, gte")]
    InvalidComparison(String),

    #[error("Source directory not found: {}", .0.display())]
    SourceDirNotFound(PathBuf),

    #[error("Source directory '{}' is not readable: {1}", .0.display())]
    SourceDirUnreadable(PathBuf, #[source] io::Error),

    #[error("Source path '{}' is not a directory", .0.display())]
    SourceNotADirectory(PathBuf),

    #[error("Invalid worker count: {0}. Must be at least 1")]
    InvalidWorkerCount(usize),

    #[error("Invalid probe timeout: must be greater than zero")]
    InvalidTimeout,

    #[error("No file extensions configured for discovery")]
    NoExtensions,

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    // ---- Runtime errors ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory traversal error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl CoreError {
    /// Returns true for errors that mean the scan could not be configured.
    ///
    /// No file was probed and no report exists when one of these is returned.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidResolution(_)
                | CoreError::InvalidComparison(_)
                | CoreError::SourceDirNotFound(_)
                | CoreError::SourceDirUnreadable(..)
                | CoreError::SourceNotADirectory(_)
                | CoreError::InvalidWorkerCount(_)
                | CoreError::InvalidTimeout
                | CoreError::NoExtensions
                | CoreError::DependencyNotFound(_)
        )
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

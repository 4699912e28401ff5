// ============================================================================
// vidscan-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type so configuration errors keep their
// classification all the way to the exit status.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: adds context to errors from I/O and serialization
// - Exit status constants

use std::fmt;

use vidscan_core::{CoreError, CoreResult, ScanStatus};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// EXIT STATUS
// ============================================================================

/// Scan completed and every file was processed.
pub const EXIT_SUCCESS: i32 = 0;
/// Configuration error or other fatal failure (such as a report that could
/// not be written).
pub const EXIT_FAILURE: i32 = 1;
/// Scan completed and reports were written, but some files failed.
pub const EXIT_PARTIAL: i32 = 2;
/// Scan was interrupted; a partial report was written.
pub const EXIT_CANCELLED: i32 = 130;

/// Maps the outcome of a finished scan to a process exit status.
pub fn exit_code_for(status: ScanStatus) -> i32 {
    match status {
        ScanStatus::Completed => EXIT_SUCCESS,
        ScanStatus::CompletedWithErrors => EXIT_PARTIAL,
        ScanStatus::Cancelled => EXIT_CANCELLED,
    }
}

/// Prefix printed before a fatal error.
pub fn error_label(err: &CoreError) -> &'static str {
    if err.is_configuration_error() {
        "Configuration error:"
    } else {
        "Error:"
    }
}

// ============================================================================
// ERROR CONTEXT
// ============================================================================

/// Wraps I/O and serialization failures with a description of what the CLI
/// was doing when they happened.
pub trait CliErrorContext<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_io_errors() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = result
            .cli_with_context(|| format!("Failed to write {}", "report.txt"))
            .unwrap_err();
        assert!(matches!(&err, CoreError::OperationFailed(msg) if msg.starts_with("Failed to write report.txt: ")));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_error_label_separates_configuration_errors() {
        assert_eq!(error_label(&CoreError::InvalidWorkerCount(0)), "Configuration error:");
        assert_eq!(error_label(&CoreError::OperationFailed("disk full".into())), "Error:");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            exit_code_for(ScanStatus::Completed),
            exit_code_for(ScanStatus::CompletedWithErrors),
            exit_code_for(ScanStatus::Cancelled),
            EXIT_FAILURE,
        ];
        assert_eq!(codes, [0, 2, 130, 1]);
    }
}

//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// `scan`: walk a directory tree, match every video and write the reports.
pub mod scan;

/// `probe`: print the dimensions of a single file.
pub mod probe;

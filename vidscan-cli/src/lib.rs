// vidscan-cli/src/lib.rs
//
// Library portion of the vidscan CLI application.
// Contains argument definitions, command logic and report writers.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ProbeArgs, ScanArgs};
pub use commands::probe::run_probe_command;
pub use commands::scan::run_scan_command;

// vidscan-cli/src/main.rs
//
// Entry point for the vidscan binary.
//
// Responsibilities:
// - Parsing arguments (flags merged with environment variables by clap).
// - Setting up console logging and, for scans, a run log in the log directory.
// - Dispatching to the command implementations.
// - Mapping the outcome to the process exit status.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use console::style;

use vidscan_cli::error::{EXIT_FAILURE, EXIT_SUCCESS, error_label, exit_code_for};
use vidscan_cli::logging::{self, LOG_LEVEL_ENV, get_timestamp};
use vidscan_cli::{Cli, Commands, run_probe_command, run_scan_command};

fn run_log_path(cli: &Cli, timestamp: &str) -> Option<PathBuf> {
    match &cli.command {
        Commands::Scan(args) => {
            fs::create_dir_all(&args.log_dir).ok()?;
            Some(args.log_dir.join(format!("vidscan_run_{}.log", timestamp)))
        }
        Commands::Probe(_) => None,
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Usage errors share the configuration-error status.
            process::exit(if e.use_stderr() { EXIT_FAILURE } else { EXIT_SUCCESS });
        }
    };

    let level = logging::resolve_level(cli.verbose, env::var(LOG_LEVEL_ENV).ok().as_deref());
    let timestamp = get_timestamp();
    let log_file = run_log_path(&cli, &timestamp);
    if let Err(e) = logging::init(level, log_file.as_deref()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
    if let Some(path) = &log_file {
        log::debug!("Run log: {}", path.display());
    }

    let result = match &cli.command {
        Commands::Scan(args) => run_scan_command(args, &timestamp).map(exit_code_for),
        Commands::Probe(args) => run_probe_command(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", style(error_label(&e)).red().bold(), e);
            process::exit(EXIT_FAILURE);
        }
    }
}

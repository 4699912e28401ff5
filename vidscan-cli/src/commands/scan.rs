// ============================================================================
// vidscan-cli/src/commands/scan.rs
// ============================================================================
//
// SCAN COMMAND: resolve arguments, run the scan, write the reports
//
// Configuration is resolved once here (flags and environment variables are
// already merged by clap) into an immutable ScanConfig. Everything that can
// be checked before scanning is checked before ffprobe is touched, so a bad
// argument fails fast with a configuration error.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use vidscan_core::config::ScanConfigBuilder;
use vidscan_core::external::{FfprobeInspector, check_dependency};
use vidscan_core::{CancellationToken, ScanConfig, ScanStatus, format_bytes, run_scan};

use crate::cli::ScanArgs;
use crate::error::CliResult;
use crate::output::write_reports;
use crate::progress::TerminalReporter;

/// Builds and validates the scan configuration from parsed arguments.
pub fn build_config(args: &ScanArgs) -> CliResult<ScanConfig> {
    let mut builder = ScanConfigBuilder::new()
        .source_dir(&args.src_dir)
        .resolution(&args.resolution)
        .comparison(args.comparison.as_str());
    if let Some(workers) = args.max_workers {
        builder = builder.worker_count(workers);
    }
    if let Some(seconds) = args.timeout {
        builder = builder.probe_timeout(Duration::from_secs(seconds));
    }
    for ext in &args.extensions {
        builder = builder.extension(ext);
    }

    let config = builder.build()?;
    config.validate_source_dir()?;
    Ok(config)
}

/// Installs a Ctrl-C handler that trips `token`.
fn install_interrupt_handler(token: &CancellationToken) {
    let token = token.clone();
    let result = ctrlc::set_handler(move || {
        if token.is_cancelled() {
            warn!("Already cancelling; waiting for in-flight probes and writing partial report");
        } else {
            warn!("Interrupt received; stopping after in-flight probes");
            token.cancel();
        }
    });
    if let Err(e) = result {
        warn!("Could not install Ctrl-C handler, cancellation unavailable: {}", e);
    }
}

/// Runs the `scan` command and returns the outcome used for the exit status.
pub fn run_scan_command(args: &ScanArgs, timestamp: &str) -> CliResult<ScanStatus> {
    let config = build_config(args)?;
    let ffprobe = args.ffprobe.to_string_lossy();
    check_dependency(&ffprobe)?;

    info!("Starting video scan in {}", config.source_dir.display());
    info!(
        "Workers: {}, probe timeout: {}s, extensions: {}",
        config.worker_count,
        config.probe_timeout.as_secs(),
        config.extensions.join(", ")
    );

    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel);

    let reporter = TerminalReporter::new(!args.no_progress);
    let inspector = Arc::new(FfprobeInspector::new(&args.ffprobe));
    let report = run_scan(&config, inspector, &cancel, &reporter)?;
    drop(reporter);

    let paths = write_reports(&report, &args.log_dir, timestamp)?;
    info!(
        "Results written to {} and {}",
        paths.text.display(),
        paths.json.display()
    );
    info!("Total files: {}", report.total_files);
    info!("Processed: {}", report.processed_count);
    info!("Errors: {}", report.error_count);
    info!(
        "Matching videos found: {} ({})",
        report.matched_count,
        format_bytes(report.matches.iter().map(|m| m.size_bytes).sum())
    );

    Ok(report.status())
}

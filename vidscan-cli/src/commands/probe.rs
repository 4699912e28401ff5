//! `probe` command: inspect a single file.

use std::sync::Arc;
use std::time::Duration;

use console::style;
use vidscan_core::config::DEFAULT_PROBE_TIMEOUT_SECS;
use vidscan_core::external::{FfprobeInspector, check_dependency};
use vidscan_core::{ComparisonMode, ProbeResult, Prober, ResolutionSpec, format_bytes, matches};

use crate::cli::ProbeArgs;
use crate::error::{CliResult, EXIT_PARTIAL, EXIT_SUCCESS};

/// Probes `args.file` and prints its dimensions or the classified failure.
///
/// Returns the exit status: success, or [`EXIT_PARTIAL`] when the probe failed.
pub fn run_probe_command(args: &ProbeArgs) -> CliResult<i32> {
    let criteria = match &args.resolution {
        Some(resolution) => Some((
            ResolutionSpec::parse(resolution)?,
            args.comparison.parse::<ComparisonMode>()?,
        )),
        None => None,
    };
    let timeout = Duration::from_secs(args.timeout.unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS).max(1));

    check_dependency(&args.ffprobe.to_string_lossy())?;
    let prober = Prober::new(Arc::new(FfprobeInspector::new(&args.ffprobe)), timeout);

    match prober.probe(&args.file) {
        ProbeResult::Success { path, dimensions, size_bytes } => {
            println!("{}: {} ({})", path.display(), dimensions, format_bytes(size_bytes));
            if let Some((spec, mode)) = criteria {
                let verdict = if matches(dimensions, &spec, mode) {
                    style("yes").green()
                } else {
                    style("no").red()
                };
                println!("Matches {} {}: {}", mode.symbol(), spec, verdict);
            }
            Ok(EXIT_SUCCESS)
        }
        ProbeResult::Failure { path, kind, message } => {
            eprintln!("{}: {}: {}", path.display(), style(kind).yellow(), message);
            Ok(EXIT_PARTIAL)
        }
    }
}

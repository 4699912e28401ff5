// ============================================================================
// vidscan-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatch for Console and Run Log
//
// Console lines go to stderr (routed around an active progress bar) with a
// coloured level; the optional run log file gets the same lines uncoloured.
//
// KEY COMPONENTS:
// - init: installs the global logger
// - resolve_level: --verbose and VIDSCAN_LOG_LEVEL handling
// - get_timestamp: file-name timestamps shared with the report writer

use std::path::Path;
use std::str::FromStr;

use console::style;
use log::{Level, LevelFilter};

use crate::progress;

/// Environment variable that overrides the log level (e.g. `debug`, `warn`).
pub const LOG_LEVEL_ENV: &str = "VIDSCAN_LOG_LEVEL";

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// Used for report and run-log file names, e.g. `video_scan_eq_360p_20240601_123045.txt`.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Picks the level: `VIDSCAN_LOG_LEVEL` wins when valid, then `--verbose`.
pub fn resolve_level(verbose: bool, env_value: Option<&str>) -> LevelFilter {
    if let Some(level) = env_value.and_then(|v| LevelFilter::from_str(v.trim()).ok()) {
        return level;
    }
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}

fn level_label(level: Level) -> String {
    let label = level.to_string();
    match level {
        Level::Error => style(label).red().bold().to_string(),
        Level::Warn => style(label).yellow().to_string(),
        Level::Info => style(label).green().to_string(),
        Level::Debug => style(label).blue().to_string(),
        Level::Trace => style(label).magenta().to_string(),
    }
}

fn timestamp() -> impl std::fmt::Display {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
}

/// Installs the global logger.
///
/// When `log_file` is given, every line is also appended to it.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                timestamp(),
                level_label(record.level()),
                message
            ))
        })
        .chain(fern::Output::call(|record| {
            progress::print_line(&record.args().to_string());
        }));

    let mut dispatch = fern::Dispatch::new().level(level).chain(console);

    if let Some(path) = log_file {
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("{} - {} - {}", timestamp(), record.level(), message))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    log::debug!("Logger initialized with level: {}", level);
    Ok(())
}

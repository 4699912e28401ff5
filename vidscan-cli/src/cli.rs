// vidscan-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidscan: find videos by pixel resolution",
    long_about = "Recursively scans a directory for video files, probes each one with ffprobe \
                  and reports the files whose resolution matches the given criteria."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scans a directory tree and writes text and JSON reports
    Scan(ScanArgs),
    /// Probes a single file and prints its dimensions
    Probe(ProbeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Target resolution: HEIGHT, HEIGHTp (e.g. 360p) or WIDTHxHEIGHT (e.g. 1920x1080)
    #[arg(short, long, env = "RESOLUTION", default_value = "360p")]
    pub resolution: String,

    /// Comparison against the target: eq, lte or gte
    #[arg(short, long, env = "COMPARISON", default_value = "eq")]
    pub comparison: String,

    /// Directory to scan recursively
    #[arg(short, long = "src-dir", env = "SRC_DIR", default_value = "/src", value_name = "DIR")]
    pub src_dir: PathBuf,

    /// Directory where report files are written (created if missing)
    #[arg(short, long = "log-dir", env = "LOG_DIR", default_value = "/log", value_name = "DIR")]
    pub log_dir: PathBuf,

    /// Number of parallel workers (default: CPU count, capped at 8)
    #[arg(short = 'w', long = "max-workers", env = "MAX_WORKERS", value_name = "COUNT")]
    pub max_workers: Option<usize>,

    /// Per-file probe timeout in seconds (default: 30)
    #[arg(long, env = "PROBE_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// ffprobe binary to run
    #[arg(long, env = "FFPROBE_PATH", default_value = "ffprobe", value_name = "PATH")]
    pub ffprobe: PathBuf,

    /// File extension to scan; repeat for several (default: mp4)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Video file to inspect
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Also report whether the file matches this resolution
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Comparison used with --resolution: eq, lte or gte
    #[arg(short, long, default_value = "eq")]
    pub comparison: String,

    /// Probe timeout in seconds (default: 30)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// ffprobe binary to run
    #[arg(long, env = "FFPROBE_PATH", default_value = "ffprobe", value_name = "PATH")]
    pub ffprobe: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::try_parse_from([
            "vidscan", "scan", "-r", "1920x1080", "-c", "gte", "-s", "/media", "-l", "/tmp/out",
            "-w", "3", "--timeout", "12", "--extension", "mp4", "--extension", "mkv", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan command");
        };
        assert_eq!(args.resolution, "1920x1080");
        assert_eq!(args.comparison, "gte");
        assert_eq!(args.src_dir, PathBuf::from("/media"));
        assert_eq!(args.log_dir, PathBuf::from("/tmp/out"));
        assert_eq!(args.max_workers, Some(3));
        assert_eq!(args.timeout, Some(12));
        assert_eq!(args.extensions, vec!["mp4", "mkv"]);
    }

    #[test]
    fn test_probe_requires_file() {
        assert!(Cli::try_parse_from(["vidscan", "probe"]).is_err());
        let cli = Cli::try_parse_from(["vidscan", "probe", "clip.mp4", "-r", "720p"]).unwrap();
        let Commands::Probe(args) = cli.command else {
            panic!("expected probe command");
        };
        assert_eq!(args.file, PathBuf::from("clip.mp4"));
        assert_eq!(args.resolution.as_deref(), Some("720p"));
    }
}

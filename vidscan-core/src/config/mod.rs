//! Configuration structures and constants for the vidscan-core library.
//!
//! A [`ScanConfig`] is resolved once at the application boundary (CLI flags,
//! environment variables) and passed read-only into [`crate::run_scan`].
//! Nothing inside the core reads the environment.

mod builder;

use std::path::PathBuf;
use std::time::Duration;

pub use builder::{ComparisonInput, ScanConfigBuilder};

use crate::error::{CoreError, CoreResult};
use crate::matcher::ComparisonMode;
use crate::resolution::ResolutionSpec;

// Default constants

/// Default target resolution.
pub const DEFAULT_RESOLUTION: &str = "360p";

/// Default source directory (container mount point).
pub const DEFAULT_SOURCE_DIR: &str = "/src";

/// Upper bound on the automatically chosen worker count.
/// Probing is dominated by I/O and subprocess startup, so more workers than
/// this rarely helps on a single disk.
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Default per-file probe timeout in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4"];

/// Returns the default worker count: logical CPUs, capped at [`MAX_DEFAULT_WORKERS`].
#[must_use]
pub fn default_worker_count() -> usize {
    num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS)
}

/// Immutable parameters for one scan.
///
/// # Examples
///
/// ```rust
/// use vidscan_core::config::ScanConfigBuilder;
/// use vidscan_core::ComparisonMode;
///
/// let config = ScanConfigBuilder::new()
///     .source_dir("/media/videos")
///     .resolution("1920x1080")
///     .comparison(ComparisonMode::GreaterOrEqual)
///     .worker_count(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.worker_count, 4);
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the directory tree to scan
    pub source_dir: PathBuf,

    /// Target resolution
    pub spec: ResolutionSpec,

    /// Comparison rule applied against `spec`
    pub comparison: ComparisonMode,

    /// Number of pool workers (fixed for the run)
    pub worker_count: usize,

    /// Upper bound on a single file's inspection
    pub probe_timeout: Duration,

    /// Lowercase file extensions (without the dot) that identify candidate videos
    pub extensions: Vec<String>,
}

impl ScanConfig {
    /// Creates a configuration with default worker count, timeout and extensions.
    pub fn new(source_dir: PathBuf, spec: ResolutionSpec, comparison: ComparisonMode) -> Self {
        Self {
            source_dir,
            spec,
            comparison,
            worker_count: default_worker_count(),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }

    /// Checks the values that do not touch the filesystem.
    pub fn validate(&self) -> CoreResult<()> {
        if self.worker_count == 0 {
            return Err(CoreError::InvalidWorkerCount(self.worker_count));
        }
        if self.probe_timeout.is_zero() {
            return Err(CoreError::InvalidTimeout);
        }
        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(CoreError::NoExtensions);
        }
        Ok(())
    }

    /// Checks that `source_dir` exists, is a directory and can be listed.
    pub fn validate_source_dir(&self) -> CoreResult<()> {
        let metadata = match std::fs::metadata(&self.source_dir) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::SourceDirNotFound(self.source_dir.clone()));
            }
            Err(e) => return Err(CoreError::SourceDirUnreadable(self.source_dir.clone(), e)),
        };
        if !metadata.is_dir() {
            return Err(CoreError::SourceNotADirectory(self.source_dir.clone()));
        }
        std::fs::read_dir(&self.source_dir)
            .map_err(|e| CoreError::SourceDirUnreadable(self.source_dir.clone(), e))?;
        Ok(())
    }
}

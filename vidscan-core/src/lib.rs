//! Core library for finding video files by pixel resolution.
//!
//! This crate parses resolution targets, probes files for their frame size
//! through ffprobe (or any [`external::MediaInspector`]), matches them in a
//! bounded worker pool and aggregates a deterministic [`ScanReport`].
//! Rendering the report to files is left to the caller.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidscan_core::config::ScanConfigBuilder;
//! use vidscan_core::external::{FfprobeInspector, check_dependency};
//! use vidscan_core::reporting::NullReporter;
//! use vidscan_core::{CancellationToken, ComparisonMode, run_scan};
//!
//! let config = ScanConfigBuilder::new()
//!     .source_dir("/path/to/videos")
//!     .resolution("1920x1080")
//!     .comparison(ComparisonMode::GreaterOrEqual)
//!     .build()
//!     .unwrap();
//! check_dependency("ffprobe").unwrap();
//!
//! let report = run_scan(
//!     &config,
//!     Arc::new(FfprobeInspector::default()),
//!     &CancellationToken::new(),
//!     &NullReporter,
//! )
//! .unwrap();
//! for m in &report.matches {
//!     println!("{} ({}x{})", m.path.display(), m.width, m.height);
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod matcher;
pub mod probe;
pub mod reporting;
pub mod resolution;
pub mod scan;
pub mod utils;

// Re-exports for public API
pub use config::{ScanConfig, ScanConfigBuilder};
pub use discovery::find_video_files;
pub use error::{CoreError, CoreResult};
pub use matcher::{ComparisonMode, Dimensions, matches};
pub use probe::{ProbeErrorKind, ProbeResult, Prober};
pub use reporting::{ScanReport, ScanStatus};
pub use resolution::{ResolutionError, ResolutionSpec, SpecKind};
pub use scan::{CancellationToken, run_scan};
pub use utils::{format_bytes, format_duration};

// ============================================================================
// vidscan-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ScanConfig
//
// Fluent construction of a ScanConfig from loosely typed inputs (strings
// from flags or environment variables). Parsing and validation happen in
// `build()`, so a config that exists is always usable.
//
// KEY COMPONENTS:
// - ScanConfigBuilder: accumulates settings, falls back to defaults
// - build(): parses the resolution and comparison, then validates

use std::path::PathBuf;
use std::time::Duration;

use super::{DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_RESOLUTION, DEFAULT_SOURCE_DIR, ScanConfig};
use crate::error::CoreResult;
use crate::matcher::ComparisonMode;
use crate::resolution::ResolutionSpec;

/// Builder for [`ScanConfig`].
///
/// Unset fields take the documented defaults: `/src`, `360p`, `eq`,
/// [`super::default_worker_count`] workers, a 30 second timeout and `mp4`.
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    source_dir: Option<PathBuf>,
    resolution: Option<String>,
    comparison: Option<ComparisonInput>,
    worker_count: Option<usize>,
    probe_timeout: Option<Duration>,
    extensions: Vec<String>,
}

/// Comparison setting as given to the builder.
#[derive(Debug, Clone)]
pub enum ComparisonInput {
    Parsed(ComparisonMode),
    Raw(String),
}

impl From<ComparisonMode> for ComparisonInput {
    fn from(mode: ComparisonMode) -> Self {
        ComparisonInput::Parsed(mode)
    }
}

impl From<&str> for ComparisonInput {
    fn from(raw: &str) -> Self {
        ComparisonInput::Raw(raw.to_string())
    }
}

impl From<String> for ComparisonInput {
    fn from(raw: String) -> Self {
        ComparisonInput::Raw(raw)
    }
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Sets the target resolution string, parsed in `build()`.
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Sets the comparison mode, either typed or as `eq`/`lte`/`gte`.
    pub fn comparison(mut self, comparison: impl Into<ComparisonInput>) -> Self {
        self.comparison = Some(comparison.into());
        self
    }

    pub fn worker_count(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers);
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Adds one extension. The first call replaces the default list.
    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        let ext = ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
        if !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
        self
    }

    /// Parses and validates the accumulated settings.
    ///
    /// The source directory is not touched here; see
    /// [`ScanConfig::validate_source_dir`].
    pub fn build(self) -> CoreResult<ScanConfig> {
        let spec = ResolutionSpec::parse(self.resolution.as_deref().unwrap_or(DEFAULT_RESOLUTION))?;
        let comparison = match self.comparison {
            None => ComparisonMode::default(),
            Some(ComparisonInput::Parsed(mode)) => mode,
            Some(ComparisonInput::Raw(raw)) => raw.parse()?,
        };

        let mut config = ScanConfig::new(
            self.source_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            spec,
            comparison,
        );
        if let Some(workers) = self.worker_count {
            config.worker_count = workers;
        }
        config.probe_timeout = self
            .probe_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
        if !self.extensions.is_empty() {
            config.extensions = self.extensions;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_builder_defaults() {
        let config = ScanConfigBuilder::new().build().unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/src"));
        assert_eq!(config.spec, ResolutionSpec::parse("360p").unwrap());
        assert_eq!(config.comparison, ComparisonMode::Equal);
        assert_eq!(config.extensions, vec!["mp4".to_string()]);
    }

    #[test]
    fn test_builder_parses_strings() {
        let config = ScanConfigBuilder::new()
            .resolution("1280x720")
            .comparison("LTE")
            .extension(".MKV")
            .extension("mp4")
            .extension("mkv")
            .build()
            .unwrap();
        assert_eq!(config.spec.width(), Some(1280));
        assert_eq!(config.comparison, ComparisonMode::LessOrEqual);
        assert_eq!(config.extensions, vec!["mkv".to_string(), "mp4".to_string()]);
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let err = ScanConfigBuilder::new().resolution("abc").build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidResolution(_)));
        assert!(err.is_configuration_error());

        let err = ScanConfigBuilder::new().comparison("gt").build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidComparison(_)));

        let err = ScanConfigBuilder::new().worker_count(0).build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidWorkerCount(0)));
    }
}

// ============================================================================
// vidscan-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Media Inspection Backends
//
// This module hides the external media-inspection tool behind the
// `MediaInspector` trait so the scan engine can be driven by ffprobe in
// production and by an in-memory mock in tests.
//
// KEY COMPONENTS:
// - MediaInspector: trait returning the stream list of one file
// - StreamInfo / InspectError: the inspector's output model
// - FfprobeInspector: subprocess-backed implementation
// - MockMediaInspector: scripted implementation for tests
// - check_dependency: verifies an external binary can be launched

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use thiserror::Error;

use crate::error::{CoreError, CoreResult};

pub mod ffprobe_executor;
pub mod mocks;

pub use ffprobe_executor::FfprobeInspector;
pub use mocks::{MockMediaInspector, MockResponse};

/// One stream as reported by the inspection tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    /// `video`, `audio`, `subtitle`, ... when reported
    pub codec_type: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl StreamInfo {
    /// Convenience constructor for a video stream with known dimensions.
    pub fn video(width: i64, height: i64) -> Self {
        Self {
            codec_type: Some("video".to_string()),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Convenience constructor for an audio stream.
    pub fn audio() -> Self {
        Self {
            codec_type: Some("audio".to_string()),
            ..Self::default()
        }
    }

    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }
}

/// Why an inspection produced no stream list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InspectError {
    /// The tool could not open or parse the file, or could not be run.
    #[error("{0}")]
    Unreadable(String),

    /// The tool did not finish within the allowed time.
    #[error("inspection timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

/// Source of stream metadata for a single file.
///
/// Implementations must be callable from many worker threads at once.
/// The timeout is advisory: the prober enforces its own deadline and
/// abandons slow calls, but implementations that spawn processes should
/// stop them when it elapses so nothing outlives the scan.
pub trait MediaInspector: Send + Sync {
    fn inspect(&self, path: &Path, timeout: Duration) -> Result<Vec<StreamInfo>, InspectError>;
}

/// Checks that `cmd_name` can be launched, by running it with `-version`.
///
/// A missing binary maps to [`CoreError::DependencyNotFound`], which is a
/// configuration error.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => {
            if !status.success() {
                log::warn!("'{} -version' exited with {}", cmd_name, status);
            }
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            log::warn!("Dependency '{}' is not executable: {}", cmd_name, e);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_missing_binary() {
        let result = check_dependency("vidscan-definitely-not-a-real-binary");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(name)) if name.contains("vidscan")));
    }

    #[test]
    fn test_stream_info_helpers() {
        assert!(StreamInfo::video(640, 360).is_video());
        assert!(!StreamInfo::audio().is_video());
        assert!(!StreamInfo::default().is_video());
    }
}

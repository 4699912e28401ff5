// ============================================================================
// vidscan-core/src/probe.rs
// ============================================================================
//
// METADATA PROBER: Per-file Dimension Extraction
//
// Turns one candidate path into a ProbeResult. The prober never returns an
// error and never panics past its boundary: every failure of the injected
// MediaInspector is classified into a ProbeErrorKind and carried as data.
//
// KEY COMPONENTS:
// - ProbeErrorKind: failure taxonomy recorded in the report
// - ProbeResult: success with dimensions, or classified failure
// - Prober: enforces the per-file deadline around the inspector call

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use serde::{Deserialize, Serialize};

use crate::external::{InspectError, MediaInspector, StreamInfo};
use crate::matcher::Dimensions;

/// Classification of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeErrorKind {
    /// The file could not be opened or decoded.
    Unreadable,
    /// The container has no video stream.
    NoVideoStream,
    /// Inspection exceeded the per-file bound.
    Timeout,
    /// The video stream's dimensions are absent or non-positive.
    MetadataMissing,
    /// Processing the file crashed unexpectedly.
    WorkerFailure,
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProbeErrorKind::Unreadable => "unreadable",
            ProbeErrorKind::NoVideoStream => "no video stream",
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::MetadataMissing => "metadata missing",
            ProbeErrorKind::WorkerFailure => "worker failure",
        };
        f.write_str(label)
    }
}

/// Outcome of probing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success {
        path: PathBuf,
        dimensions: Dimensions,
        size_bytes: u64,
    },
    Failure {
        path: PathBuf,
        kind: ProbeErrorKind,
        message: String,
    },
}

impl ProbeResult {
    fn failure(path: &Path, kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        ProbeResult::Failure {
            path: path.to_path_buf(),
            kind,
            message: message.into(),
        }
    }
}

/// Probes files through an injected [`MediaInspector`] with a hard deadline.
///
/// The inspector runs on a helper thread and its answer is awaited with
/// `recv_timeout`. On timeout the helper is abandoned and the caller's
/// slot is free again; the helper exits on its own once the inspector
/// returns (the ffprobe inspector kills its child at the same deadline).
#[derive(Clone)]
pub struct Prober {
    inspector: Arc<dyn MediaInspector>,
    timeout: Duration,
}

impl Prober {
    pub fn new(inspector: Arc<dyn MediaInspector>, timeout: Duration) -> Self {
        Self { inspector, timeout }
    }

    /// Probes `path`, classifying every failure.
    pub fn probe(&self, path: &Path) -> ProbeResult {
        let size_bytes = match std::fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                return ProbeResult::failure(
                    path,
                    ProbeErrorKind::Unreadable,
                    format!("cannot read file: {}", e),
                );
            }
        };

        let streams = match self.inspect_with_deadline(path) {
            Ok(streams) => streams,
            Err(failure) => return failure,
        };

        match classify_streams(&streams) {
            Ok(dimensions) => {
                log::debug!("Probed {}: {}", path.display(), dimensions);
                ProbeResult::Success {
                    path: path.to_path_buf(),
                    dimensions,
                    size_bytes,
                }
            }
            Err((kind, message)) => ProbeResult::failure(path, kind, message),
        }
    }

    fn inspect_with_deadline(&self, path: &Path) -> Result<Vec<StreamInfo>, ProbeResult> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inspector = Arc::clone(&self.inspector);
        let owned_path = path.to_path_buf();
        let timeout = self.timeout;

        let spawned = thread::Builder::new()
            .name("vidscan-probe".to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    inspector.inspect(&owned_path, timeout)
                }));
                // The receiver is gone if the deadline already passed.
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            return Err(ProbeResult::failure(
                path,
                ProbeErrorKind::WorkerFailure,
                format!("failed to start probe thread: {}", e),
            ));
        }

        match rx.recv_timeout(timeout) {
            Ok(Ok(Ok(streams))) => Ok(streams),
            Ok(Ok(Err(InspectError::TimedOut(limit)))) => Err(timeout_failure(path, limit)),
            Ok(Ok(Err(InspectError::Unreadable(message)))) => {
                Err(ProbeResult::failure(path, ProbeErrorKind::Unreadable, message))
            }
            Ok(Err(payload)) => Err(ProbeResult::failure(
                path,
                ProbeErrorKind::WorkerFailure,
                format!("inspector panicked: {}", panic_message(payload.as_ref())),
            )),
            Err(RecvTimeoutError::Timeout) => Err(timeout_failure(path, timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(ProbeResult::failure(
                path,
                ProbeErrorKind::WorkerFailure,
                "probe thread exited without a result",
            )),
        }
    }
}

fn timeout_failure(path: &Path, limit: Duration) -> ProbeResult {
    ProbeResult::failure(
        path,
        ProbeErrorKind::Timeout,
        format!("probe exceeded {:.1}s", limit.as_secs_f64()),
    )
}

/// Picks the first video stream and validates its geometry.
fn classify_streams(streams: &[StreamInfo]) -> Result<Dimensions, (ProbeErrorKind, String)> {
    let video = streams.iter().find(|s| s.is_video()).ok_or_else(|| {
        (
            ProbeErrorKind::NoVideoStream,
            format!("no video stream among {} stream(s)", streams.len()),
        )
    })?;

    match (positive_u32(video.width), positive_u32(video.height)) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width, height)),
        _ => Err((
            ProbeErrorKind::MetadataMissing,
            format!(
                "video stream has invalid dimensions (width: {}, height: {})",
                describe(video.width),
                describe(video.height)
            ),
        )),
    }
}

fn positive_u32(value: Option<i64>) -> Option<u32> {
    value.filter(|v| *v > 0).and_then(|v| u32::try_from(v).ok())
}

fn describe(value: Option<i64>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| v.to_string())
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

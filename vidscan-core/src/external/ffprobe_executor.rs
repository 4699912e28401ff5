//! FFprobe-backed [`MediaInspector`].
//!
//! Runs ffprobe as a child process, asking only for the stream entries the
//! scanner needs, and decodes its JSON output. The child is polled with
//! `try_wait` and killed once the timeout elapses so a wedged decoder
//! never outlives its slot in the worker pool.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::{InspectError, MediaInspector, StreamInfo};

/// Interval between `try_wait` polls while ffprobe is running.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Longest stderr excerpt carried into an error message.
const MAX_STDERR_CHARS: usize = 300;

#[derive(Deserialize, Debug)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Deserialize, Debug)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
}

impl From<FfprobeStream> for StreamInfo {
    fn from(stream: FfprobeStream) -> Self {
        StreamInfo {
            codec_type: stream.codec_type,
            width: stream.width,
            height: stream.height,
        }
    }
}

/// Inspector that shells out to an ffprobe binary.
#[derive(Debug, Clone)]
pub struct FfprobeInspector {
    ffprobe_bin: PathBuf,
}

impl Default for FfprobeInspector {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeInspector {
    /// Creates an inspector that runs `ffprobe_bin` (a name on `PATH` or a full path).
    pub fn new(ffprobe_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.ffprobe_bin
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.ffprobe_bin);
        cmd.args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_entries",
            "stream=codec_type,width,height",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
        cmd
    }
}

impl MediaInspector for FfprobeInspector {
    fn inspect(&self, path: &Path, timeout: Duration) -> Result<Vec<StreamInfo>, InspectError> {
        log::debug!("Running {} on: {}", self.ffprobe_bin.display(), path.display());

        let mut child = self.command(path).spawn().map_err(|e| {
            InspectError::Unreadable(format!(
                "failed to start {}: {}",
                self.ffprobe_bin.display(),
                e
            ))
        })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we poll for its exit.
        let stdout_reader = spawn_pipe_reader(child.stdout.take());
        let stderr_reader = spawn_pipe_reader(child.stderr.take());

        let status = match wait_with_timeout(&mut child, timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                log::debug!(
                    "ffprobe exceeded {:.1}s on {}, killed",
                    timeout.as_secs_f64(),
                    path.display()
                );
                return Err(InspectError::TimedOut(timeout));
            }
            Err(e) => {
                return Err(InspectError::Unreadable(format!(
                    "error waiting for ffprobe: {}",
                    e
                )));
            }
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            let detail = stderr.trim();
            let message = if detail.is_empty() {
                format!("ffprobe exited with {}", status)
            } else {
                format!("ffprobe exited with {}: {}", status, truncate(detail, MAX_STDERR_CHARS))
            };
            return Err(InspectError::Unreadable(message));
        }

        parse_ffprobe_output(&stdout)
    }
}

/// Polls `child` until it exits or `timeout` elapses.
///
/// Returns `Ok(None)` on timeout. The child is killed and reaped whenever
/// this returns without an exit status.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(e) => {
                kill_and_reap(child);
                return Err(e);
            }
        }
        if start.elapsed() >= timeout {
            kill_and_reap(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("Failed to kill ffprobe (pid {}): {}", child.id(), e);
    }
    let _ = child.wait();
}

fn spawn_pipe_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Decodes ffprobe's JSON stream listing.
pub(crate) fn parse_ffprobe_output(stdout: &[u8]) -> Result<Vec<StreamInfo>, InspectError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| InspectError::Unreadable(format!("failed to parse ffprobe output: {}", e)))?;
    Ok(output.streams.into_iter().map(StreamInfo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_and_audio_streams() {
        let json = br#"{
            "programs": [],
            "streams": [
                {"codec_type": "video", "width": 640, "height": 360},
                {"codec_type": "audio"}
            ]
        }"#;
        let streams = parse_ffprobe_output(json).unwrap();
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0], StreamInfo::video(640, 360));
        assert_eq!(streams[1], StreamInfo::audio());
    }

    #[test]
    fn test_parse_missing_streams_key_is_empty() {
        assert!(parse_ffprobe_output(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_unreadable() {
        let err = parse_ffprobe_output(b"not json").unwrap_err();
        assert!(matches!(err, InspectError::Unreadable(msg) if msg.contains("parse ffprobe output")));
    }

    #[test]
    fn test_missing_binary_is_unreadable() {
        let inspector = FfprobeInspector::new("vidscan-no-such-ffprobe");
        let err = inspector
            .inspect(Path::new("clip.mp4"), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, InspectError::Unreadable(msg) if msg.contains("failed to start")));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_child_is_killed_on_timeout() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let start = Instant::now();
        let status = wait_with_timeout(&mut child, Duration::from_millis(100)).unwrap();
        assert!(status.is_none());
        assert!(start.elapsed() < Duration::from_secs(4));
        // Already reaped: the exit status is cached.
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_kill_and_reap_leaves_no_running_child() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        assert!(child.try_wait().unwrap().is_none());
        kill_and_reap(&mut child);
        let status = child.try_wait().unwrap().expect("child should be reaped");
        assert!(!status.success());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}

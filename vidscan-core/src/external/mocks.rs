// vidscan-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use super::{InspectError, MediaInspector, StreamInfo};

/// Scripted behaviour for one path.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return these streams.
    Streams(Vec<StreamInfo>),
    /// Return this error.
    Fail(InspectError),
    /// Sleep, then return the wrapped response.
    Delay(Duration, Box<MockResponse>),
    /// Panic inside the inspector.
    Panic(String),
}

/// In-memory [`MediaInspector`] keyed by file name or full path.
///
/// Lookups try the full path first, then the file name, then the fallback.
/// Without a fallback, unknown paths report `Unreadable`.
#[derive(Debug, Default)]
pub struct MockMediaInspector {
    responses: Mutex<HashMap<PathBuf, MockResponse>>,
    fallback: Option<MockResponse>,
    calls: AtomicUsize,
}

impl MockMediaInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, key: impl Into<PathBuf>, response: MockResponse) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(key.into(), response);
        }
        self
    }

    /// Single video stream with the given dimensions.
    pub fn with_dimensions(self, key: impl Into<PathBuf>, width: i64, height: i64) -> Self {
        self.with_response(key, MockResponse::Streams(vec![StreamInfo::video(width, height)]))
    }

    pub fn with_streams(self, key: impl Into<PathBuf>, streams: Vec<StreamInfo>) -> Self {
        self.with_response(key, MockResponse::Streams(streams))
    }

    pub fn with_failure(self, key: impl Into<PathBuf>, message: &str) -> Self {
        self.with_response(key, MockResponse::Fail(InspectError::Unreadable(message.to_string())))
    }

    pub fn with_delay(self, key: impl Into<PathBuf>, delay: Duration, then: MockResponse) -> Self {
        self.with_response(key, MockResponse::Delay(delay, Box::new(then)))
    }

    pub fn with_panic(self, key: impl Into<PathBuf>, message: &str) -> Self {
        self.with_response(key, MockResponse::Panic(message.to_string()))
    }

    /// Response used for paths with no explicit entry.
    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Number of `inspect` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, path: &Path) -> Option<MockResponse> {
        let responses = self.responses.lock().ok()?;
        responses
            .get(path)
            .or_else(|| path.file_name().and_then(|name| responses.get(Path::new(name))))
            .cloned()
            .or_else(|| self.fallback.clone())
    }
}

fn resolve(response: MockResponse) -> Result<Vec<StreamInfo>, InspectError> {
    match response {
        MockResponse::Streams(streams) => Ok(streams),
        MockResponse::Fail(err) => Err(err),
        MockResponse::Delay(delay, then) => {
            thread::sleep(delay);
            resolve(*then)
        }
        MockResponse::Panic(message) => panic!("{}", message),
    }
}

impl MediaInspector for MockMediaInspector {
    fn inspect(&self, path: &Path, _timeout: Duration) -> Result<Vec<StreamInfo>, InspectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        log::debug!("Mock inspect: {}", path.display());
        match self.lookup(path) {
            Some(response) => resolve(response),
            None => Err(InspectError::Unreadable(format!(
                "no mock response for {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_file_name_and_fallback() {
        let mock = MockMediaInspector::new()
            .with_dimensions("a.mp4", 640, 360)
            .with_fallback(MockResponse::Streams(vec![StreamInfo::audio()]));

        let streams = mock.inspect(Path::new("/lib/a.mp4"), Duration::from_secs(1)).unwrap();
        assert_eq!(streams, vec![StreamInfo::video(640, 360)]);

        let streams = mock.inspect(Path::new("/lib/b.mp4"), Duration::from_secs(1)).unwrap();
        assert_eq!(streams, vec![StreamInfo::audio()]);
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_unknown_path_without_fallback_fails() {
        let mock = MockMediaInspector::new();
        let err = mock.inspect(Path::new("x.mp4"), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, InspectError::Unreadable(_)));
    }
}

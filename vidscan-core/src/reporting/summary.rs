//! Scan report aggregation.
//!
//! Worker outcomes arrive at the single collector in completion order. The
//! [`ReportAggregator`] folds them into counters and record lists, and
//! [`ReportAggregator::finalize`] sorts both lists by path so the finished
//! [`ScanReport`] never reflects scheduling order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::matcher::{ComparisonMode, Dimensions};
use crate::probe::ProbeErrorKind;
use crate::resolution::ResolutionSpec;

/// Tagged result of processing one work-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Matched {
        path: PathBuf,
        dimensions: Dimensions,
        size_bytes: u64,
    },
    Unmatched {
        path: PathBuf,
        dimensions: Dimensions,
    },
    Failed {
        path: PathBuf,
        kind: ProbeErrorKind,
        message: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Matched { path, .. }
            | FileOutcome::Unmatched { path, .. }
            | FileOutcome::Failed { path, .. } => path,
        }
    }
}

/// A file whose dimensions satisfied the criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Path relative to the source directory
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// A file that could not be probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Path relative to the source directory
    pub path: PathBuf,
    pub kind: ProbeErrorKind,
    pub message: String,
}

/// Overall result of a run, used to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    /// Every file was processed without error.
    Completed,
    /// Every file was processed; some failed.
    CompletedWithErrors,
    /// The run was cancelled before the work list was exhausted.
    Cancelled,
}

/// Final, immutable summary of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub source_dir: PathBuf,
    pub resolution: ResolutionSpec,
    pub comparison: ComparisonMode,
    pub worker_count: usize,
    /// Size of the work list
    pub total_files: usize,
    pub processed_count: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub error_count: usize,
    pub cancelled: bool,
    pub matches: Vec<MatchRecord>,
    pub errors: Vec<ErrorRecord>,
}

impl ScanReport {
    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at).to_std().unwrap_or_default()
    }

    pub fn status(&self) -> ScanStatus {
        if self.cancelled {
            ScanStatus::Cancelled
        } else if self.error_count > 0 {
            ScanStatus::CompletedWithErrors
        } else {
            ScanStatus::Completed
        }
    }
}

/// Accumulates outcomes for one run.
#[derive(Debug)]
pub struct ReportAggregator {
    started_at: DateTime<Local>,
    source_dir: PathBuf,
    resolution: ResolutionSpec,
    comparison: ComparisonMode,
    worker_count: usize,
    total_files: usize,
    unmatched_count: usize,
    seen: HashSet<PathBuf>,
    matches: Vec<MatchRecord>,
    errors: Vec<ErrorRecord>,
}

impl ReportAggregator {
    pub fn new(
        started_at: DateTime<Local>,
        source_dir: &Path,
        resolution: ResolutionSpec,
        comparison: ComparisonMode,
        worker_count: usize,
        total_files: usize,
    ) -> Self {
        Self {
            started_at,
            source_dir: source_dir.to_path_buf(),
            resolution,
            comparison,
            worker_count,
            total_files,
            unmatched_count: 0,
            seen: HashSet::with_capacity(total_files),
            matches: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Records one outcome. Returns false (and ignores it) if the path was
    /// already recorded.
    pub fn record(&mut self, outcome: FileOutcome) -> bool {
        if !self.seen.insert(outcome.path().to_path_buf()) {
            log::debug!("Ignoring duplicate outcome for {}", outcome.path().display());
            return false;
        }
        match outcome {
            FileOutcome::Matched { path, dimensions, size_bytes } => self.matches.push(MatchRecord {
                path,
                width: dimensions.width,
                height: dimensions.height,
                size_bytes,
            }),
            FileOutcome::Unmatched { .. } => self.unmatched_count += 1,
            FileOutcome::Failed { path, kind, message } => {
                self.errors.push(ErrorRecord { path, kind, message })
            }
        }
        true
    }

    /// Returns true if an outcome for `path` was recorded.
    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn processed_count(&self) -> usize {
        self.seen.len()
    }

    /// Sorts the records by path and produces the report.
    pub fn finalize(mut self, finished_at: DateTime<Local>, cancelled: bool) -> ScanReport {
        self.matches.sort_by(|a, b| a.path.cmp(&b.path));
        self.errors.sort_by(|a, b| a.path.cmp(&b.path));

        ScanReport {
            started_at: self.started_at,
            finished_at,
            source_dir: self.source_dir,
            resolution: self.resolution,
            comparison: self.comparison,
            worker_count: self.worker_count,
            total_files: self.total_files,
            processed_count: self.seen.len(),
            matched_count: self.matches.len(),
            unmatched_count: self.unmatched_count,
            error_count: self.errors.len(),
            cancelled,
            matches: self.matches,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator(total: usize) -> ReportAggregator {
        ReportAggregator::new(
            Local::now(),
            Path::new("/src"),
            ResolutionSpec::parse("360p").unwrap(),
            ComparisonMode::Equal,
            2,
            total,
        )
    }

    fn matched(path: &str) -> FileOutcome {
        FileOutcome::Matched {
            path: PathBuf::from(path),
            dimensions: Dimensions::new(640, 360),
            size_bytes: 1024,
        }
    }

    fn failed(path: &str) -> FileOutcome {
        FileOutcome::Failed {
            path: PathBuf::from(path),
            kind: ProbeErrorKind::Unreadable,
            message: "bad".to_string(),
        }
    }

    #[test]
    fn test_counts_and_sorting() {
        let mut agg = aggregator(5);
        agg.record(matched("z.mp4"));
        agg.record(failed("m.mp4"));
        agg.record(FileOutcome::Unmatched {
            path: PathBuf::from("b.mp4"),
            dimensions: Dimensions::new(1920, 1080),
        });
        agg.record(matched("a/c.mp4"));
        agg.record(failed("d.mp4"));

        let report = agg.finalize(Local::now(), false);
        assert_eq!(report.processed_count, 5);
        assert_eq!(report.matched_count, 2);
        assert_eq!(report.unmatched_count, 1);
        assert_eq!(report.error_count, 2);
        assert_eq!(
            report.matched_count + report.unmatched_count + report.error_count,
            report.processed_count
        );
        let match_paths: Vec<_> = report.matches.iter().map(|m| m.path.clone()).collect();
        assert_eq!(match_paths, vec![PathBuf::from("a/c.mp4"), PathBuf::from("z.mp4")]);
        let error_paths: Vec<_> = report.errors.iter().map(|e| e.path.clone()).collect();
        assert_eq!(error_paths, vec![PathBuf::from("d.mp4"), PathBuf::from("m.mp4")]);
        assert_eq!(report.status(), ScanStatus::CompletedWithErrors);
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let mut agg = aggregator(1);
        assert!(agg.record(matched("a.mp4")));
        assert!(!agg.record(failed("a.mp4")));
        assert!(agg.contains(Path::new("a.mp4")));
        let report = agg.finalize(Local::now(), false);
        assert_eq!(report.processed_count, 1);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.status(), ScanStatus::Completed);
    }

    #[test]
    fn test_empty_and_cancelled_status() {
        let report = aggregator(0).finalize(Local::now(), false);
        assert_eq!(report.status(), ScanStatus::Completed);
        assert!(report.matches.is_empty() && report.errors.is_empty());

        let mut agg = aggregator(3);
        agg.record(failed("a.mp4"));
        let report = agg.finalize(Local::now(), true);
        assert_eq!(report.status(), ScanStatus::Cancelled);
        assert!(report.processed_count <= report.total_files);
    }

    #[test]
    fn test_report_serializes_criteria_as_strings() {
        let mut agg = aggregator(1);
        agg.record(failed("a.mp4"));
        let json = serde_json::to_value(agg.finalize(Local::now(), false)).unwrap();
        assert_eq!(json["resolution"], "360p");
        assert_eq!(json["comparison"], "eq");
        assert_eq!(json["errors"][0]["kind"], "Unreadable");
        assert_eq!(json["errors"][0]["path"], "a.mp4");
    }
}

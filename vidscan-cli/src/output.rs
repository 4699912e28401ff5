//! Report file writers.
//!
//! Each scan writes two files into the log directory, named from the scan
//! criteria and a timestamp:
//! `video_scan_<comparison>_<resolution>_<YYYYMMDD_HHMMSS>.txt` and `.json`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use vidscan_core::{ScanReport, format_bytes, format_duration};

use crate::error::{CliErrorContext, CliResult};

const SEPARATOR_WIDTH: usize = 50;

/// Paths of the files written for one report.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub text: PathBuf,
    pub json: PathBuf,
}

/// Base file name (without extension) for a report.
pub fn report_stem(report: &ScanReport, timestamp: &str) -> String {
    format!(
        "video_scan_{}_{}_{}",
        report.comparison.as_str(),
        report.resolution,
        timestamp
    )
}

/// Renders the human-readable report.
pub fn render_text(report: &ScanReport) -> String {
    let symbol = report.comparison.symbol();
    let total_match_bytes: u64 = report.matches.iter().map(|m| m.size_bytes).sum();

    let mut out = String::new();
    let _ = writeln!(out, "Video Resolution Scan Results");
    let _ = writeln!(out, "Scan Time: {}", report.started_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Source Directory: {}", report.source_dir.display());
    let _ = writeln!(out, "Resolution Criteria: {} {}", symbol, report.resolution);
    let _ = writeln!(out, "Total Files Found: {}", report.total_files);
    let _ = writeln!(out, "Successfully Processed: {}", report.processed_count);
    let _ = writeln!(out, "Errors: {}", report.error_count);
    let _ = writeln!(out, "Matching Videos Found: {}", report.matched_count);
    let _ = writeln!(out, "Total Size of Matches: {}", format_bytes(total_match_bytes));
    let _ = writeln!(out, "Duration: {}", format_duration(report.elapsed()));
    if report.cancelled {
        let _ = writeln!(
            out,
            "Scan cancelled: {} of {} files processed",
            report.processed_count, report.total_files
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    let _ = writeln!(out);

    if !report.matches.is_empty() {
        let _ = writeln!(out, "Videos matching {} {}:", symbol, report.resolution);
        for m in &report.matches {
            let _ = writeln!(out, "  {} ({}x{})", m.path.display(), m.width, m.height);
        }
        let _ = writeln!(out);
    }

    if !report.errors.is_empty() {
        let _ = writeln!(out, "Errors:");
        for e in &report.errors {
            let _ = writeln!(out, "  {}: [{}] {}", e.path.display(), e.kind, e.message);
        }
    }

    out
}

/// Writes the text and JSON reports into `log_dir`, creating it if needed.
pub fn write_reports(report: &ScanReport, log_dir: &Path, timestamp: &str) -> CliResult<ReportPaths> {
    fs::create_dir_all(log_dir)
        .cli_with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let stem = report_stem(report, timestamp);
    let paths = ReportPaths {
        text: log_dir.join(format!("{stem}.txt")),
        json: log_dir.join(format!("{stem}.json")),
    };

    fs::write(&paths.text, render_text(report))
        .cli_with_context(|| format!("Failed to write {}", paths.text.display()))?;

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| vidscan_core::CoreError::OperationFailed(format!("Failed to serialize report: {e}")))?;
    fs::write(&paths.json, json)
        .cli_with_context(|| format!("Failed to write {}", paths.json.display()))?;

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::path::PathBuf;
    use vidscan_core::reporting::{FileOutcome, ReportAggregator};
    use vidscan_core::{ComparisonMode, Dimensions, ProbeErrorKind, ResolutionSpec};

    fn sample_report(cancelled: bool) -> ScanReport {
        let mut agg = ReportAggregator::new(
            Local::now(),
            Path::new("/src"),
            ResolutionSpec::parse("360").unwrap(),
            ComparisonMode::LessOrEqual,
            2,
            4,
        );
        agg.record(FileOutcome::Matched {
            path: PathBuf::from("b/clip.mp4"),
            dimensions: Dimensions::new(640, 360),
            size_bytes: 2048,
        });
        agg.record(FileOutcome::Matched {
            path: PathBuf::from("a.mp4"),
            dimensions: Dimensions::new(480, 270),
            size_bytes: 1024,
        });
        agg.record(FileOutcome::Failed {
            path: PathBuf::from("bad.mp4"),
            kind: ProbeErrorKind::Timeout,
            message: "probe exceeded 30.0s".to_string(),
        });
        agg.finalize(Local::now(), cancelled)
    }

    #[test]
    fn test_report_stem() {
        let report = sample_report(false);
        assert_eq!(report_stem(&report, "20240601_123045"), "video_scan_lte_360p_20240601_123045");
    }

    #[test]
    fn test_render_text_layout() {
        let text = render_text(&sample_report(false));
        assert!(text.starts_with("Video Resolution Scan Results\n"));
        assert!(text.contains("Resolution Criteria: <= 360p\n"));
        assert!(text.contains("Total Files Found: 4\n"));
        assert!(text.contains("Successfully Processed: 3\n"));
        assert!(text.contains("Errors: 1\n"));
        assert!(text.contains("Matching Videos Found: 2\n"));
        assert!(text.contains("Total Size of Matches: 3.00 KiB\n"));
        assert!(text.contains("Videos matching <= 360p:\n  a.mp4 (480x270)\n  b/clip.mp4 (640x360)\n"));
        assert!(text.contains("Errors:\n  bad.mp4: [timeout] probe exceeded 30.0s\n"));
        assert!(!text.contains("Scan cancelled"));
    }

    #[test]
    fn test_render_text_notes_cancellation() {
        let text = render_text(&sample_report(true));
        assert!(text.contains("Scan cancelled: 3 of 4 files processed"));
    }

    #[test]
    fn test_write_reports_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested/log");
        let report = sample_report(false);

        let paths = write_reports(&report, &log_dir, "20240601_123045").unwrap();
        assert!(paths.text.ends_with("video_scan_lte_360p_20240601_123045.txt"));
        assert_eq!(fs::read_to_string(&paths.text).unwrap(), render_text(&report));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(json["matched_count"], 2);
        assert_eq!(json["matches"][0]["path"], "a.mp4");
        assert_eq!(json["errors"][0]["kind"], "Timeout");
        assert_eq!(json["cancelled"], false);
    }
}

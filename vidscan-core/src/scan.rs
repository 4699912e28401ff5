// ============================================================================
// vidscan-core/src/scan.rs
// ============================================================================
//
// SCAN ORCHESTRATOR: Parallel Probe-and-Match over a Directory Tree
//
// This module drives one scan from a validated ScanConfig to a ScanReport.
//
// KEY COMPONENTS:
// - CancellationToken: cooperative stop flag shared with the caller
// - run_scan: discovery, partitioning, dispatch, collection, aggregation
//
// FLOW:
// 1. Validate the config and source directory (configuration errors abort)
// 2. Discover candidate files; the sorted list is the work list
// 3. Split the work list into one slice per worker (bounded pool)
// 4. Workers probe and match their slice, sending a FileOutcome per file
//    over a single channel; the calling thread is the only consumer
// 5. Files with no outcome become WorkerFailure records (unless cancelled)
// 6. The aggregator sorts everything by path and produces the report

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Local;
use crossbeam_channel::{RecvTimeoutError, Sender};

use crate::config::ScanConfig;
use crate::discovery::find_video_files;
use crate::error::{CoreError, CoreResult};
use crate::external::MediaInspector;
use crate::matcher::{self, ComparisonMode};
use crate::probe::{ProbeErrorKind, ProbeResult, Prober, panic_message};
use crate::reporting::{FileOutcome, ReportAggregator, ScanReport, ScanReporter};
use crate::resolution::ResolutionSpec;

/// How often the collector wakes up to check for cancellation.
const COLLECT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cooperative cancellation flag.
///
/// Cloning yields a handle to the same flag. Once cancelled, workers stop
/// taking new files; probes already running finish or time out.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Read-only state shared by every worker.
struct WorkerContext<'a> {
    prober: Prober,
    source_dir: &'a Path,
    spec: ResolutionSpec,
    comparison: ComparisonMode,
    cancel: &'a CancellationToken,
}

impl WorkerContext<'_> {
    fn relative(&self, path: &Path) -> PathBuf {
        relative_path(self.source_dir, path)
    }

    fn process_file(&self, path: &Path) -> FileOutcome {
        match self.prober.probe(path) {
            ProbeResult::Success { dimensions, size_bytes, .. } => {
                if matcher::matches(dimensions, &self.spec, self.comparison) {
                    FileOutcome::Matched {
                        path: self.relative(path),
                        dimensions,
                        size_bytes,
                    }
                } else {
                    FileOutcome::Unmatched {
                        path: self.relative(path),
                        dimensions,
                    }
                }
            }
            ProbeResult::Failure { kind, message, .. } => FileOutcome::Failed {
                path: self.relative(path),
                kind,
                message,
            },
        }
    }

    /// Processes one slice of the work list, stopping early on cancellation.
    fn run_slice(&self, slice: &[PathBuf], tx: &Sender<FileOutcome>) {
        for path in slice {
            if self.cancel.is_cancelled() {
                log::debug!("Worker stopping: scan cancelled");
                break;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process_file(path)))
                .unwrap_or_else(|payload| FileOutcome::Failed {
                    path: self.relative(path),
                    kind: ProbeErrorKind::WorkerFailure,
                    message: format!("worker crashed: {}", panic_message(payload.as_ref())),
                });
            if tx.send(outcome).is_err() {
                break;
            }
        }
    }
}

fn relative_path(source_dir: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(source_dir).unwrap_or(path).to_path_buf()
}

/// Splits `files` round-robin into at most `workers` non-empty slices.
///
/// Round-robin keeps files from the same directory spread across workers.
fn partition(files: &[PathBuf], workers: usize) -> Vec<Vec<PathBuf>> {
    let count = workers.min(files.len()).max(1);
    let mut slices = vec![Vec::with_capacity(files.len() / count + 1); count];
    for (index, file) in files.iter().enumerate() {
        slices[index % count].push(file.clone());
    }
    slices.retain(|slice| !slice.is_empty());
    slices
}

/// Runs a complete scan.
///
/// Returns `Err` only for configuration problems detected before any file is
/// probed (and for a failure to build the worker pool). Every per-file
/// problem is recorded in the returned report. When `cancel` is tripped the
/// report covers the files that finished and is marked cancelled.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vidscan_core::config::ScanConfigBuilder;
/// use vidscan_core::external::FfprobeInspector;
/// use vidscan_core::reporting::NullReporter;
/// use vidscan_core::{CancellationToken, run_scan};
///
/// let config = ScanConfigBuilder::new().source_dir("/src").resolution("720p").build()?;
/// let report = run_scan(
///     &config,
///     Arc::new(FfprobeInspector::default()),
///     &CancellationToken::new(),
///     &NullReporter,
/// )?;
/// println!("{} matching files", report.matched_count);
/// # Ok::<(), vidscan_core::CoreError>(())
/// ```
pub fn run_scan(
    config: &ScanConfig,
    inspector: Arc<dyn MediaInspector>,
    cancel: &CancellationToken,
    reporter: &dyn ScanReporter,
) -> CoreResult<ScanReport> {
    config.validate()?;
    config.validate_source_dir()?;

    let started_at = Local::now();
    log::info!(
        "Scanning {} for videos with resolution {} {}",
        config.source_dir.display(),
        config.comparison.symbol(),
        config.spec
    );

    let files = find_video_files(&config.source_dir, &config.extensions)?;
    let total = files.len();
    log::info!("Found {} video file(s) to process with {} worker(s)", total, config.worker_count);

    let mut aggregator = ReportAggregator::new(
        started_at,
        &config.source_dir,
        config.spec,
        config.comparison,
        config.worker_count,
        total,
    );
    reporter.scan_started(total, config.worker_count);

    if total > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|index| format!("vidscan-worker-{}", index))
            .build()
            .map_err(|e| CoreError::WorkerPool(e.to_string()))?;

        let context = WorkerContext {
            prober: Prober::new(inspector, config.probe_timeout),
            source_dir: &config.source_dir,
            spec: config.spec,
            comparison: config.comparison,
            cancel,
        };
        let slices = partition(&files, config.worker_count);

        let dispatch = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.in_place_scope(|scope| {
                let (tx, rx) = crossbeam_channel::unbounded::<FileOutcome>();
                for slice in &slices {
                    let tx = tx.clone();
                    let context = &context;
                    scope.spawn(move |_| context.run_slice(slice, &tx));
                }
                drop(tx);
                collect_outcomes(&rx, &mut aggregator, cancel, reporter, total, config);
            })
        }));
        if let Err(payload) = dispatch {
            log::error!("Worker pool failed: {}", panic_message(payload.as_ref()));
        }

        if !cancel.is_cancelled() {
            for path in &files {
                let relative = relative_path(&config.source_dir, path);
                if aggregator.contains(&relative) {
                    continue;
                }
                log::warn!("No result for {}; recording worker failure", relative.display());
                let outcome = FileOutcome::Failed {
                    path: relative,
                    kind: ProbeErrorKind::WorkerFailure,
                    message: "worker stopped before processing this file".to_string(),
                };
                aggregator.record(outcome.clone());
                let completed = aggregator.processed_count();
                notify_reporter("file_processed", || {
                    reporter.file_processed(&outcome, completed, total)
                });
            }
        }
    }

    let cancelled = cancel.is_cancelled() && aggregator.processed_count() < total;
    let report = aggregator.finalize(Local::now(), cancelled);

    if cancelled {
        log::warn!(
            "Scan cancelled after {} of {} file(s)",
            report.processed_count,
            report.total_files
        );
    }
    log::info!(
        "Scan complete: {} processed, {} matching, {} error(s) in {:.1}s",
        report.processed_count,
        report.matched_count,
        report.error_count,
        report.elapsed().as_secs_f64()
    );
    notify_reporter("scan_finished", || reporter.scan_finished(&report));
    Ok(report)
}

/// Calls into the reporter outside the worker pool, logging instead of
/// unwinding if it panics.
fn notify_reporter(event: &str, call: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(call)) {
        log::error!("Progress reporter failed in {}: {}", event, panic_message(payload.as_ref()));
    }
}

/// Drains the outcome channel until every worker has hung up.
fn collect_outcomes(
    rx: &crossbeam_channel::Receiver<FileOutcome>,
    aggregator: &mut ReportAggregator,
    cancel: &CancellationToken,
    reporter: &dyn ScanReporter,
    total: usize,
    config: &ScanConfig,
) {
    let mut cancel_reported = false;
    loop {
        match rx.recv_timeout(COLLECT_POLL_INTERVAL) {
            Ok(outcome) => {
                log_outcome(&outcome, config);
                if aggregator.record(outcome.clone()) {
                    reporter.file_processed(&outcome, aggregator.processed_count(), total);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if !cancel_reported && cancel.is_cancelled() {
            cancel_reported = true;
            log::warn!("Cancellation requested; waiting for in-flight probes");
            reporter.scan_cancelled();
        }
    }
}

fn log_outcome(outcome: &FileOutcome, config: &ScanConfig) {
    match outcome {
        FileOutcome::Matched { path, dimensions, .. } => log::info!(
            "Found matching video: {} ({} {} {})",
            path.display(),
            dimensions,
            config.comparison.symbol(),
            config.spec
        ),
        FileOutcome::Unmatched { path, dimensions } => {
            log::debug!("No match: {} ({})", path.display(), dimensions)
        }
        FileOutcome::Failed { path, kind, message } => {
            log::warn!("Failed to probe {} ({}): {}", path.display(), kind, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_round_robin() {
        let files: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("{i}.mp4"))).collect();
        let slices = partition(&files, 2);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0], vec![files[0].clone(), files[2].clone(), files[4].clone()]);
        assert_eq!(slices[1], vec![files[1].clone(), files[3].clone()]);
    }

    #[test]
    fn test_partition_never_exceeds_file_count() {
        let files = vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")];
        let slices = partition(&files, 8);
        assert_eq!(slices.len(), 2);
        assert!(partition(&[], 4).is_empty());
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/src"), Path::new("/src/a/b.mp4")),
            PathBuf::from("a/b.mp4")
        );
        assert_eq!(relative_path(Path::new("/src"), Path::new("/other.mp4")), PathBuf::from("/other.mp4"));
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}

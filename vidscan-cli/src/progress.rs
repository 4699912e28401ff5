// ============================================================================
// vidscan-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal progress bar for scans
//
// TerminalReporter implements the core ScanReporter trait with an indicatif
// bar on stderr. While a bar is visible, console log lines are printed
// through it (see print_line) so they do not tear the bar.
//
// KEY COMPONENTS:
// - TerminalReporter: ScanReporter backed by indicatif
// - print_line: stderr writer used by the console logger

use std::sync::Mutex;
use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use vidscan_core::reporting::{FileOutcome, ScanReport, ScanReporter};
use vidscan_core::{ScanStatus, format_duration};

/// Bar currently drawn on stderr, if any.
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Writes one console line, above the active progress bar when there is one.
pub fn print_line(line: &str) {
    let guard = ACTIVE_BAR.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match guard.as_ref() {
        Some(pb) => pb.println(line),
        None => eprintln!("{}", line),
    }
}

fn set_active_bar(pb: Option<ProgressBar>) {
    let mut guard = ACTIVE_BAR.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = pb;
}

/// Progress bar reporter for interactive terminals.
pub struct TerminalReporter {
    enabled: bool,
    progress: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    /// Creates a reporter; the bar is only drawn when `enabled` and stderr is a terminal.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: enabled && Term::stderr().is_term(),
            progress: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self.progress.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pb) = guard.as_ref() {
            f(pb);
        }
    }

    fn finish_progress(&self) {
        let mut guard = self.progress.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pb) = guard.take() {
            set_active_bar(None);
            pb.finish_and_clear();
        }
    }
}

impl Drop for TerminalReporter {
    fn drop(&mut self) {
        self.finish_progress();
    }
}

impl ScanReporter for TerminalReporter {
    fn scan_started(&self, total: usize, _workers: usize) {
        if !self.enabled || total == 0 {
            return;
        }
        let pb = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        let bar_style = ProgressStyle::default_bar()
            .template("Scanning [{bar:40}] {pos}/{len} ({percent:>3}%) | {elapsed_precise} | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(bar_style);
        pb.enable_steady_tick(Duration::from_millis(120));

        set_active_bar(Some(pb.clone()));
        let mut guard = self.progress.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(pb);
    }

    fn file_processed(&self, outcome: &FileOutcome, completed: usize, _total: usize) {
        self.with_bar(|pb| {
            pb.set_position(completed as u64);
            pb.set_message(outcome.path().display().to_string());
        });
    }

    fn scan_cancelled(&self) {
        self.with_bar(|pb| pb.set_message(style("cancelling...").yellow().to_string()));
    }

    fn scan_finished(&self, report: &ScanReport) {
        self.finish_progress();

        let status = match report.status() {
            ScanStatus::Completed => style("Scan complete").green().bold(),
            ScanStatus::CompletedWithErrors => style("Scan complete with errors").yellow().bold(),
            ScanStatus::Cancelled => style("Scan cancelled").red().bold(),
        };
        eprintln!(
            "{}: {} matching, {} processed, {} error(s) in {}",
            status,
            style(report.matched_count).bold(),
            report.processed_count,
            report.error_count,
            format_duration(report.elapsed())
        );
    }
}

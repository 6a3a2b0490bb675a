// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for sync passes
// reference: uses indicatif for progress bars and tracks per-status counts

use crate::models::sync_result::{SyncResult, SyncStatus};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    pub succeeded: usize,
    pub not_found: usize,
    pub failed: usize,
    pub duration_secs: u64,
}

impl SyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.not_found + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / total as f64) * 100.0
    }

    pub fn repos_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.total() as f64 / self.duration_secs as f64
    }
}

pub struct SyncProgress {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    succeeded: Arc<AtomicUsize>,
    not_found: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    start_time: Instant,
}

impl SyncProgress {
    pub fn new(total_repos: usize) -> Self {
        Self::with_color(total_repos, true)
    }

    pub fn with_color(total_repos: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();
        Self::build(multi_progress, total_repos, colored)
    }

    /// Tracker that counts without drawing, for non-interactive runs.
    pub fn hidden(total_repos: usize) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        Self::build(multi_progress, total_repos, false)
    }

    fn build(multi_progress: MultiProgress, total_repos: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_repos as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            succeeded: Arc::new(AtomicUsize::new(0)),
            not_found: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn record(&self, result: &SyncResult) {
        let counter = match result.status {
            SyncStatus::Success => &self.succeeded,
            SyncStatus::NotFound => &self.not_found,
            SyncStatus::Error => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.main_bar.set_message(result.repository.clone());
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Sync complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> SyncStats {
        SyncStats {
            succeeded: self.succeeded.load(Ordering::SeqCst),
            not_found: self.not_found.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "Synced: {} | Not found: {} | Failed: {}",
            self.succeeded.load(Ordering::SeqCst),
            self.not_found.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst)
        );
        self.detail_bar.set_message(message);
    }
}

impl Drop for SyncProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}", "=>-")
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

use dugroup_core::{Aggregates, ScanWarning};

/// Progress information during a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Number of files recorded so far.
    pub files_scanned: u64,
    /// Number of directories recorded so far.
    pub dirs_scanned: u64,
    /// Total bytes recorded so far.
    pub bytes_scanned: u64,
    /// Number of distinct groups seen so far.
    pub groups: usize,
    /// Directory about to be listed.
    pub current_path: PathBuf,
    /// Number of warnings encountered.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Summarize an accumulator snapshot.
    pub fn from_snapshot(
        current_path: impl Into<PathBuf>,
        snapshot: &Aggregates,
        errors_count: u64,
        elapsed: Duration,
    ) -> Self {
        let totals = snapshot.totals();
        Self {
            files_scanned: totals.files,
            dirs_scanned: totals.directories,
            bytes_scanned: totals.size,
            groups: snapshot.len(),
            current_path: current_path.into(),
            errors_count,
            elapsed,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

/// Event published by a background scan.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// A directory is about to be listed.
    Progress(ScanProgress),
    /// An entry was skipped.
    Warning(ScanWarning),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_snapshot() {
        let mut aggregates = Aggregates::new();
        aggregates.entry("a".into(), true).record_dir();
        aggregates.entry("a".into(), true).record_file(50);
        aggregates.entry("b".into(), false).record_file(25);

        let progress =
            ScanProgress::from_snapshot("/tmp/a", &aggregates, 1, Duration::from_secs(2));
        assert_eq!(progress.files_scanned, 2);
        assert_eq!(progress.dirs_scanned, 1);
        assert_eq!(progress.bytes_scanned, 75);
        assert_eq!(progress.groups, 2);
        assert_eq!(progress.total_items(), 3);
        assert_eq!(progress.files_per_second(), 1.0);
    }

    #[test]
    fn test_rate_without_elapsed_time() {
        assert_eq!(ScanProgress::default().files_per_second(), 0.0);
    }
}

//! Depth-first grouping scanner.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use dugroup_core::{Aggregates, EntryMeta, ScanConfig, ScanError, ScanWarning};

use crate::observer::{ScanObserver, WarningCollector};
use crate::parallel;
use crate::state::ScanState;

/// Result of [`Scanner::scan_with_summary`].
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Aggregates by group.
    pub aggregates: Aggregates,
    /// Entries that were skipped.
    pub warnings: Vec<ScanWarning>,
    /// Wall-clock duration of the scan.
    pub duration: Duration,
}

impl ScanSummary {
    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Walks a tree and aggregates every entry beneath the root into groups.
///
/// The default walk is sequential: a directory is listed once and its
/// children are visited in listing order, each subtree to completion before
/// the next sibling. Progress notifications are therefore reproducible for a
/// given tree. Setting [`ScanConfig::threads`] switches to the parallel
/// walker, where notification order is best-effort.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    cancel: CancellationToken,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner that stops when `cancel` fires.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Token checked at each directory descent.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Perform a scan of the configured root.
    ///
    /// Fails with [`ScanError::InvalidArgument`] when the root cannot be
    /// stat'd and with [`ScanError::Interrupted`] when cancelled; a cancelled
    /// scan yields no partial result. Every other failure is reported to the
    /// observer and the affected entry is skipped.
    pub fn scan<O>(&self, config: &ScanConfig, observer: &mut O) -> Result<Aggregates, ScanError>
    where
        O: ScanObserver + ?Sized,
    {
        let root = config.root.as_path();
        let metadata = fs::symlink_metadata(root).map_err(|err| {
            ScanError::invalid_argument(format!("cannot read scan root {}: {err}", root.display()))
        })?;
        let root_meta = EntryMeta::from(&metadata);

        debug!(
            root = %root.display(),
            grouping = %config.grouping,
            threads = config.threads,
            "starting scan"
        );

        let mut state = ScanState::new(config.grouping);

        if root_meta.kind.is_symlink() {
            debug!(root = %root.display(), "scan root is a symlink, nothing to do");
        } else if root_meta.is_dir() {
            if config.is_parallel() {
                parallel::walk(root, config.threads, &mut state, observer, &self.cancel)?;
            } else {
                self.visit_dir(root, &mut state, observer)?;
            }
        }

        let aggregates = state.into_aggregates();
        debug!(groups = aggregates.len(), "scan finished");
        Ok(aggregates)
    }

    /// Scan, collecting warnings and timing instead of streaming them.
    pub fn scan_with_summary(&self, config: &ScanConfig) -> Result<ScanSummary, ScanError> {
        let start = Instant::now();
        let mut collector = WarningCollector::new();
        let aggregates = self.scan(config, &mut collector)?;

        Ok(ScanSummary {
            aggregates,
            warnings: collector.into_warnings(),
            duration: start.elapsed(),
        })
    }

    /// Stat one entry beneath the root, record it and descend if needed.
    fn visit_entry<O>(
        &self,
        path: &Path,
        state: &mut ScanState,
        observer: &mut O,
    ) -> Result<(), ScanError>
    where
        O: ScanObserver + ?Sized,
    {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(err) => {
                report(observer, ScanWarning::metadata_error(path, &err));
                return Ok(());
            }
        };

        let meta = EntryMeta::from(&metadata);
        if meta.kind.is_symlink() {
            trace!(path = %path.display(), "skipping symlink");
            return Ok(());
        }

        state.record(&meta);

        if meta.is_dir() {
            self.visit_dir(path, state, observer)?;
        }
        Ok(())
    }

    /// List a directory once, then visit its children in listing order.
    fn visit_dir<O>(
        &self,
        path: &Path,
        state: &mut ScanState,
        observer: &mut O,
    ) -> Result<(), ScanError>
    where
        O: ScanObserver + ?Sized,
    {
        if self.cancel.is_cancelled() {
            return Err(ScanError::Interrupted);
        }

        observer.on_progress(path, state.aggregates());
        trace!(path = %path.display(), "listing directory");

        let names = match list_dir(path, observer) {
            Ok(names) => names,
            Err(err) => {
                report(observer, ScanWarning::read_error(path, &err));
                return Ok(());
            }
        };

        for name in names {
            state.enter(&name);
            let result = self.visit_entry(&path.join(&name), state, observer);
            state.leave();
            result?;
        }
        Ok(())
    }
}

/// Read all names of a directory, closing the handle before recursion.
///
/// An unreadable individual entry is reported and left out.
fn list_dir<O>(path: &Path, observer: &mut O) -> std::io::Result<Vec<OsString>>
where
    O: ScanObserver + ?Sized,
{
    let mut names = Vec::new();
    for entry in fs::read_dir(path)? {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(err) => report(observer, ScanWarning::read_error(path, &err)),
        }
    }
    Ok(names)
}

pub(crate) fn report<O>(observer: &mut O, warning: ScanWarning)
where
    O: ScanObserver + ?Sized,
{
    debug!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    observer.on_error(&warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{FnObserver, SilentObserver};
    use dugroup_core::{GroupingMode, WarningKind};
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.rs"), "test").unwrap();
        fs::write(root.join("dir2/file4"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let aggregates = Scanner::new().scan(&config, &mut SilentObserver).unwrap();
        let totals = aggregates.totals();

        assert_eq!(totals.files, 4);
        assert_eq!(totals.directories, 3);
        assert_eq!(totals.size, 5 + 17 + 4 + 17);

        let dir1 = aggregates.get("dir1").unwrap();
        assert_eq!((dir1.files, dir1.directories, dir1.size), (2, 2, 21));
        assert!(dir1.is_directory);
        assert!(!aggregates.get("file1.txt").unwrap().is_directory);
    }

    #[test]
    fn test_progress_before_each_directory() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path()).with_grouping(GroupingMode::Extension);

        let mut visited = Vec::new();
        let mut observer = FnObserver::new(
            |path: &Path, _: &Aggregates| visited.push(path.to_path_buf()),
            |_: &ScanWarning| {},
        );
        Scanner::new().scan(&config, &mut observer).unwrap();

        assert_eq!(visited.len(), 4);
        assert_eq!(visited[0], temp.path());
        assert!(visited.contains(&temp.path().join("dir1/subdir")));
    }

    #[test]
    fn test_missing_root_is_invalid_argument() {
        let temp = TempDir::new().unwrap();
        let config = ScanConfig::new(temp.path().join("does-not-exist"));

        let err = Scanner::new().scan(&config, &mut SilentObserver).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_file_root_yields_nothing() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path().join("file1.txt"));

        let aggregates = Scanner::new().scan(&config, &mut SilentObserver).unwrap();
        assert!(aggregates.is_empty());
    }

    #[test]
    fn test_cancelled_scan_is_interrupted() {
        let temp = create_test_tree();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let scanner = Scanner::with_cancellation(cancel);
        let err = scanner
            .scan(&ScanConfig::new(temp.path()), &mut SilentObserver)
            .unwrap_err();
        assert!(matches!(err, ScanError::Interrupted));
    }

    #[test]
    fn test_scan_with_summary() {
        let temp = create_test_tree();
        let summary = Scanner::new()
            .scan_with_summary(&ScanConfig::new(temp.path()))
            .unwrap();

        assert!(!summary.has_warnings());
        assert_eq!(summary.aggregates.len(), 3);
    }

    #[test]
    fn test_vanished_directory_is_reported_once() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone");

        let mut state = ScanState::new(GroupingMode::Tld);
        let mut collector = WarningCollector::new();
        Scanner::new()
            .visit_dir(&gone, &mut state, &mut collector)
            .unwrap();

        assert_eq!(collector.warnings().len(), 1);
        assert_eq!(collector.warnings()[0].path, gone);
        assert_eq!(collector.warnings()[0].kind, WarningKind::Vanished);
        assert!(state.aggregates().is_empty());
    }

    #[test]
    fn test_vanished_entry_is_skipped() {
        let temp = create_test_tree();
        let mut state = ScanState::new(GroupingMode::Extension);
        let mut collector = WarningCollector::new();

        // Listed but removed before it could be stat'd.
        state.enter(std::ffi::OsStr::new("removed.txt"));
        Scanner::new()
            .visit_entry(&temp.path().join("removed.txt"), &mut state, &mut collector)
            .unwrap();
        state.leave();
        state.enter(std::ffi::OsStr::new("file1.txt"));
        Scanner::new()
            .visit_entry(&temp.path().join("file1.txt"), &mut state, &mut collector)
            .unwrap();

        assert_eq!(collector.warnings().len(), 1);
        assert_eq!(collector.warnings()[0].kind, WarningKind::Vanished);
        let txt = state.aggregates().get(".txt").unwrap();
        assert_eq!((txt.files, txt.size), (1, 5));
    }
}

//! Observer interface for scan progress and per-entry errors.

use std::path::Path;
use std::time::Instant;

use tokio::sync::broadcast;

use dugroup_core::{Aggregates, ScanWarning};

use crate::progress::{ScanEvent, ScanProgress};

/// Receives notifications while a scan runs.
///
/// Both methods are called synchronously on the scanning thread and default
/// to doing nothing, so an observer that ignores errors suppresses them.
/// Implementations must not block for long.
pub trait ScanObserver {
    /// Called before a directory is listed, with the aggregates so far.
    fn on_progress(&mut self, _path: &Path, _snapshot: &Aggregates) {}

    /// Called once per entry or subtree that had to be skipped.
    fn on_error(&mut self, _warning: &ScanWarning) {}
}

impl<T: ScanObserver + ?Sized> ScanObserver for &mut T {
    fn on_progress(&mut self, path: &Path, snapshot: &Aggregates) {
        (**self).on_progress(path, snapshot);
    }

    fn on_error(&mut self, warning: &ScanWarning) {
        (**self).on_error(warning);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ScanObserver for SilentObserver {}

/// Observer that keeps every warning.
#[derive(Debug, Default, Clone)]
pub struct WarningCollector {
    warnings: Vec<ScanWarning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }
}

impl ScanObserver for WarningCollector {
    fn on_error(&mut self, warning: &ScanWarning) {
        self.warnings.push(warning.clone());
    }
}

/// Adapter turning a pair of closures into an observer.
pub struct FnObserver<P, E> {
    progress: P,
    error: E,
}

impl<P, E> FnObserver<P, E>
where
    P: FnMut(&Path, &Aggregates),
    E: FnMut(&ScanWarning),
{
    pub fn new(progress: P, error: E) -> Self {
        Self { progress, error }
    }
}

impl<P, E> ScanObserver for FnObserver<P, E>
where
    P: FnMut(&Path, &Aggregates),
    E: FnMut(&ScanWarning),
{
    fn on_progress(&mut self, path: &Path, snapshot: &Aggregates) {
        (self.progress)(path, snapshot);
    }

    fn on_error(&mut self, warning: &ScanWarning) {
        (self.error)(warning);
    }
}

/// Observer that publishes [`ScanEvent`]s on a broadcast channel.
///
/// Sending never blocks; events are dropped when nobody listens and slow
/// receivers see `Lagged`.
pub struct ChannelObserver {
    tx: broadcast::Sender<ScanEvent>,
    started: Instant,
    errors: u64,
}

impl ChannelObserver {
    pub fn new(tx: broadcast::Sender<ScanEvent>) -> Self {
        Self {
            tx,
            started: Instant::now(),
            errors: 0,
        }
    }
}

impl ScanObserver for ChannelObserver {
    fn on_progress(&mut self, path: &Path, snapshot: &Aggregates) {
        let progress =
            ScanProgress::from_snapshot(path, snapshot, self.errors, self.started.elapsed());
        let _ = self.tx.send(ScanEvent::Progress(progress));
    }

    fn on_error(&mut self, warning: &ScanWarning) {
        self.errors += 1;
        let _ = self.tx.send(ScanEvent::Warning(warning.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugroup_core::WarningKind;

    #[test]
    fn test_fn_observer() {
        let mut paths = Vec::new();
        let mut errors = 0;
        {
            let mut observer = FnObserver::new(
                |path: &Path, _: &Aggregates| paths.push(path.to_path_buf()),
                |_: &ScanWarning| errors += 1,
            );
            observer.on_progress(Path::new("/a"), &Aggregates::new());
            observer.on_error(&ScanWarning::new("/a/b", "nope", WarningKind::ReadError));
        }
        assert_eq!(paths, [Path::new("/a")]);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_channel_observer_counts_errors() {
        let (tx, mut rx) = broadcast::channel(8);
        let mut observer = ChannelObserver::new(tx);

        observer.on_error(&ScanWarning::permission_denied("/x"));
        observer.on_progress(Path::new("/y"), &Aggregates::new());

        assert!(matches!(rx.try_recv().unwrap(), ScanEvent::Warning(_)));
        match rx.try_recv().unwrap() {
            ScanEvent::Progress(progress) => {
                assert_eq!(progress.errors_count, 1);
                assert_eq!(progress.current_path, Path::new("/y"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_channel_observer_without_receivers() {
        let (tx, rx) = broadcast::channel(1);
        drop(rx);
        let mut observer = ChannelObserver::new(tx);
        observer.on_progress(Path::new("/"), &Aggregates::new());
    }
}

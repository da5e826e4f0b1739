//! Background scanning on the tokio blocking pool.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use dugroup_core::{Aggregates, ScanConfig, ScanError};

use crate::observer::ChannelObserver;
use crate::progress::ScanEvent;
use crate::scanner::Scanner;

/// Capacity of the event channel; slower receivers observe `Lagged`.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handle to a scan running in the background.
pub struct ScanHandle {
    events: broadcast::Sender<ScanEvent>,
    cancel: CancellationToken,
    task: JoinHandle<Result<Aggregates, ScanError>>,
}

impl ScanHandle {
    /// Subscribe to progress and warning events.
    ///
    /// Only events sent after subscribing are received.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.events.subscribe()
    }

    /// Request the scan to stop at the next directory descent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the running scan.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the scan to complete.
    pub async fn join(self) -> Result<Aggregates, ScanError> {
        self.task.await.unwrap_or_else(|e| {
            Err(ScanError::Other {
                message: e.to_string(),
            })
        })
    }
}

/// Start a scan on tokio's blocking pool.
///
/// Must be called from within a tokio runtime. Returns a receiver subscribed
/// before the scan starts, so no event is missed, alongside the handle.
pub fn spawn_scan(config: ScanConfig) -> (ScanHandle, broadcast::Receiver<ScanEvent>) {
    let (tx, rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();

    let scanner = Scanner::with_cancellation(cancel.clone());
    let mut observer = ChannelObserver::new(tx.clone());
    let task = tokio::task::spawn_blocking(move || scanner.scan(&config, &mut observer));

    let handle = ScanHandle {
        events: tx,
        cancel,
        task,
    };
    (handle, rx)
}

//! Filesystem traversal and aggregation engine for dugroup.
//!
//! # Overview
//!
//! `dugroup-scan` walks a directory tree and attributes every entry beneath
//! the root to a group derived by the configured [`GroupingMode`]. Key
//! properties:
//!
//! - **Sequential, depth-first** walk by default with reproducible progress
//! - **Symlinks skipped** entirely, never counted or followed
//! - **Resilient**: unreadable entries are reported and skipped
//! - **Optional parallel walk** via jwalk, and cancellation at each descent
//!
//! # Example
//!
//! ```rust,no_run
//! use dugroup_scan::{GroupingMode, ScanConfig, Scanner, SilentObserver};
//!
//! let config = ScanConfig::new("/path/to/scan").with_grouping(GroupingMode::Extension);
//! let aggregates = Scanner::new().scan(&config, &mut SilentObserver).unwrap();
//!
//! for stat in &aggregates {
//!     println!("{}: {} bytes in {} files", stat.group, stat.size, stat.files);
//! }
//! ```
//!
//! # Background scans
//!
//! ```rust,no_run
//! use dugroup_scan::{ScanConfig, ScanEvent, spawn_scan};
//!
//! # async fn run() {
//! let (handle, mut events) = spawn_scan(ScanConfig::new("/path/to/scan"));
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if let ScanEvent::Progress(progress) = event {
//!             println!("Scanning {}", progress.current_path.display());
//!         }
//!     }
//! });
//!
//! let aggregates = handle.join().await.unwrap();
//! # }
//! ```

mod background;
mod observer;
mod parallel;
mod progress;
mod scanner;
mod state;

pub use background::{EVENT_CHANNEL_CAPACITY, ScanHandle, spawn_scan};
pub use observer::{ChannelObserver, FnObserver, ScanObserver, SilentObserver, WarningCollector};
pub use progress::{ScanEvent, ScanProgress};
pub use scanner::{ScanSummary, Scanner};
pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use dugroup_core::{
    AggregateStat, Aggregates, GroupKey, GroupingMode, ScanConfig, ScanError, ScanWarning,
    WarningKind,
};

//! Transient per-scan traversal state.

use std::ffi::OsStr;
use std::path::Path;

use compact_str::CompactString;

use dugroup_core::{Aggregates, EntryMeta, GroupingMode};

/// Segment history from the root plus the running aggregates.
///
/// Owned by exactly one in-flight scan.
#[derive(Debug)]
pub(crate) struct ScanState {
    mode: GroupingMode,
    segments: Vec<CompactString>,
    aggregates: Aggregates,
}

impl ScanState {
    pub fn new(mode: GroupingMode) -> Self {
        Self {
            mode,
            segments: Vec::new(),
            aggregates: Aggregates::new(),
        }
    }

    /// Descend into a child entry.
    pub fn enter(&mut self, name: &OsStr) {
        self.segments.push(CompactString::from(name.to_string_lossy()));
    }

    /// Return to the parent entry.
    pub fn leave(&mut self) {
        self.segments.pop();
    }

    /// Replace the history with the segments of a root-relative path.
    pub fn reset_to(&mut self, relative: &Path) {
        self.segments.clear();
        for component in relative.components() {
            self.enter(component.as_os_str());
        }
    }

    /// Record the current entry. The root and symlinks are never recorded.
    pub fn record(&mut self, meta: &EntryMeta) {
        if meta.kind.is_symlink() {
            return;
        }
        let Some(key) = self.mode.key_for(&self.segments, meta) else {
            return;
        };

        let stat = self.aggregates.entry(key, self.mode.is_directory_bucket(meta));
        if meta.is_dir() {
            stat.record_dir();
        } else {
            stat.record_file(meta.size);
        }
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn into_aggregates(self) -> Aggregates {
        self.aggregates
    }
}

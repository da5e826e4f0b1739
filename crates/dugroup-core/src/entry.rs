//! Filesystem entry metadata used for classification and grouping.

use std::fs::Metadata;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// File metadata timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Last modification time.
    pub modified: SystemTime,
    /// Creation time (if available, platform-dependent).
    pub created: Option<SystemTime>,
}

impl Timestamps {
    /// Create timestamps with only modified time.
    pub fn with_modified(modified: SystemTime) -> Self {
        Self {
            modified,
            created: None,
        }
    }

    /// Create timestamps with all available times.
    pub fn new(modified: SystemTime, created: Option<SystemTime>) -> Self {
        Self { modified, created }
    }

    /// Creation time, falling back to the modification time where the
    /// platform or filesystem does not record one.
    pub fn created_or_modified(&self) -> SystemTime {
        self.created.unwrap_or(self.modified)
    }
}

/// Type of filesystem entry, as seen by a link-aware stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed).
    Symlink,
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink)
    }
}

/// The subset of an entry's metadata the scanner works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Entry type.
    pub kind: EntryKind,
    /// Length in bytes.
    pub size: u64,
    /// Entry timestamps.
    pub timestamps: Timestamps,
}

impl EntryMeta {
    /// Create metadata for a regular file.
    pub fn file(size: u64, timestamps: Timestamps) -> Self {
        Self {
            kind: EntryKind::File,
            size,
            timestamps,
        }
    }

    /// Create metadata for a directory.
    pub fn directory(timestamps: Timestamps) -> Self {
        Self {
            kind: EntryKind::Directory,
            size: 0,
            timestamps,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

impl From<&Metadata> for EntryMeta {
    /// Build from `symlink_metadata`; a followed stat never reports links.
    ///
    /// Where the platform cannot report a modification time, `modified` is
    /// the Unix epoch, so date grouping files the entry under 1970-01-01 (or
    /// the day before, west of UTC).
    fn from(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Self {
            kind,
            size: metadata.len(),
            timestamps: Timestamps::new(
                metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
                metadata.created().ok(),
            ),
        }
    }
}

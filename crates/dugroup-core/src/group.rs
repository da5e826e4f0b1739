//! Grouping modes and group-key derivation.

use std::borrow::Borrow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::entry::EntryMeta;
use crate::error::ScanError;

/// Group key for files without an extension.
pub const NO_EXTENSION: &str = "<none>";

/// Group key for the scan root in path grouping.
pub const ROOT_GROUP: &str = ".";

/// Identifies the bucket an entry's statistics are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(CompactString);

impl GroupKey {
    /// Create a group key.
    pub fn new(key: impl Into<CompactString>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for GroupKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for GroupKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Strategy for deriving a group key from an entry.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupingMode {
    /// First path segment beneath the scan root.
    #[default]
    Tld,
    /// File extension including the dot, or `<none>`.
    Extension,
    /// Containing directory relative to the scan root.
    #[strum(to_string = "path", serialize = "directory")]
    #[serde(alias = "directory")]
    Path,
    /// Modification date, `YYYY-MM-DD`.
    Modified,
    /// Creation date, `YYYY-MM-DD`.
    Created,
}

impl GroupingMode {
    /// Parse a grouping mode, failing with `InvalidArgument`.
    pub fn parse(value: &str) -> Result<Self, ScanError> {
        value
            .parse()
            .map_err(|_| ScanError::invalid_field("group", value, Self::VARIANTS))
    }

    /// Whether groups in this mode stand for directories of the tree.
    pub fn is_folder_grouping(&self) -> bool {
        matches!(self, Self::Tld | Self::Path)
    }

    /// Derive the group key for an entry.
    ///
    /// `segments` is the path from the scan root to the entry, one name per
    /// level. The root itself (no segments) has no group.
    pub fn key_for(&self, segments: &[CompactString], meta: &EntryMeta) -> Option<GroupKey> {
        let (name, parents) = segments.split_last()?;

        let key = match self {
            Self::Tld => segments[0].clone(),
            Self::Extension => extension_of(name),
            Self::Path => {
                if parents.is_empty() {
                    CompactString::const_new(ROOT_GROUP)
                } else {
                    let dir: PathBuf = parents.iter().map(|s| s.as_str()).collect();
                    CompactString::from(dir.to_string_lossy())
                }
            }
            Self::Modified => format_date(meta.timestamps.modified),
            Self::Created => format_date(meta.timestamps.created_or_modified()),
        };

        Some(GroupKey(key))
    }

    /// Whether a group created for this entry is a directory bucket.
    pub fn is_directory_bucket(&self, meta: &EntryMeta) -> bool {
        match self {
            Self::Tld => meta.is_dir(),
            Self::Path => true,
            _ => false,
        }
    }
}

fn extension_of(name: &str) -> CompactString {
    match Path::new(name).extension() {
        Some(ext) => {
            let mut key = CompactString::const_new(".");
            key.push_str(&ext.to_string_lossy());
            key
        }
        None => CompactString::const_new(NO_EXTENSION),
    }
}

fn format_date(time: SystemTime) -> CompactString {
    let local: DateTime<Local> = time.into();
    CompactString::from(local.format("%Y-%m-%d").to_string())
}

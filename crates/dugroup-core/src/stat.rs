//! Per-group aggregate statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::ScanError;
use crate::group::GroupKey;

/// Accumulated totals for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStat {
    /// The group key.
    pub group: GroupKey,
    /// Total bytes of files in this group.
    pub size: u64,
    /// Number of files in this group.
    pub files: u64,
    /// Number of directories in this group.
    pub directories: u64,
    /// Whether this group stands for a directory of the tree.
    pub is_directory: bool,
}

impl AggregateStat {
    /// Create an empty aggregate for a group.
    pub fn new(group: GroupKey, is_directory: bool) -> Self {
        Self {
            group,
            size: 0,
            files: 0,
            directories: 0,
            is_directory,
        }
    }

    /// Record a file.
    pub fn record_file(&mut self, size: u64) {
        self.files += 1;
        self.size += size;
    }

    /// Record a directory.
    pub fn record_dir(&mut self) {
        self.directories += 1;
    }
}

/// Field used for sorting and totals.
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
pub enum SortField {
    Files,
    #[default]
    Size,
    Directories,
}

impl SortField {
    /// Parse a sort field, failing with `InvalidArgument`.
    pub fn parse(value: &str) -> Result<Self, ScanError> {
        value
            .parse()
            .map_err(|_| ScanError::invalid_field("sort", value, Self::VARIANTS))
    }

    /// Read this field from an aggregate.
    pub fn value(&self, stat: &AggregateStat) -> u64 {
        match self {
            Self::Files => stat.files,
            Self::Size => stat.size,
            Self::Directories => stat.directories,
        }
    }
}

/// Grand totals over a whole aggregate mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub size: u64,
    pub files: u64,
    pub directories: u64,
}

impl Totals {
    /// Read one field of the totals.
    pub fn get(&self, field: SortField) -> u64 {
        match field {
            SortField::Files => self.files,
            SortField::Size => self.size,
            SortField::Directories => self.directories,
        }
    }
}

/// Mapping from group key to aggregate, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregates {
    groups: IndexMap<GroupKey, AggregateStat>,
}

impl Aggregates {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the aggregate for `key`, creating it on first encounter.
    ///
    /// `is_directory` only applies when the group is created.
    pub fn entry(&mut self, key: GroupKey, is_directory: bool) -> &mut AggregateStat {
        self.groups
            .entry(key)
            .or_insert_with_key(|key| AggregateStat::new(key.clone(), is_directory))
    }

    /// Look up a group.
    pub fn get(&self, key: &str) -> Option<&AggregateStat> {
        self.groups.get(key)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no group has been recorded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over aggregates in first-encounter order.
    pub fn values(&self) -> impl Iterator<Item = &AggregateStat> {
        self.groups.values()
    }

    /// Sum of one field over every group.
    pub fn total(&self, field: SortField) -> u64 {
        self.values().map(|stat| field.value(stat)).sum()
    }

    /// Sums of all fields over every group.
    pub fn totals(&self) -> Totals {
        self.values().fold(Totals::default(), |mut acc, stat| {
            acc.size += stat.size;
            acc.files += stat.files;
            acc.directories += stat.directories;
            acc
        })
    }
}

impl FromIterator<AggregateStat> for Aggregates {
    fn from_iter<I: IntoIterator<Item = AggregateStat>>(iter: I) -> Self {
        Self {
            groups: iter
                .into_iter()
                .map(|stat| (stat.group.clone(), stat))
                .collect(),
        }
    }
}

impl IntoIterator for Aggregates {
    type Item = AggregateStat;
    type IntoIter = indexmap::map::IntoValues<GroupKey, AggregateStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_values()
    }
}

impl<'a> IntoIterator for &'a Aggregates {
    type Item = &'a AggregateStat;
    type IntoIter = indexmap::map::Values<'a, GroupKey, AggregateStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.values()
    }
}

//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::group::GroupingMode;
use crate::stat::SortField;

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// How entries are grouped.
    #[builder(default)]
    #[serde(default)]
    pub grouping: GroupingMode,

    /// Number of threads for scanning (0 = sequential walk).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            grouping: GroupingMode::default(),
            threads: 0,
        }
    }

    /// Set the grouping mode.
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = grouping;
        self
    }

    /// Whether the parallel walker should be used.
    pub fn is_parallel(&self) -> bool {
        self.threads > 0
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl From<ScanConfigBuilderError> for ScanError {
    fn from(err: ScanConfigBuilderError) -> Self {
        ScanError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

/// Validate user-supplied group and sort fields before any scanning.
///
/// The sort field is checked first.
pub fn validate_args(group: &str, sort: &str) -> Result<(GroupingMode, SortField), ScanError> {
    let sort = SortField::parse(sort)?;
    let group = GroupingMode::parse(group)?;
    Ok((group, sort))
}

//! Sorting, filtering, truncation and totals.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use tracing::trace;

use dugroup_core::{AggregateStat, Aggregates, GroupingMode, ScanError, SortField, Totals};

/// Number of rows shown when no count is given.
pub const DEFAULT_COUNT: usize = 15;

/// Restricts a report to directory or non-directory groups.
///
/// Only meaningful for grouping modes that produce directory buckets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryFilter {
    #[default]
    All,
    Directories,
    Files,
}

impl EntryFilter {
    /// Parse a filter, failing with `InvalidArgument`.
    pub fn parse(value: &str) -> Result<Self, ScanError> {
        value.parse().map_err(|_| {
            ScanError::invalid_argument(format!(
                "invalid filter '{value}', possible values are '{}'",
                Self::VARIANTS.join(", ")
            ))
        })
    }

    /// Check if an aggregate passes the filter.
    pub fn accepts(&self, stat: &AggregateStat) -> bool {
        match self {
            Self::All => true,
            Self::Directories => stat.is_directory,
            Self::Files => !stat.is_directory,
        }
    }
}

/// Configuration for building a report.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct ReportConfig {
    /// Field to sort by.
    #[builder(default)]
    #[serde(default)]
    pub sort: SortField,

    /// Maximum number of rows.
    #[builder(default = "DEFAULT_COUNT")]
    #[serde(default = "default_count")]
    pub count: usize,

    /// Show the smallest rows first.
    #[builder(default = "false")]
    #[serde(default)]
    pub reverse: bool,

    /// Directory/file restriction.
    #[builder(default)]
    #[serde(default)]
    pub filter: EntryFilter,
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sort: SortField::default(),
            count: DEFAULT_COUNT,
            reverse: false,
            filter: EntryFilter::All,
        }
    }
}

impl ReportConfig {
    /// Create a new config builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }
}

/// Rows to display plus grand totals over the whole scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Grouping the aggregates were built with.
    pub grouping: GroupingMode,
    /// Field the rows are ordered by.
    pub sort: SortField,
    /// Displayed rows, in display order.
    pub rows: Vec<AggregateStat>,
    /// Sums over every group, not just the displayed rows.
    pub totals: Totals,
    /// Number of groups in the scan.
    pub group_count: usize,
}

impl Report {
    /// Number of groups left out of the displayed rows.
    pub fn hidden_groups(&self) -> usize {
        self.group_count.saturating_sub(self.rows.len())
    }

    /// A row's share of the total size, in percent.
    pub fn size_share(&self, stat: &AggregateStat) -> f64 {
        if self.totals.size > 0 {
            stat.size as f64 / self.totals.size as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Turns completed aggregates into ordered report rows.
pub struct ReportProcessor {
    config: ReportConfig,
}

impl ReportProcessor {
    /// Create a processor with the default config.
    pub fn new() -> Self {
        Self {
            config: ReportConfig::default(),
        }
    }

    /// Create a processor with a custom config.
    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Order, filter and truncate the aggregates.
    ///
    /// The pipeline is fixed: stable ascending sort, reverse, filter, take
    /// `count`, then reverse again if requested. Ties keep their mapping
    /// order through the sort and are then inverted with everything else.
    pub fn process(&self, aggregates: &Aggregates) -> Vec<AggregateStat> {
        let ReportConfig {
            sort,
            count,
            reverse,
            filter,
        } = self.config;

        let mut rows: Vec<&AggregateStat> = aggregates.values().collect();
        rows.sort_by_key(|stat| sort.value(stat));
        rows.reverse();

        let mut rows: Vec<AggregateStat> = rows
            .into_iter()
            .filter(|stat| filter.accepts(stat))
            .take(count)
            .cloned()
            .collect();

        if reverse {
            rows.reverse();
        }

        trace!(rows = rows.len(), groups = aggregates.len(), %sort, "processed report");
        rows
    }

    /// Build a full report for aggregates grouped by `grouping`.
    pub fn report(&self, aggregates: &Aggregates, grouping: GroupingMode) -> Report {
        Report {
            grouping,
            sort: self.config.sort,
            rows: self.process(aggregates),
            totals: aggregates.totals(),
            group_count: aggregates.len(),
        }
    }
}

impl Default for ReportProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of one field over the entire mapping.
pub fn totals(aggregates: &Aggregates, field: SortField) -> u64 {
    aggregates.total(field)
}

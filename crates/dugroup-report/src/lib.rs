//! Report processing for dugroup.
//!
//! Takes the aggregate mapping produced by a scan and turns it into the rows
//! to display: sorted by a field, optionally restricted to directory or file
//! groups, truncated to a count and optionally reversed. Totals are always
//! computed over the whole mapping.
//!
//! ```rust
//! use dugroup_core::{AggregateStat, Aggregates, SortField};
//! use dugroup_report::{ReportConfig, ReportProcessor, totals};
//!
//! let aggregates: Aggregates = [("A", 300), ("B", 100), ("C", 200)]
//!     .into_iter()
//!     .map(|(group, size)| AggregateStat { size, ..AggregateStat::new(group.into(), false) })
//!     .collect();
//!
//! let config = ReportConfig::builder().count(2usize).build().unwrap();
//! let rows = ReportProcessor::with_config(config).process(&aggregates);
//!
//! let groups: Vec<_> = rows.iter().map(|s| s.group.as_str()).collect();
//! assert_eq!(groups, ["A", "C"]);
//! assert_eq!(totals(&aggregates, SortField::Size), 600);
//! ```

mod processor;

pub use processor::{
    DEFAULT_COUNT, EntryFilter, Report, ReportConfig, ReportConfigBuilder, ReportProcessor, totals,
};

// Re-export core types
pub use dugroup_core::{AggregateStat, Aggregates, SortField, Totals};

//! Core types for dugroup.
//!
//! This crate provides the data structures shared by the scanner and the
//! report processor: grouping modes and group-key derivation, per-group
//! aggregates, scan configuration and the error types.

mod config;
mod entry;
mod error;
mod group;
mod stat;

pub use config::{ScanConfig, ScanConfigBuilder, validate_args};
pub use entry::{EntryKind, EntryMeta, Timestamps};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use group::{GroupKey, GroupingMode, NO_EXTENSION, ROOT_GROUP};
pub use stat::{AggregateStat, Aggregates, SortField, Totals};

use dugroup_core::GroupingMode;
use dugroup_report::{
    AggregateStat, Aggregates, EntryFilter, ReportConfig, ReportProcessor, SortField, totals,
};

fn sized(entries: &[(&str, u64)]) -> Aggregates {
    entries
        .iter()
        .map(|&(group, size)| AggregateStat {
            size,
            files: 1,
            ..AggregateStat::new(group.into(), false)
        })
        .collect()
}

fn groups(rows: &[AggregateStat]) -> Vec<&str> {
    rows.iter().map(|s| s.group.as_str()).collect()
}

fn process(aggregates: &Aggregates, config: ReportConfig) -> Vec<AggregateStat> {
    ReportProcessor::with_config(config).process(aggregates)
}

#[test]
fn test_largest_first_truncated() {
    let aggregates = sized(&[("A", 300), ("B", 100), ("C", 200)]);
    let config = ReportConfig::builder().count(2usize).build().unwrap();
    assert_eq!(groups(&process(&aggregates, config)), ["A", "C"]);
}

#[test]
fn test_reverse_applies_after_truncation() {
    let aggregates = sized(&[("A", 300), ("B", 100), ("C", 200)]);
    let config = ReportConfig::builder()
        .count(2usize)
        .reverse(true)
        .build()
        .unwrap();
    assert_eq!(groups(&process(&aggregates, config)), ["C", "A"]);
}

#[test]
fn test_totals_cover_all_groups() {
    let aggregates = sized(&[("A", 300), ("B", 100), ("C", 200)]);
    assert_eq!(totals(&aggregates, SortField::Size), 600);
    assert_eq!(totals(&aggregates, SortField::Files), 3);
    assert_eq!(totals(&aggregates, SortField::Directories), 0);

    let config = ReportConfig::builder().count(1usize).build().unwrap();
    let report = ReportProcessor::with_config(config).report(&aggregates, GroupingMode::Tld);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.totals.size, 600);
    assert_eq!(report.hidden_groups(), 2);
    assert_eq!(report.size_share(&report.rows[0]), 50.0);
}

#[test]
fn test_zero_count_is_empty() {
    let aggregates = sized(&[("A", 300), ("B", 100)]);
    let config = ReportConfig::builder().count(0usize).build().unwrap();
    assert!(process(&aggregates, config).is_empty());
}

#[test]
fn test_empty_aggregates() {
    let aggregates = Aggregates::new();
    assert!(ReportProcessor::new().process(&aggregates).is_empty());
    assert_eq!(totals(&aggregates, SortField::Size), 0);
}

#[test]
fn test_ties_are_deterministic() {
    // Equal keys keep mapping order in the ascending sort, so the
    // descending view lists the later group first.
    let aggregates = sized(&[("first", 10), ("second", 10), ("big", 50)]);
    let rows = ReportProcessor::new().process(&aggregates);
    assert_eq!(groups(&rows), ["big", "second", "first"]);

    let again = ReportProcessor::new().process(&aggregates);
    assert_eq!(rows, again);
}

#[test]
fn test_sort_by_files() {
    let aggregates: Aggregates = [("few", 1000, 1), ("many", 10, 7), ("some", 500, 3)]
        .into_iter()
        .map(|(group, size, files)| AggregateStat {
            size,
            files,
            ..AggregateStat::new(group.into(), false)
        })
        .collect();

    let config = ReportConfig::builder()
        .sort(SortField::Files)
        .build()
        .unwrap();
    assert_eq!(groups(&process(&aggregates, config)), ["many", "some", "few"]);
}

#[test]
fn test_filter_applies_before_truncation() {
    let mut aggregates = Aggregates::new();
    aggregates.entry("dir-big".into(), true).record_file(900);
    aggregates.entry("file-mid".into(), false).record_file(500);
    aggregates.entry("dir-small".into(), true).record_file(100);
    aggregates.entry("file-low".into(), false).record_file(50);

    let dirs = ReportConfig::builder()
        .filter(EntryFilter::Directories)
        .count(2usize)
        .build()
        .unwrap();
    assert_eq!(groups(&process(&aggregates, dirs)), ["dir-big", "dir-small"]);

    let files = ReportConfig::builder()
        .filter(EntryFilter::Files)
        .count(1usize)
        .build()
        .unwrap();
    assert_eq!(groups(&process(&aggregates, files)), ["file-mid"]);
}

#[test]
fn test_report_serializes() {
    let aggregates = sized(&[("A", 300), ("B", 100)]);
    let report = ReportProcessor::new().report(&aggregates, GroupingMode::Extension);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["grouping"], "extension");
    assert_eq!(json["sort"], "size");
    assert_eq!(json["totals"]["size"], 400);
    assert_eq!(json["rows"][0]["group"], "A");
}

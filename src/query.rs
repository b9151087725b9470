use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::dataset::CostDataset;
use crate::models::Record;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Planning-group selection: every record, or one exact group value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "group", rename_all = "snake_case")]
pub enum CategoryFilter {
    All,
    Group(String),
}

impl CategoryFilter {
    /// `None` selects everything.
    pub fn from_selection(group: Option<&str>) -> Self {
        match group {
            Some(g) => Self::Group(g.to_string()),
            None => Self::All,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Group(g) => record.planning_group == *g,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Group(g) if g.is_empty() => f.write_str("(blank)"),
            Self::Group(g) => f.write_str(g),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total: f64,
    /// Superintendence subtotals, largest first; equal subtotals by ascending name.
    pub breakdown: Vec<GroupTotal>,
}

/// Records selected by `filter`, in dataset order.
pub fn working_set<'a>(dataset: &'a CostDataset, filter: &CategoryFilter) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.matches(r))
        .collect()
}

pub fn aggregate(records: &[&Record]) -> AggregateResult {
    let total: f64 = records.iter().map(|r| r.value).sum();

    // BTreeMap iterates by name and the sort is stable, so ties stay name-ascending.
    let mut by_super: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = by_super.entry(r.superintendence.as_str()).or_default();
        entry.0 += r.value;
        entry.1 += 1;
    }
    let mut breakdown: Vec<GroupTotal> = by_super
        .into_iter()
        .map(|(name, (total, count))| GroupTotal {
            name: name.to_string(),
            total,
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));

    AggregateResult { total, breakdown }
}

pub fn run(dataset: &CostDataset, filter: &CategoryFilter) -> AggregateResult {
    aggregate(&working_set(dataset, filter))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the presentation layer needs for one selection.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub filter: CategoryFilter,
    pub records: Vec<&'a Record>,
    pub aggregate: AggregateResult,
}

impl Report<'_> {
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

pub fn report<'a>(dataset: &'a CostDataset, filter: &CategoryFilter) -> Report<'a> {
    let records = working_set(dataset, filter);
    let aggregate = aggregate(&records);
    log::debug!(
        "report for {filter}: {} records, total {}",
        records.len(),
        aggregate.total
    );
    Report {
        filter: filter.clone(),
        records,
        aggregate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Columns, RawCell};

    fn dataset(rows: &[(&str, &str, f64)]) -> CostDataset {
        let headers = vec![
            "Grp.planej.manutenç.".to_string(),
            "Superintendência".to_string(),
            "Valor".to_string(),
        ];
        let rows = rows
            .iter()
            .map(|(g, s, v)| {
                vec![
                    RawCell::Text(g.to_string()),
                    RawCell::Text(s.to_string()),
                    RawCell::Number(*v),
                ]
            })
            .collect();
        CostDataset::from_rows(headers, rows, &Columns::default()).unwrap()
    }

    fn group(g: &str) -> CategoryFilter {
        CategoryFilter::Group(g.to_string())
    }

    fn pairs(result: &AggregateResult) -> Vec<(&str, f64)> {
        result
            .breakdown
            .iter()
            .map(|g| (g.name.as_str(), g.total))
            .collect()
    }

    #[test]
    fn test_three_record_scenario() {
        let ds = dataset(&[("A", "X", 100.0), ("A", "Y", 50.0), ("B", "X", 200.0)]);
        let a = run(&ds, &group("A"));
        assert_eq!(a.total, 150.0);
        assert_eq!(pairs(&a), vec![("X", 100.0), ("Y", 50.0)]);
        assert_eq!(run(&ds, &CategoryFilter::All).total, 350.0);
    }

    #[test]
    fn test_all_sums_every_record() {
        let ds = dataset(&[("A", "X", 1.25), ("B", "Y", 2.5), ("C", "Z", -0.75)]);
        let expected: f64 = ds.records().iter().map(|r| r.value).sum();
        assert_eq!(run(&ds, &CategoryFilter::All).total, expected);
    }

    #[test]
    fn test_group_filter_is_exact_and_case_sensitive() {
        let ds = dataset(&[("Civil", "X", 10.0), ("civil", "X", 20.0), ("Civil ", "X", 40.0)]);
        let set = working_set(&ds, &group("Civil"));
        assert_eq!(set.len(), 1);
        assert!(set.iter().all(|r| r.planning_group == "Civil"));
        assert_eq!(run(&ds, &group("Civil")).total, 10.0);
    }

    #[test]
    fn test_unknown_group_yields_empty_result() {
        let ds = dataset(&[("A", "X", 100.0)]);
        let result = run(&ds, &group("Z"));
        assert_eq!(result.total, 0.0);
        assert!(result.breakdown.is_empty());
        assert!(working_set(&ds, &group("Z")).is_empty());
    }

    #[test]
    fn test_breakdown_sorted_desc_with_name_tie_break() {
        let ds = dataset(&[
            ("A", "Sul", 50.0),
            ("A", "Norte", 50.0),
            ("A", "Leste", 80.0),
            ("A", "Oeste", 10.0),
            ("A", "Oeste", 15.0),
        ]);
        let result = run(&ds, &CategoryFilter::All);
        assert_eq!(
            pairs(&result),
            vec![("Leste", 80.0), ("Norte", 50.0), ("Sul", 50.0), ("Oeste", 25.0)]
        );
        assert_eq!(result.breakdown[3].count, 2);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let ds = dataset(&[
            ("A", "X", 0.1),
            ("A", "Y", 0.2),
            ("A", "X", 0.3),
            ("B", "Z", 1234.567),
            ("A", "", 9.99),
        ]);
        for filter in ds.filter_options() {
            let result = run(&ds, &filter);
            let sum: f64 = result.breakdown.iter().map(|g| g.total).sum();
            assert!((sum - result.total).abs() < 1e-9, "{filter}: {sum} vs {}", result.total);
        }
    }

    #[test]
    fn test_run_is_deterministic() {
        let ds = dataset(&[("A", "X", 0.1), ("A", "Y", 0.2), ("B", "X", 0.3)]);
        for filter in ds.filter_options() {
            assert_eq!(run(&ds, &filter), run(&ds, &filter));
        }
    }

    #[test]
    fn test_report_bundles_records_and_count() {
        let ds = dataset(&[("A", "X", 100.0), ("B", "Y", 50.0), ("A", "Y", 25.0)]);
        let r = report(&ds, &group("A"));
        assert_eq!(r.count(), 2);
        assert_eq!(r.records[0].value, 100.0);
        assert_eq!(r.records[1].value, 25.0);
        assert_eq!(r.aggregate, run(&ds, &group("A")));
        assert_eq!(r.filter, group("A"));
    }

    #[test]
    fn test_filter_display_and_selection() {
        assert_eq!(CategoryFilter::from_selection(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_selection(Some("A")), group("A"));
        assert_eq!(CategoryFilter::All.to_string(), "All");
        assert_eq!(group("").to_string(), "(blank)");
        assert_eq!(group("Mecânica").to_string(), "Mecânica");
    }
}

//! Filter selection and the filter engine.
//!
//! A [`Selection`] is rebuilt from the current UI state on every pipeline run
//! and never mutated in place. Filtering is a pure row-wise restriction: the
//! four predicates are independent per-column tests combined by logical AND,
//! so evaluation order does not matter and a single pass suffices.

use crate::table::{SalesRecord, SalesTable};
use chrono::NaiveDate;
use std::collections::HashSet;

/// The user-chosen filter state for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub branches: HashSet<String>,
    pub hours: HashSet<u8>,
    pub months: HashSet<String>,
    /// Inclusive on both ends.
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Selection {
    /// The default selection: every observed branch, hour and month, and the
    /// full observed date range. This mirrors the dashboard's widgets, which
    /// start with everything selected.
    pub fn all_of(table: &SalesTable) -> Self {
        // An empty table has no observed dates; any one-day interval works
        // since there are no rows to match.
        let (start, end) = table
            .date_range()
            .unwrap_or_else(|| (NaiveDate::MIN, NaiveDate::MIN));

        Self {
            branches: table.branches().into_iter().collect(),
            hours: table.hours().into_iter().collect(),
            months: table.months().into_iter().collect(),
            start,
            end,
        }
    }

    /// Replaces the date interval. A single date collapses to the one-day
    /// interval `[d, d]` (the date picker hands back one date while the user
    /// is mid-selection).
    pub fn with_dates(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end.unwrap_or(start);
        self
    }

    fn matches(&self, record: &SalesRecord) -> bool {
        self.branches.contains(&record.branch)
            && self.hours.contains(&record.hour)
            && self.months.contains(&record.month_name)
            && record.date >= self.start
            && record.date <= self.end
    }
}

/// Returns the rows of `table` satisfying all four predicates, in table order.
///
/// Deterministic and side-effect free: never reorders, never adds rows. Empty
/// selection sets simply yield an empty subset.
pub fn filter<'a>(table: &'a SalesTable, selection: &Selection) -> Vec<&'a SalesRecord> {
    table
        .rows()
        .iter()
        .filter(|r| selection.matches(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_support::sample_table;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_all_of_selects_everything() {
        let table = sample_table();
        let selection = Selection::all_of(&table);

        assert_eq!(filter(&table, &selection).len(), table.len());
        assert_eq!(selection.start, date("2024-01-01"));
        assert_eq!(selection.end, date("2024-02-01"));
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let table = sample_table();
        let mut selection = Selection::all_of(&table);
        selection.branches = ["BranchA".to_string()].into_iter().collect();
        selection.hours = [10].into_iter().collect();

        let subset = filter(&table, &selection);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.branch == "BranchA" && r.hour == 10));
    }

    #[test]
    fn test_empty_branch_set_yields_empty_subset() {
        let table = sample_table();
        let mut selection = Selection::all_of(&table);
        selection.branches.clear();

        assert!(filter(&table, &selection).is_empty());
    }

    #[test]
    fn test_interval_inclusive_on_both_ends() {
        let table = sample_table();
        let selection = Selection::all_of(&table).with_dates(date("2024-01-01"), Some(date("2024-01-01")));

        let subset = filter(&table, &selection);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.date == date("2024-01-01")));
    }

    #[test]
    fn test_single_date_collapses_to_one_day_interval() {
        let table = sample_table();
        let collapsed = Selection::all_of(&table).with_dates(date("2024-02-01"), None);
        let explicit = Selection::all_of(&table).with_dates(date("2024-02-01"), Some(date("2024-02-01")));

        assert_eq!(filter(&table, &collapsed), filter(&table, &explicit));
        assert_eq!(filter(&table, &collapsed).len(), 1);
    }

    #[test]
    fn test_filter_preserves_table_order() {
        let table = sample_table();
        let selection = Selection::all_of(&table);
        let subset = filter(&table, &selection);

        let expected: Vec<_> = table.rows().iter().collect();
        assert_eq!(subset, expected);
    }

    #[test]
    fn test_filter_is_idempotent() {
        // Re-filtering the subset (rebuilt as a table) changes nothing.
        let table = sample_table();
        let mut selection = Selection::all_of(&table);
        selection.branches = ["BranchA".to_string()].into_iter().collect();

        let once = filter(&table, &selection);
        let as_table = crate::table::SalesTable::new(
            once.iter().map(|r| (*r).clone()).collect(),
            table.has_units(),
        );
        let twice = filter(&as_table, &selection);

        let once_owned: Vec<_> = once.into_iter().cloned().collect();
        let twice_owned: Vec<_> = twice.into_iter().cloned().collect();
        assert_eq!(once_owned, twice_owned);
    }

    #[test]
    fn test_absent_branch_matches_nothing() {
        let table = sample_table();
        let mut selection = Selection::all_of(&table);
        selection.branches = ["BranchC".to_string()].into_iter().collect();

        assert!(filter(&table, &selection).is_empty());
    }
}

//! In-memory sales table and its row type.
//!
//! A [`SalesTable`] is immutable once built: the loader validates every row,
//! resolves the optional-units schema question once, and everything downstream
//! (filtering, aggregation, view building) only borrows from it.

use chrono::NaiveDate;
use serde::Serialize;

/// One validated row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub branch: String,
    pub hour: u8,
    pub month_name: String,
    pub product: String,
    pub total_price: f64,
    /// Present only when the source carries a `Unidades` column.
    pub units: Option<u64>,
}

/// The loaded dataset plus the one schema fact resolved at load time.
#[derive(Debug)]
pub struct SalesTable {
    rows: Vec<SalesRecord>,
    /// Whether the source schema has a `Unidades` column. Decided once from
    /// the CSV header, so the aggregator never inspects schema shape itself.
    has_units: bool,
}

impl SalesTable {
    pub fn new(rows: Vec<SalesRecord>, has_units: bool) -> Self {
        Self { rows, has_units }
    }

    pub fn rows(&self) -> &[SalesRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_units(&self) -> bool {
        self.has_units
    }

    /// Distinct branch names, in first-seen order (the order the dashboard's
    /// multiselect presents them in).
    pub fn branches(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|r| r.branch.clone()))
    }

    /// Distinct hours of day, sorted ascending.
    pub fn hours(&self) -> Vec<u8> {
        let mut hours = distinct(self.rows.iter().map(|r| r.hour));
        hours.sort_unstable();
        hours
    }

    /// Distinct month names, in first-seen order.
    pub fn months(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|r| r.month_name.clone()))
    }

    /// Minimum and maximum observed dates, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Shorthand row constructor used across the crate's unit tests.
    pub fn row(
        date: &str,
        branch: &str,
        hour: u8,
        month: &str,
        product: &str,
        total_price: f64,
        units: Option<u64>,
    ) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            branch: branch.to_string(),
            hour,
            month_name: month.to_string(),
            product: product.to_string(),
            total_price,
            units,
        }
    }

    /// The three-row dataset from the dashboard's reference scenario.
    pub fn sample_table() -> SalesTable {
        SalesTable::new(
            vec![
                row("2024-01-01", "BranchA", 10, "Enero", "Widget", 100.0, Some(2)),
                row("2024-01-01", "BranchB", 11, "Enero", "Gadget", 50.0, Some(1)),
                row("2024-02-01", "BranchA", 10, "Febrero", "Widget", 200.0, Some(4)),
            ],
            true,
        )
    }
}

//! Revenue and unit aggregation over a filtered subset.
//!
//! Aggregation runs over already-validated in-memory rows, so it cannot fail;
//! an empty subset is a normal state and produces all-zero results. Grouping
//! order is unspecified, consumers sort as they see fit.

use crate::table::SalesRecord;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Derived totals and groupings for one pipeline run. Recomputed every run,
/// never persisted.
#[derive(Debug, Default, PartialEq)]
pub struct AggregateResults {
    pub total_revenue: f64,
    pub total_units: u64,
    pub revenue_by_branch: HashMap<String, f64>,
    pub revenue_by_date: HashMap<NaiveDate, f64>,
    pub revenue_by_product: HashMap<String, f64>,
}

impl AggregateResults {
    pub fn is_empty(&self) -> bool {
        self.revenue_by_date.is_empty()
    }
}

/// Aggregates the filtered subset.
///
/// `has_units` is the schema flag resolved at load time: when the source has
/// no `Unidades` column, the unit total falls back to the subset row count.
pub fn aggregate(subset: &[&SalesRecord], has_units: bool) -> AggregateResults {
    let mut results = AggregateResults::default();

    for record in subset {
        results.total_revenue += record.total_price;

        *results
            .revenue_by_branch
            .entry(record.branch.clone())
            .or_default() += record.total_price;
        *results.revenue_by_date.entry(record.date).or_default() += record.total_price;
        *results
            .revenue_by_product
            .entry(record.product.clone())
            .or_default() += record.total_price;
    }

    results.total_units = if has_units {
        subset.iter().map(|r| r.units.unwrap_or(0)).sum()
    } else {
        subset.len() as u64
    };

    results
}

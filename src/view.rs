//! Dashboard view models.
//!
//! [`render`] is the whole dashboard as a pure function: one table, one
//! selection, one fully recomputed [`DashboardView`] per interaction. The view
//! carries everything a frontend needs and nothing it computes itself: chart
//! data, titles with the active date range, display-formatted metrics, and a
//! per-section empty state so one empty chart never blanks out the others.

use crate::aggregate::{AggregateResults, aggregate};
use crate::filter::{Selection, filter};
use crate::format::{currency, short_date, thousands};
use crate::table::SalesTable;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

const NO_DATA_WARNING: &str =
    "No hay datos para la combinación de filtros seleccionada. Por favor, ajusta los filtros.";
const NO_DATA_PRODUCTS_WARNING: &str = "No hay datos para la combinación de filtros seleccionada \
     para el gráfico de productos. Por favor, ajusta los filtros.";

/// One dashboard section: either its content or a localized "no data"
/// warning. Sections go empty independently of each other.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum Section<T> {
    Populated(T),
    Empty { warning: String },
}

impl<T> Section<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Section::Empty { .. })
    }
}

/// The option universe the UI populates its filter widgets from.
#[derive(Debug, PartialEq, Serialize)]
pub struct FilterOptions {
    pub branches: Vec<String>,
    pub hours: Vec<u8>,
    pub months: Vec<String>,
    /// `[min, max]` observed dates; `None` for an empty table.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// The two headline metrics, raw values plus display strings.
#[derive(Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub total_revenue: f64,
    pub total_units: u64,
    pub total_revenue_display: String,
    pub total_units_display: String,
}

/// Revenue share per branch, rendered as a pie.
#[derive(Debug, PartialEq, Serialize)]
pub struct BranchPie {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Slice labels show percentage and branch name.
    pub text_info: &'static str,
    /// Currency-formatted hover line per slice, matching `labels` order.
    pub hover_text: Vec<String>,
}

/// Daily revenue over the selected interval, rendered as a bar chart with a
/// range slider and zoom presets.
#[derive(Debug, PartialEq, Serialize)]
pub struct DailyBars {
    pub title: String,
    /// Sorted ascending by date.
    pub points: Vec<DailyPoint>,
    pub hover_mode: &'static str,
    pub tick_angle: u16,
    /// Plotly-style dtick for month gridlines.
    pub gridline_dtick: &'static str,
    pub range_slider: bool,
    pub range_presets: Vec<RangePreset>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// One zoom preset button on the daily chart's range selector.
#[derive(Debug, PartialEq, Serialize)]
pub struct RangePreset {
    pub label: &'static str,
    pub count: Option<u32>,
    pub step: &'static str,
    pub step_mode: &'static str,
}

fn range_presets() -> Vec<RangePreset> {
    vec![
        RangePreset { label: "1m", count: Some(1), step: "month", step_mode: "backward" },
        RangePreset { label: "6m", count: Some(6), step: "month", step_mode: "backward" },
        RangePreset { label: "YTD", count: Some(1), step: "year", step_mode: "todate" },
        RangePreset { label: "1y", count: Some(1), step: "year", step_mode: "backward" },
        RangePreset { label: "all", count: None, step: "all", step_mode: "backward" },
    ]
}

/// Revenue per product, one colored bar series each.
#[derive(Debug, PartialEq, Serialize)]
pub struct ProductBars {
    pub title: String,
    /// Sorted ascending by product name.
    pub bars: Vec<ProductBar>,
    pub tick_angle: u16,
    pub color_per_product: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ProductBar {
    pub product: String,
    pub revenue: f64,
}

/// Everything one pipeline run hands the presentation layer.
#[derive(Debug, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter_options: FilterOptions,
    pub metrics: Section<Metrics>,
    pub branch_pie: Section<BranchPie>,
    pub daily_bars: Section<DailyBars>,
    pub product_bars: Section<ProductBars>,
}

/// Runs filter and aggregation over `table` under `selection` and builds the
/// complete view. Pure and deterministic; re-invoked in full per interaction.
pub fn render(table: &SalesTable, selection: &Selection) -> DashboardView {
    let subset = filter(table, selection);
    let results = aggregate(&subset, table.has_units());

    debug!(
        rows = subset.len(),
        total_revenue = results.total_revenue,
        "Pipeline run complete"
    );

    let period = format!(
        "({} - {})",
        short_date(selection.start),
        short_date(selection.end)
    );

    DashboardView {
        filter_options: FilterOptions {
            branches: table.branches(),
            hours: table.hours(),
            months: table.months(),
            date_range: table.date_range(),
        },
        metrics: metrics_section(&results),
        branch_pie: branch_pie_section(&results, &period),
        daily_bars: daily_bars_section(&results, &period),
        product_bars: product_bars_section(&results, &period),
    }
}

fn metrics_section(results: &AggregateResults) -> Section<Metrics> {
    if results.is_empty() {
        return Section::Empty {
            warning: NO_DATA_WARNING.to_string(),
        };
    }

    Section::Populated(Metrics {
        total_revenue: results.total_revenue,
        total_units: results.total_units,
        total_revenue_display: currency(results.total_revenue),
        total_units_display: thousands(results.total_units),
    })
}

fn branch_pie_section(results: &AggregateResults, period: &str) -> Section<BranchPie> {
    if results.is_empty() {
        return Section::Empty {
            warning: NO_DATA_WARNING.to_string(),
        };
    }

    let mut by_branch: Vec<(&String, &f64)> = results.revenue_by_branch.iter().collect();
    by_branch.sort_by(|a, b| a.0.cmp(b.0));

    Section::Populated(BranchPie {
        title: format!("Distribución de Ventas por Sucursal {period}"),
        labels: by_branch.iter().map(|(b, _)| (*b).clone()).collect(),
        values: by_branch.iter().map(|(_, v)| **v).collect(),
        text_info: "percent+label",
        hover_text: by_branch
            .iter()
            .map(|(b, v)| format!("{b}: {}", currency(**v)))
            .collect(),
    })
}

fn daily_bars_section(results: &AggregateResults, period: &str) -> Section<DailyBars> {
    if results.is_empty() {
        return Section::Empty {
            warning: NO_DATA_WARNING.to_string(),
        };
    }

    let mut points: Vec<DailyPoint> = results
        .revenue_by_date
        .iter()
        .map(|(date, revenue)| DailyPoint {
            date: *date,
            revenue: *revenue,
        })
        .collect();
    points.sort_by_key(|p| p.date);

    Section::Populated(DailyBars {
        title: format!("Ventas Diarias por Fecha {period}"),
        points,
        hover_mode: "x unified",
        tick_angle: 45,
        gridline_dtick: "M1",
        range_slider: true,
        range_presets: range_presets(),
    })
}

fn product_bars_section(results: &AggregateResults, period: &str) -> Section<ProductBars> {
    if results.is_empty() {
        return Section::Empty {
            warning: NO_DATA_PRODUCTS_WARNING.to_string(),
        };
    }

    let mut bars: Vec<ProductBar> = results
        .revenue_by_product
        .iter()
        .map(|(product, revenue)| ProductBar {
            product: product.clone(),
            revenue: *revenue,
        })
        .collect();
    bars.sort_by(|a, b| a.product.cmp(&b.product));

    Section::Populated(ProductBars {
        title: format!("Análisis de Costos vs Utilidad por Producto {period}"),
        bars,
        tick_angle: 45,
        color_per_product: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_support::sample_table;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_render_full_selection() {
        let table = sample_table();
        let view = render(&table, &Selection::all_of(&table));

        let Section::Populated(metrics) = &view.metrics else {
            panic!("metrics should be populated");
        };
        assert_eq!(metrics.total_revenue, 350.0);
        assert_eq!(metrics.total_units, 7);
        assert_eq!(metrics.total_revenue_display, "$350.00");
        assert_eq!(metrics.total_units_display, "7");

        let Section::Populated(pie) = &view.branch_pie else {
            panic!("pie should be populated");
        };
        assert_eq!(pie.labels, vec!["BranchA", "BranchB"]);
        assert_eq!(pie.values, vec![300.0, 50.0]);
        assert_eq!(pie.text_info, "percent+label");
        assert_eq!(pie.hover_text[0], "BranchA: $300.00");
    }

    #[test]
    fn test_titles_embed_interval_as_dd_mm_yyyy() {
        let table = sample_table();
        let view = render(&table, &Selection::all_of(&table));

        let Section::Populated(pie) = &view.branch_pie else {
            panic!("pie should be populated");
        };
        assert_eq!(
            pie.title,
            "Distribución de Ventas por Sucursal (01/01/2024 - 01/02/2024)"
        );

        let Section::Populated(daily) = &view.daily_bars else {
            panic!("daily bars should be populated");
        };
        assert!(daily.title.ends_with("(01/01/2024 - 01/02/2024)"));
    }

    #[test]
    fn test_daily_points_sorted_by_date() {
        let table = sample_table();
        let view = render(&table, &Selection::all_of(&table));

        let Section::Populated(daily) = &view.daily_bars else {
            panic!("daily bars should be populated");
        };
        assert_eq!(daily.points.len(), 2);
        assert_eq!(daily.points[0].date, date("2024-01-01"));
        assert_eq!(daily.points[0].revenue, 150.0);
        assert_eq!(daily.points[1].date, date("2024-02-01"));
        assert_eq!(daily.points[1].revenue, 200.0);
        assert_eq!(daily.hover_mode, "x unified");
        assert!(daily.range_slider);
        assert_eq!(daily.range_presets.len(), 5);
        assert_eq!(daily.range_presets[2].label, "YTD");
    }

    #[test]
    fn test_every_section_goes_empty_independently() {
        let table = sample_table();
        let mut selection = Selection::all_of(&table);
        selection.branches.clear();

        let view = render(&table, &selection);

        assert!(view.metrics.is_empty());
        assert!(view.branch_pie.is_empty());
        assert!(view.daily_bars.is_empty());
        assert!(view.product_bars.is_empty());

        // Filter options still describe the whole table so the user can
        // adjust the widgets out of the empty state.
        assert_eq!(view.filter_options.branches, vec!["BranchA", "BranchB"]);

        let Section::Empty { warning } = &view.product_bars else {
            panic!("product bars should be empty");
        };
        assert!(warning.contains("gráfico de productos"));
    }

    #[test]
    fn test_view_serializes_to_json() {
        let table = sample_table();
        let view = render(&table, &Selection::all_of(&table));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["metrics"]["state"], "populated");
        assert_eq!(
            json["metrics"]["content"]["total_revenue_display"],
            "$350.00"
        );
        assert_eq!(json["daily_bars"]["content"]["points"][0]["date"], "2024-01-01");
    }
}

//! Display formatting for metrics and chart titles.

use chrono::NaiveDate;

/// Formats a currency amount with two decimals and comma thousands
/// separators: `1234567.891` becomes `$1,234,567.89`.
pub fn currency(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    format!("${}.{}", group_thousands(integer_part), decimal_part)
}

/// Formats a count with comma thousands separators: `1234` becomes `1,234`.
pub fn thousands(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Formats a date as `DD/MM/YYYY`, the format chart titles embed.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 && c != '-' {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

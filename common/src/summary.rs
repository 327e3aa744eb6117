use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::category::Category;
use crate::constants::MONTHS;
use crate::report::Report;

/// Per-category rollup for the analytics view: the current reporting period
/// against everything on record. Income figures sum the frozen `net_income`,
/// never a recomputation from debit and credit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: Category,
    pub current_month_income: f64,
    pub current_month_count: usize,
    pub overall_income: f64,
    pub overall_count: usize,
}

#[must_use]
pub fn summarize(reports: &[Report], month: &str, year: &str) -> Vec<CategorySummary> {
    Category::ALL
        .iter()
        .map(|&category| {
            let mut summary = CategorySummary {
                category,
                current_month_income: 0.0,
                current_month_count: 0,
                overall_income: 0.0,
                overall_count: 0,
            };
            for report in reports.iter().filter(|r| r.category == category) {
                summary.overall_income += report.net_income;
                summary.overall_count = summary.overall_count.saturating_add(1);
                if report.month == month && report.year == year {
                    summary.current_month_income += report.net_income;
                    summary.current_month_count = summary.current_month_count.saturating_add(1);
                }
            }
            summary
        })
        .collect()
}

/// The current (month name, year) pair in the fixed month menu spelling.
#[must_use]
pub fn current_period() -> (String, String) {
    let now = Utc::now();
    let month_index = usize::try_from(now.month0()).unwrap_or(0);
    let month = MONTHS.get(month_index).copied().unwrap_or("Januari");
    (month.to_string(), now.year().to_string())
}

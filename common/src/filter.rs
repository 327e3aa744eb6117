use crate::category::Category;
use crate::report::Report;

/// Review-view filter. Every present criterion must match; an empty filter
/// matches everything.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub pppk_name: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub category: Option<Category>,
    /// Case-insensitive substring over the entrepreneur name.
    pub search: Option<String>,
}

impl ReportFilter {
    #[must_use]
    pub fn matches(&self, report: &Report) -> bool {
        let by_pppk = self.pppk_name.as_ref().is_none_or(|n| &report.pppk_name == n);
        let by_month = self.month.as_ref().is_none_or(|m| &report.month == m);
        let by_year = self.year.as_ref().is_none_or(|y| &report.year == y);
        let by_category = self.category.is_none_or(|c| report.category == c);
        let by_search = self.search.as_ref().is_none_or(|needle| {
            report
                .entrepreneur_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        by_pppk && by_month && by_year && by_category && by_search
    }

    #[must_use]
    pub fn apply<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        reports.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Number of pages needed for `total` rows, at least 1-sized pages.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// 1-based page slice; out-of-range pages come back empty.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size);
    let end = start.saturating_add(size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

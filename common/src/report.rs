use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::reportid::ReportId;

/// A single monthly financial submission tied to one entrepreneur and one
/// category. Wire names are fixed by the remote sheet; reports are created
/// and deleted, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub month: String,
    pub year: String,
    pub pppk_name: String,
    pub category: Category,
    pub entrepreneur_name: String,
    pub debit: f64,
    pub credit: f64,
    /// Frozen at submission time, never recomputed on read.
    pub net_income: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Form payload for a new submission. `submit` assigns the id, stamps the
/// timestamp and freezes the net income.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub pppk_name: String,
    pub month: String,
    pub year: String,
    pub category: Category,
    pub entrepreneur_name: String,
    pub debit: f64,
    pub credit: f64,
    pub document_url: Option<String>,
}

impl ReportDraft {
    #[must_use]
    pub fn submit(self) -> Report {
        Report {
            id: ReportId::generate(),
            month: self.month,
            year: self.year,
            pppk_name: self.pppk_name,
            category: self.category,
            entrepreneur_name: self.entrepreneur_name,
            debit: self.debit,
            credit: self.credit,
            net_income: self.debit - self.credit,
            document_url: self.document_url,
            submitted_at: Utc::now(),
        }
    }
}

/// Newest submission first; the display order everywhere.
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

use tracing::warn;

use common::constants::REPORTS_KEY;
use common::{Report, ReportId};

use crate::SyncError;
use crate::store::KeyValueStore;

/// The report-collection blob. Reads never fail: a missing, unreadable or
/// malformed blob is an empty collection.
pub(crate) struct ReportCache<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ReportCache<'a> {
    pub(crate) const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub(crate) fn load(&self) -> Vec<Report> {
        let blob = match self.store.get(REPORTS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Report cache unreadable, treating as empty: {e}");
                return Vec::new();
            }
        };
        serde_json::from_str(&blob).unwrap_or_else(|e| {
            warn!("Report cache malformed, treating as empty: {e}");
            Vec::new()
        })
    }

    pub(crate) fn replace(&self, reports: &[Report]) -> Result<(), SyncError> {
        let blob = serde_json::to_string(reports)?;
        self.store.set(REPORTS_KEY, &blob)?;
        Ok(())
    }

    pub(crate) fn prepend(&self, report: Report) -> Result<(), SyncError> {
        let mut reports = self.load();
        reports.insert(0, report);
        self.replace(&reports)
    }

    pub(crate) fn remove(&self, id: &ReportId) -> Result<(), SyncError> {
        let mut reports = self.load();
        reports.retain(|r| &r.id != id);
        self.replace(&reports)
    }
}

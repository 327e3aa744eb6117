use tracing::{debug, warn};

use common::{DeleteCommand, Report, ReportId, sort_newest_first};

use crate::cache::ReportCache;
use crate::outbox::{self, Outbox, PendingWrite};
use crate::{SyncClient, SyncError};

/// One world view of the report collection. `live` is true when the rows came
/// from the remote store on this call rather than the local fallback cache.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub reports: Vec<Report>,
    pub live: bool,
}

pub struct ReportsApi<'a> {
    client: &'a SyncClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) const fn new(client: &'a SyncClient) -> Self {
        Self { client }
    }

    /// Current world view, newest first. Never fails: any remote trouble
    /// (unreachable, bad status, malformed payload) degrades to the cached
    /// rows and is signalled only through [`Snapshot::live`]. The cache is
    /// refreshed only on a successful remote read.
    pub fn fetch(&self) -> Snapshot {
        let store = self.client.store();
        let cache = ReportCache::new(store);
        let outbox = Outbox::new(store);

        match self.client.get_rows() {
            Ok(rows) => {
                let pending = outbox::reconcile(outbox.load(), &rows);
                if let Err(e) = outbox.save(&pending) {
                    warn!("Outbox not persisted: {e}");
                }

                let mut reports = outbox::overlay(rows, &pending);
                sort_newest_first(&mut reports);
                if let Err(e) = cache.replace(&reports) {
                    warn!("Report cache not refreshed: {e}");
                }
                Snapshot {
                    reports,
                    live: true,
                }
            }
            Err(e) => {
                debug!("Remote read failed, serving cached rows: {e}");
                let mut reports = outbox::overlay(cache.load(), &outbox.load());
                sort_newest_first(&mut reports);
                Snapshot {
                    reports,
                    live: false,
                }
            }
        }
    }

    /// Fire-and-forget create. Remote rejection is invisible by design: the
    /// report is held in the outbox until a later fetch observes it remotely.
    /// On a transport exception the report is additionally prepended to the
    /// local cache. Only local persistence problems are reported.
    pub fn add(&self, report: Report) -> Result<(), SyncError> {
        let store = self.client.store();

        match self.client.dispatch(&report) {
            Ok(()) => debug!("Report {} dispatched", report.id),
            Err(e) => {
                warn!("Remote store unreachable, caching report {} locally: {e}", report.id);
                ReportCache::new(store).prepend(report.clone())?;
            }
        }
        Outbox::new(store).push(PendingWrite::Submit(report))
    }

    /// Fire-and-forget delete, the mirror of [`Self::add`]. Deleting an id
    /// the collection does not hold is not an error.
    pub fn delete_by_id(&self, id: &ReportId) -> Result<(), SyncError> {
        let store = self.client.store();
        let command = DeleteCommand::new(id.clone());

        match self.client.dispatch(&command) {
            Ok(()) => debug!("Delete of {id} dispatched"),
            Err(e) => {
                warn!("Remote store unreachable, removing {id} from local cache: {e}");
                ReportCache::new(store).remove(id)?;
            }
        }
        Outbox::new(store).push(PendingWrite::Retract { id: id.clone() })
    }

    /// Writes dispatched (or cached offline) whose effect has not yet been
    /// observed in remote truth.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingWrite> {
        Outbox::new(self.client.store()).load()
    }
}

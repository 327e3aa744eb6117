use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::constants::OUTBOX_KEY;
use common::{Report, ReportId};

use crate::SyncError;
use crate::store::KeyValueStore;

/// A write that has been handed to the remote store but whose effect has not
/// yet been observed in remote truth. The transport never confirms writes, so
/// confirmation only happens when a later fetch sees the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PendingWrite {
    Submit(Report),
    Retract { id: ReportId },
}

impl PendingWrite {
    #[must_use]
    pub const fn id(&self) -> &ReportId {
        match self {
            Self::Submit(report) => &report.id,
            Self::Retract { id } => id,
        }
    }
}

/// The persisted pending-write list. This is a visibility layer only: it is
/// never re-dispatched to the remote store.
pub(crate) struct Outbox<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Outbox<'a> {
    pub(crate) const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub(crate) fn load(&self) -> Vec<PendingWrite> {
        let blob = match self.store.get(OUTBOX_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Outbox unreadable, treating as empty: {e}");
                return Vec::new();
            }
        };
        serde_json::from_str(&blob).unwrap_or_else(|e| {
            warn!("Outbox malformed, treating as empty: {e}");
            Vec::new()
        })
    }

    pub(crate) fn save(&self, pending: &[PendingWrite]) -> Result<(), SyncError> {
        let blob = serde_json::to_string(pending)?;
        self.store.set(OUTBOX_KEY, &blob)?;
        Ok(())
    }

    /// Appends a write; the latest write per id wins, so a retract cancels a
    /// still-pending submit of the same report.
    pub(crate) fn push(&self, write: PendingWrite) -> Result<(), SyncError> {
        let mut pending = self.load();
        pending.retain(|w| w.id() != write.id());
        pending.push(write);
        self.save(&pending)
    }
}

/// Drops writes whose effect is visible in the fetched rows: a submit is
/// confirmed once its id appears remotely, a retract once its id is gone.
pub(crate) fn reconcile(pending: Vec<PendingWrite>, remote: &[Report]) -> Vec<PendingWrite> {
    pending
        .into_iter()
        .filter(|write| match write {
            PendingWrite::Submit(report) => !remote.iter().any(|r| r.id == report.id),
            PendingWrite::Retract { id } => remote.iter().any(|r| &r.id == id),
        })
        .collect()
}

/// Applies still-pending writes to a base sequence: retracted ids are hidden
/// and pending submits are prepended unless already present.
pub(crate) fn overlay(base: Vec<Report>, pending: &[PendingWrite]) -> Vec<Report> {
    let retracted: HashSet<&ReportId> = pending
        .iter()
        .filter_map(|write| match write {
            PendingWrite::Retract { id } => Some(id),
            PendingWrite::Submit(_) => None,
        })
        .collect();

    let mut merged: Vec<Report> = base
        .into_iter()
        .filter(|r| !retracted.contains(&r.id))
        .collect();

    for write in pending {
        if let PendingWrite::Submit(report) = write
            && !merged.iter().any(|r| r.id == report.id)
        {
            merged.insert(0, report.clone());
        }
    }
    merged
}

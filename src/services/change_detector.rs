use crate::catalog::PackageDetails;
use crate::error::AppResult;
use crate::models::{
    FieldChange, NewSnapshot, Package, Snapshot, SnapshotRecord, SnapshotValues, TrackedField,
};
use crate::repositories::SnapshotRepository;
use std::sync::Arc;
use tracing::debug;

/// Field-level diff of two sets of tracked values, in [`TrackedField::ALL`] order.
///
/// Without `previous` every field is compared against an absent value, so a first snapshot
/// reports each known field as changed.
pub fn diff_values(current: &SnapshotValues, previous: Option<&SnapshotValues>) -> Vec<FieldChange> {
    TrackedField::ALL
        .iter()
        .filter_map(|&field| {
            let current_value = current.value(field);
            let previous_value = previous.map(|p| p.value(field)).unwrap_or_default();
            (current_value != previous_value).then(|| FieldChange {
                field,
                current: current_value,
                previous: previous_value,
            })
        })
        .collect()
}

/// True iff the values differ in at least one tracked field
pub fn is_different(current: &SnapshotValues, previous: Option<&SnapshotValues>) -> bool {
    TrackedField::ALL.iter().any(|&field| {
        current.value(field) != previous.map(|p| p.value(field)).unwrap_or_default()
    })
}

/// A snapshot that was persisted, with the changes that caused it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSnapshot {
    pub snapshot: Snapshot,
    pub changes: Vec<FieldChange>,
}

/// Decides whether fresh package data is a change worth storing
pub struct ChangeDetector {
    snapshot_repo: Arc<SnapshotRepository>,
}

impl ChangeDetector {
    pub fn new(snapshot_repo: Arc<SnapshotRepository>) -> Self {
        Self { snapshot_repo }
    }

    /// Latest stored snapshot of the same package, strictly older than `candidate`
    pub async fn previous<S: SnapshotRecord>(&self, candidate: &S) -> AppResult<Option<Snapshot>> {
        Ok(self
            .snapshot_repo
            .find_previous(candidate.package_id(), candidate.timestamp())
            .await?)
    }

    /// Changed fields between `candidate` and `previous`.
    /// A missing `previous` is looked up with [`ChangeDetector::previous`].
    pub async fn diff<S: SnapshotRecord>(
        &self,
        candidate: &S,
        previous: Option<&Snapshot>,
    ) -> AppResult<Vec<FieldChange>> {
        match previous {
            Some(previous) => Ok(diff_values(candidate.values(), Some(previous.values()))),
            None => {
                let previous = self.previous(candidate).await?;
                Ok(diff_values(
                    candidate.values(),
                    previous.as_ref().map(|p| p.values()),
                ))
            }
        }
    }

    pub async fn is_different<S: SnapshotRecord>(
        &self,
        candidate: &S,
        previous: Option<&Snapshot>,
    ) -> AppResult<bool> {
        Ok(!self.diff(candidate, previous).await?.is_empty())
    }

    /// Build a snapshot of `package` from fresh store data and store it if it changed
    pub async fn record_snapshot(
        &self,
        package: &Package,
        details: &PackageDetails,
    ) -> AppResult<Option<RecordedSnapshot>> {
        self.record(NewSnapshot::from_api_data(package, details)).await
    }

    /// Store `candidate` unless it equals the latest stored snapshot of its package
    pub async fn record(&self, candidate: NewSnapshot) -> AppResult<Option<RecordedSnapshot>> {
        let latest = self.snapshot_repo.find_latest(candidate.package_id).await?;
        let changes = diff_values(&candidate.values, latest.as_ref().map(|s| &s.values));

        if changes.is_empty() {
            debug!("No changes for package {}", candidate.package_id);
            return Ok(None);
        }

        let snapshot = self.snapshot_repo.create(&candidate).await?;
        debug!(
            "Recorded snapshot {} for package {} ({} changes)",
            snapshot.id,
            snapshot.package_id,
            changes.len()
        );

        Ok(Some(RecordedSnapshot { snapshot, changes }))
    }
}

use crate::error::AppResult;
use crate::models::{Package, RecentSnapshot, Snapshot, WatchedItem};
use crate::repositories::{PackageRepository, SnapshotRepository, WatchedItemRepository};
use std::sync::Arc;
use tracing::debug;

/// Snapshots of one package, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct PackageReport {
    pub package: Package,
    pub snapshots: Vec<Snapshot>,
}

/// Package reports of one watched app
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub item: WatchedItem,
    pub packages: Vec<PackageReport>,
}

/// Read-only views on the collected snapshots
pub struct ReportService {
    item_repo: Arc<WatchedItemRepository>,
    package_repo: Arc<PackageRepository>,
    snapshot_repo: Arc<SnapshotRepository>,
}

impl ReportService {
    pub fn new(
        item_repo: Arc<WatchedItemRepository>,
        package_repo: Arc<PackageRepository>,
        snapshot_repo: Arc<SnapshotRepository>,
    ) -> Self {
        Self {
            item_repo,
            package_repo,
            snapshot_repo,
        }
    }

    /// Snapshots for each package of `item`, at most `limit` per package
    pub async fn report(&self, item: &WatchedItem, limit: Option<i64>) -> AppResult<Vec<PackageReport>> {
        debug!("Report for {} (limit {:?})", item.display_name(), limit);
        let mut reports = Vec::new();
        for package in self.package_repo.find_by_item(item.id).await? {
            let snapshots = self.snapshot_repo.find_by_package(package.id, limit).await?;
            reports.push(PackageReport { package, snapshots });
        }
        Ok(reports)
    }

    /// [`ReportService::report`] for every enabled app, ordered by name
    pub async fn report_all(&self, limit: Option<i64>) -> AppResult<Vec<ItemReport>> {
        let mut reports = Vec::new();
        for item in self.item_repo.find_enabled().await? {
            let packages = self.report(&item, limit).await?;
            reports.push(ItemReport { item, packages });
        }
        Ok(reports)
    }

    /// Most recent snapshots across all packages
    pub async fn recent(&self, limit: Option<i64>) -> AppResult<Vec<RecentSnapshot>> {
        Ok(self.snapshot_repo.find_recent(limit).await?)
    }
}

use crate::catalog::{AppDetails, CatalogClient, CatalogError};
use crate::error::AppResult;
use crate::models::{NewPackage, NewWatchedItem, Package, WatchedItem};
use crate::repositories::{
    ItemPackageRepository, PackageRepository, SnapshotRepository, WatchedItemRepository,
};
use crate::services::ChangeDetector;
use crate::signals::{Signal, SignalBus};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a single fetch did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Packages referenced by the app
    pub packages_seen: usize,
    /// Packages linked to the app during this fetch
    pub packages_linked: usize,
    pub snapshots_recorded: usize,
    /// Field change signals raised
    pub changes_signalled: usize,
    /// Package ids the store could not resolve
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Disabled items are not updated
    SkippedDisabled,
    Updated(FetchSummary),
}

/// Service managing the watchlist and updating watched items from the store
pub struct WatchService {
    item_repo: Arc<WatchedItemRepository>,
    package_repo: Arc<PackageRepository>,
    link_repo: Arc<ItemPackageRepository>,
    snapshot_repo: Arc<SnapshotRepository>,
    change_detector: Arc<ChangeDetector>,
    catalog: Arc<dyn CatalogClient>,
    signals: Arc<SignalBus>,
    country_code: Option<String>,
}

impl WatchService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_repo: Arc<WatchedItemRepository>,
        package_repo: Arc<PackageRepository>,
        link_repo: Arc<ItemPackageRepository>,
        snapshot_repo: Arc<SnapshotRepository>,
        change_detector: Arc<ChangeDetector>,
        catalog: Arc<dyn CatalogClient>,
        signals: Arc<SignalBus>,
        country_code: Option<String>,
    ) -> Self {
        Self {
            item_repo,
            package_repo,
            link_repo,
            snapshot_repo,
            change_detector,
            catalog,
            signals,
            country_code,
        }
    }

    /// Start watching the app with the given store id.
    ///
    /// Unknown apps are fetched from the store and created, disabled ones are re-enabled.
    /// Both are updated right away. Watching an enabled app again does nothing.
    pub async fn watch(&self, app_id: &str, threshold: Option<i64>) -> AppResult<WatchedItem> {
        match self.item_repo.find_by_steam_id(app_id).await? {
            Some(item) if item.enabled => {
                warn!("{} is already being watched", item.display_name());
                Ok(item)
            }
            Some(mut item) => {
                item.enable();
                let item = self.item_repo.update(&item).await?;
                info!("{} was added to the watchlist again", item.display_name());
                self.signal(Signal::ItemAdded { item: item.clone() });
                self.fetch(&item).await?;
                Ok(item)
            }
            None => {
                let details = self.fetch_app_details(app_id).await?;
                let new_item = NewWatchedItem::from_api_data(app_id, &details, threshold)?;
                let item = self.item_repo.create(&new_item).await?;
                info!("{} was added to the watchlist", item.display_name());
                self.signal(Signal::ItemAdded { item: item.clone() });
                self.apply(&item, &details).await?;
                Ok(item)
            }
        }
    }

    /// Stop watching an app.
    ///
    /// Without `delete` the app is disabled and keeps its history. With `delete` the app is
    /// removed together with every package no other app links to, and their snapshots.
    /// Returns `None` if the app was not watched.
    pub async fn unwatch(&self, app_id: &str, delete: bool) -> AppResult<Option<WatchedItem>> {
        let Some(mut item) = self.item_repo.find_by_steam_id(app_id).await? else {
            warn!("{} is not being watched", app_id);
            return Ok(None);
        };

        if delete {
            debug!("Delete {}", item.display_name());
            for package in self.package_repo.find_by_item(item.id).await? {
                self.link_repo.unlink(&item, &package).await?;

                let other_links = self.link_repo.count_by_package(package.id).await?;
                if other_links > 0 {
                    debug!(
                        "Package {} is still linked to {} other apps",
                        package.display_name(),
                        other_links
                    );
                    continue;
                }

                let deleted = self.snapshot_repo.delete_by_package(package.id).await?;
                self.package_repo.delete(package.id).await?;
                debug!(
                    "Deleted package {} with {} snapshots",
                    package.display_name(),
                    deleted
                );
            }

            self.item_repo.delete(item.id).await?;
            info!("Deleted {}", item.display_name());
        } else {
            item.disable();
            item = self.item_repo.update(&item).await?;
            info!("Disabled {}", item.display_name());
        }

        self.signal(Signal::ItemRemoved { item: item.clone() });
        Ok(Some(item))
    }

    /// Watched apps ordered by name. Disabled apps are listed last when included.
    pub async fn ls(&self, include_disabled: bool) -> AppResult<Vec<WatchedItem>> {
        let items = if include_disabled {
            self.item_repo.find_all().await?
        } else {
            self.item_repo.find_enabled().await?
        };
        Ok(items)
    }

    /// Look up a watched app by its store id
    pub async fn find(&self, app_id: &str) -> AppResult<Option<WatchedItem>> {
        Ok(self.item_repo.find_by_steam_id(app_id).await?)
    }

    /// Fetch current store data for an app and record what changed
    pub async fn fetch(&self, item: &WatchedItem) -> AppResult<FetchOutcome> {
        if !item.enabled {
            warn!("{} is disabled and will not be updated", item.display_name());
            return Ok(FetchOutcome::SkippedDisabled);
        }

        let details = self.fetch_app_details(&item.steam_id).await?;
        self.apply(item, &details).await
    }

    /// Fetch every enabled app, one after another
    pub async fn fetch_all(&self) -> AppResult<Vec<(WatchedItem, FetchOutcome)>> {
        let items = self.item_repo.find_enabled().await?;
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let outcome = self.fetch(&item).await?;
            results.push((item, outcome));
        }
        Ok(results)
    }

    async fn fetch_app_details(&self, app_id: &str) -> AppResult<AppDetails> {
        debug!("Fetching app details for {}", app_id);
        Ok(self
            .catalog
            .fetch_item(app_id, self.country_code.as_deref())
            .await?)
    }

    /// Update the packages of `item` from already fetched app details
    async fn apply(&self, item: &WatchedItem, details: &AppDetails) -> AppResult<FetchOutcome> {
        let mut summary = FetchSummary::default();
        let mut linked: HashMap<String, Package> = self
            .package_repo
            .find_by_item(item.id)
            .await?
            .into_iter()
            .map(|p| (p.steam_id.clone(), p))
            .collect();

        for package_id in &details.packages {
            summary.packages_seen += 1;

            let package_details = match self
                .catalog
                .fetch_package(package_id, self.country_code.as_deref())
                .await
            {
                Ok(package_details) => package_details,
                Err(CatalogError::NotFound(_)) => {
                    warn!("Package {} not found, skipped", package_id);
                    summary.not_found.push(package_id.clone());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let package = match linked.get(package_id) {
                Some(package) => package.clone(),
                None => {
                    let package = match self.package_repo.find_by_steam_id(package_id).await? {
                        Some(package) => package,
                        None => {
                            let new_package = NewPackage::from_api_data(package_id, &package_details);
                            self.package_repo.create(&new_package).await?
                        }
                    };
                    self.link_repo.link(item, &package).await?;
                    summary.packages_linked += 1;
                    debug!(
                        "Linked package {} to {}",
                        package.display_name(),
                        item.display_name()
                    );
                    self.signal(Signal::PackageLinked {
                        package: package.clone(),
                        item: item.clone(),
                    });
                    linked.insert(package_id.clone(), package.clone());
                    package
                }
            };

            let package = match package_details.name.as_ref() {
                Some(name) if package.name.as_ref() != Some(name) => {
                    debug!("Renaming package {} to {}", package.steam_id, name);
                    let renamed = self
                        .package_repo
                        .update(&Package {
                            name: Some(name.clone()),
                            ..package
                        })
                        .await?;
                    linked.insert(package_id.clone(), renamed.clone());
                    renamed
                }
                _ => package,
            };

            if let Some(recorded) = self
                .change_detector
                .record_snapshot(&package, &package_details)
                .await?
            {
                summary.snapshots_recorded += 1;
                for change in recorded.changes {
                    summary.changes_signalled += 1;
                    self.signal(Signal::FieldChanged {
                        package: package.clone(),
                        change,
                    });
                }
            }
        }

        info!(
            "Fetched {}: {} packages, {} new snapshots",
            item.display_name(),
            summary.packages_seen,
            summary.snapshots_recorded
        );
        Ok(FetchOutcome::Updated(summary))
    }

    fn signal(&self, signal: Signal) {
        debug!("Emit {}", signal.kind());
        self.signals.emit(&signal);
    }
}

//! Steamwatch Library
//!
//! Watches apps on the Steam store and records changes to the price and availability
//! of their packages. This module exposes the components for use by the binary and tests.

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod render;
pub mod repositories;
pub mod services;
pub mod signals;
pub mod util;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use catalog::CatalogClient;
use repositories::*;
use services::{ChangeDetector, ReportService, WatchService};
use signals::SignalBus;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub item_repo: Arc<WatchedItemRepository>,
    pub package_repo: Arc<PackageRepository>,
    pub link_repo: Arc<ItemPackageRepository>,
    pub snapshot_repo: Arc<SnapshotRepository>,
    pub change_detector: Arc<ChangeDetector>,
    pub watch_service: Arc<WatchService>,
    pub report_service: Arc<ReportService>,
    pub signals: Arc<SignalBus>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(
        pool: SqlitePool,
        catalog: Arc<dyn CatalogClient>,
        signals: Arc<SignalBus>,
        country_code: Option<String>,
    ) -> Self {
        let item_repo = Arc::new(WatchedItemRepository::new(pool.clone()));
        let package_repo = Arc::new(PackageRepository::new(pool.clone()));
        let link_repo = Arc::new(ItemPackageRepository::new(pool.clone()));
        let snapshot_repo = Arc::new(SnapshotRepository::new(pool));

        let change_detector = Arc::new(ChangeDetector::new(snapshot_repo.clone()));
        let watch_service = Arc::new(WatchService::new(
            item_repo.clone(),
            package_repo.clone(),
            link_repo.clone(),
            snapshot_repo.clone(),
            change_detector.clone(),
            catalog,
            signals.clone(),
            country_code,
        ));
        let report_service = Arc::new(ReportService::new(
            item_repo.clone(),
            package_repo.clone(),
            snapshot_repo.clone(),
        ));

        Self {
            item_repo,
            package_repo,
            link_repo,
            snapshot_repo,
            change_detector,
            watch_service,
            report_service,
            signals,
        }
    }
}

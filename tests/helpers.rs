#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use steamwatch::catalog::{AppDetails, CatalogClient, CatalogError, PackageDetails};
use steamwatch::config::DatabaseConfig;
use steamwatch::database::{create_pool, run_migrations};
use steamwatch::models::*;
use steamwatch::repositories::*;
use steamwatch::signals::{Signal, SignalBus, SignalKind};
use steamwatch::AppState;
use sqlx::SqlitePool;

/// In-memory test database with migrations applied
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub item_repo: Arc<WatchedItemRepository>,
    pub package_repo: Arc<PackageRepository>,
    pub link_repo: Arc<ItemPackageRepository>,
    pub snapshot_repo: Arc<SnapshotRepository>,
}

impl TestDatabase {
    /// Create a fresh database; each call gets its own
    pub async fn new() -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create test database pool");

        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self::from_pool(pool)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            item_repo: Arc::new(WatchedItemRepository::new(pool.clone())),
            package_repo: Arc::new(PackageRepository::new(pool.clone())),
            link_repo: Arc::new(ItemPackageRepository::new(pool.clone())),
            snapshot_repo: Arc::new(SnapshotRepository::new(pool)),
        }
    }

    pub async fn create_item(&self, steam_id: &str, name: &str) -> WatchedItem {
        self.item_repo
            .create(&NewWatchedItem {
                steam_id: steam_id.to_string(),
                kind: "game".to_string(),
                enabled: true,
                name: Some(name.to_string()),
                threshold: None,
            })
            .await
            .expect("Failed to create item")
    }

    pub async fn create_package(&self, steam_id: &str) -> Package {
        self.package_repo
            .create(&NewPackage {
                steam_id: steam_id.to_string(),
                name: Some(format!("Package {}", steam_id)),
            })
            .await
            .expect("Failed to create package")
    }

    pub async fn snapshot_count(&self, package_id: i64) -> i64 {
        self.snapshot_repo
            .count_by_package(package_id)
            .await
            .expect("Failed to count snapshots")
    }
}

/// Store catalog backed by in-memory maps. Unknown ids are `NotFound`.
#[derive(Default)]
pub struct FakeCatalog {
    apps: Mutex<HashMap<String, AppDetails>>,
    packages: Mutex<HashMap<String, PackageDetails>>,
    item_calls: AtomicUsize,
    package_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_app(&self, app_id: &str, details: AppDetails) {
        self.apps.lock().unwrap().insert(app_id.to_string(), details);
    }

    pub fn set_package(&self, package_id: &str, details: PackageDetails) {
        self.packages
            .lock()
            .unwrap()
            .insert(package_id.to_string(), details);
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }

    pub fn package_calls(&self) -> usize {
        self.package_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_item(
        &self,
        app_id: &str,
        _country_code: Option<&str>,
    ) -> Result<AppDetails, CatalogError> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        self.apps
            .lock()
            .unwrap()
            .get(app_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(app_id.to_string()))
    }

    async fn fetch_package(
        &self,
        package_id: &str,
        _country_code: Option<&str>,
    ) -> Result<PackageDetails, CatalogError> {
        self.package_calls.fetch_add(1, Ordering::SeqCst);
        self.packages
            .lock()
            .unwrap()
            .get(package_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(package_id.to_string()))
    }
}

/// Collects every emitted signal
#[derive(Clone, Default)]
pub struct SignalRecorder {
    signals: Arc<Mutex<Vec<Signal>>>,
}

impl SignalRecorder {
    /// Subscribe a new recorder to every signal kind of `bus`
    pub fn attach(bus: &mut SignalBus) -> Self {
        let recorder = Self::default();
        for kind in SignalKind::ALL {
            let signals = recorder.signals.clone();
            bus.subscribe(kind, "recorder", move |signal| {
                signals.lock().unwrap().push(signal.clone());
                Ok(())
            });
        }
        recorder
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<SignalKind> {
        self.signals().iter().map(Signal::kind).collect()
    }

    pub fn count(&self, kind: SignalKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn clear(&self) {
        self.signals.lock().unwrap().clear();
    }
}

/// Full application wired to a fake catalog and a signal recorder
pub struct TestApp {
    pub db: TestDatabase,
    pub state: AppState,
    pub catalog: Arc<FakeCatalog>,
    pub recorder: SignalRecorder,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_bus(SignalBus::new()).await
    }

    /// Build the app around `bus`, with a recorder added as last subscriber
    pub async fn with_bus(mut bus: SignalBus) -> Self {
        let db = TestDatabase::new().await;
        let catalog = Arc::new(FakeCatalog::new());
        let recorder = SignalRecorder::attach(&mut bus);
        let state = AppState::new(db.pool.clone(), catalog.clone(), Arc::new(bus), None);

        Self {
            db,
            state,
            catalog,
            recorder,
        }
    }
}

/// App details with the given packages
pub fn app_details(kind: Option<&str>, name: &str, packages: &[&str]) -> AppDetails {
    AppDetails {
        kind: kind.map(String::from),
        name: Some(name.to_string()),
        packages: packages.iter().map(|p| p.to_string()).collect(),
    }
}

/// Package details the way the store sends them
pub fn package_details(name: &str, price: i64, currency: &str, linux: bool) -> PackageDetails {
    serde_json::from_value(json!({
        "name": name,
        "price": { "currency": currency, "initial": price, "final": price, "discount_percent": 0 },
        "platforms": { "windows": true, "mac": false, "linux": linux },
        "release_date": { "date": "02 September, 2015", "coming_soon": false }
    }))
    .expect("Invalid package details")
}

pub fn values(price: i64) -> SnapshotValues {
    SnapshotValues {
        currency: Some("EUR".to_string()),
        price: Some(price),
        release_date: NaiveDate::from_ymd_opt(2015, 9, 2),
        coming_soon: Some(false),
        supports_linux: false,
    }
}

/// A fixed point in time, `minutes` after 2024-01-01 00:00
pub fn at(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("Invalid date")
        + chrono::Duration::minutes(minutes)
}

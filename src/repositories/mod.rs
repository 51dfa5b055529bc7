pub mod item_package_repository;
pub mod package_repository;
pub mod snapshot_repository;
pub mod watched_item_repository;

use crate::error::RepositoryError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// Re-export all repositories for convenient access
pub use item_package_repository::ItemPackageRepository;
pub use package_repository::PackageRepository;
pub use snapshot_repository::SnapshotRepository;
pub use watched_item_repository::WatchedItemRepository;

use crate::models::{ItemPackage, Package, WatchedItem};
use crate::repositories::RepositoryResult;
use sqlx::SqlitePool;

/// Repository for the links between watched items and packages
pub struct ItemPackageRepository {
    pool: SqlitePool,
}

impl ItemPackageRepository {
    /// Create a new ItemPackageRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Link an item to a package. Linking the same pair twice fails with `Duplicate`.
    pub async fn link(&self, item: &WatchedItem, package: &Package) -> RepositoryResult<ItemPackage> {
        let link = sqlx::query_as::<_, ItemPackage>(
            r#"
            INSERT INTO item_packages (item_id, package_id)
            VALUES (?, ?)
            RETURNING item_id, package_id
            "#,
        )
        .bind(item.id)
        .bind(package.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(link)
    }

    /// Remove the link between an item and a package.
    /// Returns `false` when there was no such link.
    pub async fn unlink(&self, item: &WatchedItem, package: &Package) -> RepositoryResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM item_packages
            WHERE item_id = ? AND package_id = ?
            "#,
        )
        .bind(item.id)
        .bind(package.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Remove every link to a package
    pub async fn unlink_package(&self, package_id: i64) -> RepositoryResult<u64> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM item_packages
            WHERE package_id = ?
            "#,
        )
        .bind(package_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected)
    }

    /// Check if an item is linked to a package
    pub async fn is_linked(&self, item_id: i64, package_id: i64) -> RepositoryResult<bool> {
        let link = sqlx::query_as::<_, ItemPackage>(
            r#"
            SELECT item_id, package_id
            FROM item_packages
            WHERE item_id = ? AND package_id = ?
            "#,
        )
        .bind(item_id)
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link.is_some())
    }

    /// All links of an item
    pub async fn find_by_item(&self, item_id: i64) -> RepositoryResult<Vec<ItemPackage>> {
        let links = sqlx::query_as::<_, ItemPackage>(
            r#"
            SELECT item_id, package_id
            FROM item_packages
            WHERE item_id = ?
            ORDER BY package_id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    /// Number of items linked to a package
    pub async fn count_by_package(&self, package_id: i64) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM item_packages
            WHERE package_id = ?
            "#,
        )
        .bind(package_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

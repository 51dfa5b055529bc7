use crate::error::RepositoryError;
use crate::models::{NewWatchedItem, WatchedItem};
use crate::repositories::RepositoryResult;
use sqlx::SqlitePool;

/// Repository for watched item data access
pub struct WatchedItemRepository {
    pool: SqlitePool,
}

impl WatchedItemRepository {
    /// Create a new WatchedItemRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new watched item. Fails with `Duplicate` for a known steam id.
    pub async fn create(&self, item: &NewWatchedItem) -> RepositoryResult<WatchedItem> {
        let created = sqlx::query_as::<_, WatchedItem>(
            r#"
            INSERT INTO watched_items (steam_id, kind, enabled, name, threshold)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, steam_id, kind, enabled, name, threshold
            "#,
        )
        .bind(&item.steam_id)
        .bind(&item.kind)
        .bind(item.enabled)
        .bind(&item.name)
        .bind(item.threshold)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find a watched item by its row id
    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<WatchedItem>> {
        let item = sqlx::query_as::<_, WatchedItem>(
            r#"
            SELECT id, steam_id, kind, enabled, name, threshold
            FROM watched_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Find a watched item by its store app id
    pub async fn find_by_steam_id(&self, steam_id: &str) -> RepositoryResult<Option<WatchedItem>> {
        let item = sqlx::query_as::<_, WatchedItem>(
            r#"
            SELECT id, steam_id, kind, enabled, name, threshold
            FROM watched_items
            WHERE steam_id = ?
            "#,
        )
        .bind(steam_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Enabled items ordered by name
    pub async fn find_enabled(&self) -> RepositoryResult<Vec<WatchedItem>> {
        let items = sqlx::query_as::<_, WatchedItem>(
            r#"
            SELECT id, steam_id, kind, enabled, name, threshold
            FROM watched_items
            WHERE enabled = 1
            ORDER BY name, steam_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// All items, enabled first, then by name
    pub async fn find_all(&self) -> RepositoryResult<Vec<WatchedItem>> {
        let items = sqlx::query_as::<_, WatchedItem>(
            r#"
            SELECT id, steam_id, kind, enabled, name, threshold
            FROM watched_items
            ORDER BY enabled DESC, name, steam_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Items linked to a package
    pub async fn find_by_package(&self, package_id: i64) -> RepositoryResult<Vec<WatchedItem>> {
        let items = sqlx::query_as::<_, WatchedItem>(
            r#"
            SELECT w.id, w.steam_id, w.kind, w.enabled, w.name, w.threshold
            FROM watched_items w
            JOIN item_packages ip ON ip.item_id = w.id
            WHERE ip.package_id = ?
            ORDER BY w.name, w.steam_id
            "#,
        )
        .bind(package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Persist all mutable fields of an existing item
    pub async fn update(&self, item: &WatchedItem) -> RepositoryResult<WatchedItem> {
        let updated = sqlx::query_as::<_, WatchedItem>(
            r#"
            UPDATE watched_items
            SET kind = ?, enabled = ?, name = ?, threshold = ?
            WHERE id = ?
            RETURNING id, steam_id, kind, enabled, name, threshold
            "#,
        )
        .bind(&item.kind)
        .bind(item.enabled)
        .bind(&item.name)
        .bind(item.threshold)
        .bind(item.id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| RepositoryError::NotFound(format!("watched item {}", item.id)))
    }

    /// Delete a watched item. Its package links must be gone already.
    pub async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM watched_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound(format!("watched item {}", id)));
        }

        Ok(())
    }
}

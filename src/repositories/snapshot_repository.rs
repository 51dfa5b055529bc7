use crate::models::{NewSnapshot, RecentSnapshot, Snapshot};
use crate::repositories::RepositoryResult;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

/// Repository for package snapshots.
///
/// Snapshots are ordered by timestamp; equal timestamps fall back to insertion order.
/// A `None` limit means all rows (SQLite treats a negative LIMIT as unbounded).
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Create a new SnapshotRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a candidate snapshot, assigning its id
    pub async fn create(&self, snapshot: &NewSnapshot) -> RepositoryResult<Snapshot> {
        let values = &snapshot.values;
        let created = sqlx::query_as::<_, Snapshot>(
            r#"
            INSERT INTO snapshots
                (package_id, timestamp, currency, price, release_date, coming_soon, supports_linux)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, package_id, timestamp, currency, price, release_date, coming_soon, supports_linux
            "#,
        )
        .bind(snapshot.package_id)
        .bind(snapshot.timestamp)
        .bind(&values.currency)
        .bind(values.price)
        .bind(values.release_date)
        .bind(values.coming_soon)
        .bind(values.supports_linux)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// The most recent snapshot of a package
    pub async fn find_latest(&self, package_id: i64) -> RepositoryResult<Option<Snapshot>> {
        let snapshot = sqlx::query_as::<_, Snapshot>(
            r#"
            SELECT id, package_id, timestamp, currency, price, release_date, coming_soon, supports_linux
            FROM snapshots
            WHERE package_id = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// The most recent snapshot of a package taken strictly before `before`
    pub async fn find_previous(
        &self,
        package_id: i64,
        before: NaiveDateTime,
    ) -> RepositoryResult<Option<Snapshot>> {
        let snapshot = sqlx::query_as::<_, Snapshot>(
            r#"
            SELECT id, package_id, timestamp, currency, price, release_date, coming_soon, supports_linux
            FROM snapshots
            WHERE package_id = ? AND timestamp < ?
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(package_id)
        .bind(before)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// Snapshots of a package, newest first
    pub async fn find_by_package(
        &self,
        package_id: i64,
        limit: Option<i64>,
    ) -> RepositoryResult<Vec<Snapshot>> {
        let snapshots = sqlx::query_as::<_, Snapshot>(
            r#"
            SELECT id, package_id, timestamp, currency, price, release_date, coming_soon, supports_linux
            FROM snapshots
            WHERE package_id = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(package_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        Ok(snapshots)
    }

    /// Most recent snapshots across all packages, newest first
    pub async fn find_recent(&self, limit: Option<i64>) -> RepositoryResult<Vec<RecentSnapshot>> {
        let recent = sqlx::query_as::<_, RecentSnapshot>(
            r#"
            SELECT s.id, s.package_id, s.timestamp, s.currency, s.price, s.release_date,
                   s.coming_soon, s.supports_linux,
                   p.steam_id AS package_steam_id, p.name AS package_name
            FROM snapshots s
            JOIN packages p ON p.id = s.package_id
            ORDER BY s.timestamp DESC, s.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        Ok(recent)
    }

    /// Number of snapshots stored for a package
    pub async fn count_by_package(&self, package_id: i64) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM snapshots
            WHERE package_id = ?
            "#,
        )
        .bind(package_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Delete all snapshots of a package
    pub async fn delete_by_package(&self, package_id: i64) -> RepositoryResult<u64> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM snapshots
            WHERE package_id = ?
            "#,
        )
        .bind(package_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected)
    }
}

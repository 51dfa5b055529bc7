use crate::error::RepositoryError;
use crate::models::{NewPackage, Package};
use crate::repositories::RepositoryResult;
use sqlx::SqlitePool;

/// Repository for package data access
pub struct PackageRepository {
    pool: SqlitePool,
}

impl PackageRepository {
    /// Create a new PackageRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new package. Fails with `Duplicate` for a known steam id.
    pub async fn create(&self, package: &NewPackage) -> RepositoryResult<Package> {
        let created = sqlx::query_as::<_, Package>(
            r#"
            INSERT INTO packages (steam_id, name)
            VALUES (?, ?)
            RETURNING id, steam_id, name
            "#,
        )
        .bind(&package.steam_id)
        .bind(&package.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find a package by its row id
    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Package>> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, steam_id, name
            FROM packages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(package)
    }

    /// Find a package by its store package id
    pub async fn find_by_steam_id(&self, steam_id: &str) -> RepositoryResult<Option<Package>> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, steam_id, name
            FROM packages
            WHERE steam_id = ?
            "#,
        )
        .bind(steam_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(package)
    }

    /// Packages linked to a watched item, ordered numerically by steam id
    pub async fn find_by_item(&self, item_id: i64) -> RepositoryResult<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            r#"
            SELECT p.id, p.steam_id, p.name
            FROM packages p
            JOIN item_packages ip ON ip.package_id = p.id
            WHERE ip.item_id = ?
            ORDER BY CAST(p.steam_id AS INTEGER), p.steam_id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }

    /// Update the name of an existing package
    pub async fn update(&self, package: &Package) -> RepositoryResult<Package> {
        let updated = sqlx::query_as::<_, Package>(
            r#"
            UPDATE packages
            SET name = ?
            WHERE id = ?
            RETURNING id, steam_id, name
            "#,
        )
        .bind(&package.name)
        .bind(package.id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| RepositoryError::NotFound(format!("package {}", package.id)))
    }

    /// Delete a package. Snapshots and links must be gone already.
    pub async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM packages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound(format!("package {}", id)));
        }

        Ok(())
    }
}

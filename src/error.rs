use crate::catalog::CatalogError;
use crate::database::DatabaseError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Database setup errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Storage errors from the repositories
    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Errors from the store API
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// External data lacks a field an entity cannot be built without
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a not found error, in storage or in the catalog
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::Repository(RepositoryError::NotFound(_))
                | AppError::Catalog(CatalogError::NotFound(_))
        )
    }

    /// Check if the store API could not resolve an identifier
    pub fn is_catalog_not_found(&self) -> bool {
        matches!(self, AppError::Catalog(CatalogError::NotFound(_)))
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Update or delete referenced a row that does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Duplicate external identifier or link
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                if db_err.is_unique_violation() {
                    RepositoryError::Duplicate(db_err.message().to_string())
                } else if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    RepositoryError::ConstraintViolation(db_err.message().to_string())
                } else {
                    RepositoryError::Query(err)
                }
            }
            _ => RepositoryError::Query(err),
        }
    }
}

//! Access to the Steam store catalog.
//!
//! The store answers with loosely shaped JSON. It is parsed into the typed
//! detail structs below right after the HTTP call, so the rest of the crate
//! never touches raw maps.

pub mod store_api;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub use store_api::StoreApiClient;

/// Errors raised by a catalog client
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The store does not know the identifier
    #[error("Not found in store: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Source of current app and package details
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch details for a single app
    async fn fetch_item(
        &self,
        app_id: &str,
        country_code: Option<&str>,
    ) -> Result<AppDetails, CatalogError>;

    /// Fetch details for a single package
    async fn fetch_package(
        &self,
        package_id: &str,
        country_code: Option<&str>,
    ) -> Result<PackageDetails, CatalogError>;
}

/// App details as returned by `appdetails`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppDetails {
    /// "game", "dlc", ... Required to build a watched item.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Referenced package ids, normalized to strings
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub packages: Vec<String>,
}

/// Package details as returned by `packagedetails`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PackagePrice>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub platforms: Option<Platforms>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackagePrice {
    #[serde(default)]
    pub currency: Option<String>,
    /// Current price in minor units
    #[serde(rename = "final", default)]
    pub final_price: Option<i64>,
    #[serde(default)]
    pub initial: Option<i64>,
    #[serde(default)]
    pub discount_percent: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReleaseDate {
    /// Free text, e.g. "02 September, 2015" or "Coming Soon"
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub coming_soon: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Platforms {
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub mac: bool,
    #[serde(default)]
    pub linux: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Identifier {
    Number(u64),
    Text(String),
}

// The store mixes numeric and string ids in `packages`.
fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Option<Vec<Identifier>> = Option::deserialize(deserializer)?;
    Ok(ids
        .unwrap_or_default()
        .into_iter()
        .map(|id| match id {
            Identifier::Number(n) => n.to_string(),
            Identifier::Text(s) => s.trim().to_string(),
        })
        .collect())
}

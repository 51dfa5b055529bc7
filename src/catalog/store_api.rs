use crate::catalog::{AppDetails, CatalogClient, CatalogError, PackageDetails};
use crate::config::StoreConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// HTTP client for the Steam store API.
///
/// Both endpoints take a single id and answer with
/// `{"<id>": {"success": true, "data": {...}}}`.
#[derive(Clone)]
pub struct StoreApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreApiClient {
    /// Create a client from the store configuration
    pub fn new(config: &StoreConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(&config.base_url, http))
    }

    /// Create a client with a preconfigured reqwest client
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn details<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        param: &str,
        id: &str,
        country_code: Option<&str>,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query = vec![(param, id)];
        if let Some(cc) = country_code {
            query.push(("cc", cc));
        }

        debug!("GET {} {:?}", url, query);
        let response = self.http.get(&url).query(&query).send().await?;

        let status = response.status();
        debug!("{} {}", url, status);
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        unwrap_envelope(body, id)
    }
}

fn unwrap_envelope<T: DeserializeOwned>(mut body: Value, id: &str) -> Result<T, CatalogError> {
    let entry = body
        .get_mut(id)
        .map(Value::take)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

    let success = entry
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match entry.get("data") {
        Some(data) if success && !data.is_null() => serde_json::from_value(data.clone())
            .map_err(|e| CatalogError::InvalidResponse(format!("{}: {}", id, e))),
        _ => Err(CatalogError::NotFound(id.to_string())),
    }
}

#[async_trait]
impl CatalogClient for StoreApiClient {
    async fn fetch_item(
        &self,
        app_id: &str,
        country_code: Option<&str>,
    ) -> Result<AppDetails, CatalogError> {
        self.details("appdetails", "appids", app_id, country_code)
            .await
    }

    async fn fetch_package(
        &self,
        package_id: &str,
        country_code: Option<&str>,
    ) -> Result<PackageDetails, CatalogError> {
        self.details("packagedetails", "packageids", package_id, country_code)
            .await
    }
}

use crate::catalog::PackageDetails;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A package on the store: the unit that is sold and priced.
/// One package may contain several apps and an app may be sold in several packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Package {
    pub id: i64,
    pub steam_id: String,
    pub name: Option<String>,
}

impl Package {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.steam_id)
    }
}

/// A package that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPackage {
    pub steam_id: String,
    pub name: Option<String>,
}

impl NewPackage {
    /// Build a package from store package details. Only the id is required.
    pub fn from_api_data(steam_id: &str, details: &PackageDetails) -> Self {
        Self {
            steam_id: steam_id.to_string(),
            name: details.name.clone(),
        }
    }
}

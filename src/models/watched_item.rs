use crate::catalog::AppDetails;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A game or DLC on the store that is being watched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WatchedItem {
    pub id: i64,
    /// The `appid` on the store
    pub steam_id: String,
    /// "game", "dlc", ...
    pub kind: String,
    /// Disabled items are kept with their history but not updated
    pub enabled: bool,
    pub name: Option<String>,
    /// Price alert threshold in minor units. Stored only.
    pub threshold: Option<i64>,
}

impl WatchedItem {
    /// Enable this item. Not persisted until saved.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable this item. Not persisted until saved.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Name for display, falls back to the steam id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.steam_id)
    }
}

/// A watched item that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchedItem {
    pub steam_id: String,
    pub kind: String,
    pub enabled: bool,
    pub name: Option<String>,
    pub threshold: Option<i64>,
}

impl NewWatchedItem {
    /// Build a watched item from store app details.
    ///
    /// The app `type` is required, everything else is optional.
    pub fn from_api_data(
        steam_id: &str,
        details: &AppDetails,
        threshold: Option<i64>,
    ) -> AppResult<Self> {
        let kind = details
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::MissingRequiredField("type".to_string()))?;

        Ok(Self {
            steam_id: steam_id.to_string(),
            kind: kind.to_string(),
            enabled: true,
            name: details.name.clone(),
            threshold,
        })
    }
}

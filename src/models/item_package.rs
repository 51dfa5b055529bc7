use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Link between a watched item and a package; the pair is unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct ItemPackage {
    pub item_id: i64,
    pub package_id: i64,
}

//! Domain models for steamwatch.
//!
//! Mirrors the store's data model and adds snapshots of collected data:
//!
//! ```text
//! [WatchedItem] <-- [ItemPackage] --> [Package] <-- [Snapshot]
//! ```
//!
//! Sales data is only available for packages, which aggregate one or more apps.

pub mod item_package;
pub mod package;
pub mod snapshot;
pub mod watched_item;

// Re-export all models for convenient access
pub use item_package::ItemPackage;
pub use package::{NewPackage, Package};
pub use snapshot::{
    parse_release_date, FieldChange, FieldValue, NewSnapshot, RecentSnapshot, Snapshot,
    SnapshotRecord, SnapshotValues, TrackedField,
};
pub use watched_item::{NewWatchedItem, WatchedItem};

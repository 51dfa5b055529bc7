use crate::catalog::PackageDetails;
use crate::models::Package;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Release dates arrive as e.g. "30 May, 2014"
pub const RELEASE_DATE_FORMAT: &str = "%d %B, %Y";

/// Parse a store release date.
///
/// Anything that does not match [`RELEASE_DATE_FORMAT`] ("Coming Soon", "Q3 2016", "")
/// means no release date rather than an error.
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), RELEASE_DATE_FORMAT).ok()
}

/// The package fields tracked by snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Currency,
    Price,
    ReleaseDate,
    ComingSoon,
    SupportsLinux,
}

impl TrackedField {
    /// All tracked fields in diff order
    pub const ALL: [TrackedField; 5] = [
        TrackedField::Currency,
        TrackedField::Price,
        TrackedField::ReleaseDate,
        TrackedField::ComingSoon,
        TrackedField::SupportsLinux,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedField::Currency => "currency",
            TrackedField::Price => "price",
            TrackedField::ReleaseDate => "release_date",
            TrackedField::ComingSoon => "coming_soon",
            TrackedField::SupportsLinux => "supports_linux",
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a tracked field. `Absent` covers both an unknown value and
/// a missing previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    #[default]
    Absent,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Flag(bool),
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Absent)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("-"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// One changed field: `(field, current, previous)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: TrackedField,
    pub current: FieldValue,
    pub previous: FieldValue,
}

/// The tracked values of a package at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SnapshotValues {
    pub currency: Option<String>,
    /// Price in minor units
    pub price: Option<i64>,
    pub release_date: Option<NaiveDate>,
    /// `None` when the store did not say
    pub coming_soon: Option<bool>,
    pub supports_linux: bool,
}

impl SnapshotValues {
    /// Extract the tracked values from store package details
    pub fn from_api_data(details: &PackageDetails) -> Self {
        let price = details.price.as_ref();
        let release = details.release_date.as_ref();

        Self {
            currency: price.and_then(|p| p.currency.clone()),
            price: price.and_then(|p| p.final_price),
            release_date: release
                .and_then(|r| r.date.as_deref())
                .and_then(parse_release_date),
            coming_soon: release.and_then(|r| r.coming_soon),
            supports_linux: details.platforms.as_ref().map(|p| p.linux).unwrap_or(false),
        }
    }

    pub fn value(&self, field: TrackedField) -> FieldValue {
        match field {
            TrackedField::Currency => self.currency.clone().into(),
            TrackedField::Price => self.price.into(),
            TrackedField::ReleaseDate => self.release_date.into(),
            TrackedField::ComingSoon => self.coming_soon.into(),
            TrackedField::SupportsLinux => self.supports_linux.into(),
        }
    }
}

/// Common view on persisted and not yet persisted snapshots
pub trait SnapshotRecord {
    fn package_id(&self) -> i64;
    fn timestamp(&self) -> NaiveDateTime;
    fn values(&self) -> &SnapshotValues;
}

/// A candidate snapshot built from fresh store data. It has no id until stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub package_id: i64,
    /// Taken when the candidate is built, not when it is stored
    pub timestamp: NaiveDateTime,
    pub values: SnapshotValues,
}

impl NewSnapshot {
    pub fn new(package_id: i64, timestamp: NaiveDateTime, values: SnapshotValues) -> Self {
        Self {
            package_id,
            timestamp,
            values,
        }
    }

    /// Build a candidate for `package` from store package details, stamped now
    pub fn from_api_data(package: &Package, details: &PackageDetails) -> Self {
        Self::new(
            package.id,
            Utc::now().naive_utc(),
            SnapshotValues::from_api_data(details),
        )
    }
}

impl SnapshotRecord for NewSnapshot {
    fn package_id(&self) -> i64 {
        self.package_id
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn values(&self) -> &SnapshotValues {
        &self.values
    }
}

/// A stored snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Snapshot {
    pub id: i64,
    pub package_id: i64,
    pub timestamp: NaiveDateTime,
    #[sqlx(flatten)]
    pub values: SnapshotValues,
}

impl SnapshotRecord for Snapshot {
    fn package_id(&self) -> i64 {
        self.package_id
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn values(&self) -> &SnapshotValues {
        &self.values
    }
}

/// A stored snapshot joined with its package, for the recent changes listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecentSnapshot {
    #[sqlx(flatten)]
    pub snapshot: Snapshot,
    pub package_steam_id: String,
    pub package_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_release_date() {
        assert_eq!(
            parse_release_date("02 September, 2015"),
            NaiveDate::from_ymd_opt(2015, 9, 2)
        );
        assert_eq!(
            parse_release_date(" 30 May, 2014 "),
            NaiveDate::from_ymd_opt(2014, 5, 30)
        );
    }

    #[test]
    fn test_parse_release_date_is_lenient() {
        assert_eq!(parse_release_date("Coming Soon"), None);
        assert_eq!(parse_release_date(""), None);
        assert_eq!(parse_release_date("2015-09-02"), None);
    }

    #[test]
    fn test_values_from_api_data() {
        let details: PackageDetails = serde_json::from_value(json!({
            "price": { "currency": "EUR", "final": 1500 },
            "platforms": { "linux": true },
            "release_date": { "date": "02 September, 2015", "coming_soon": true }
        }))
        .unwrap();

        let values = SnapshotValues::from_api_data(&details);
        assert_eq!(values.price, Some(1500));
        assert_eq!(values.currency.as_deref(), Some("EUR"));
        assert!(values.supports_linux);
        assert_eq!(values.release_date, NaiveDate::from_ymd_opt(2015, 9, 2));
        assert_eq!(values.coming_soon, Some(true));
    }

    #[test]
    fn test_values_from_empty_api_data() {
        let values = SnapshotValues::from_api_data(&PackageDetails::default());
        assert_eq!(values, SnapshotValues::default());
        assert!(!values.supports_linux);
        assert_eq!(values.value(TrackedField::ComingSoon), FieldValue::Absent);
        assert_eq!(values.value(TrackedField::SupportsLinux), FieldValue::Flag(false));
    }

    #[test]
    fn test_candidate_has_timestamp() {
        let package = Package {
            id: 8,
            steam_id: "8".to_string(),
            name: None,
        };
        let before = Utc::now().naive_utc();
        let candidate = NewSnapshot::from_api_data(&package, &PackageDetails::default());
        assert_eq!(candidate.package_id, 8);
        assert!(candidate.timestamp >= before);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Absent.to_string(), "-");
        assert_eq!(FieldValue::Integer(1999).to_string(), "1999");
        assert_eq!(TrackedField::ReleaseDate.to_string(), "release_date");
    }
}

//! Plain-text tables for the command line

use crate::models::{FieldValue, RecentSnapshot, SnapshotValues, WatchedItem};
use crate::services::{ItemReport, PackageReport};
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a price in minor units: `1999` and `EUR` give `19.99 EUR`
pub fn format_price(price: Option<i64>, currency: Option<&str>) -> String {
    match (price, currency) {
        (Some(price), Some(currency)) => format!("{} {}", Decimal::new(price, 2), currency),
        (Some(price), None) => Decimal::new(price, 2).to_string(),
        (None, _) => FieldValue::Absent.to_string(),
    }
}

fn format_flag(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => FieldValue::Absent.to_string(),
    }
}

fn value_cells(values: &SnapshotValues) -> [String; 4] {
    [
        format_price(values.price, values.currency.as_deref()),
        FieldValue::from(values.release_date).to_string(),
        format_flag(values.coming_soon),
        format_flag(Some(values.supports_linux)),
    ]
}

/// Build the table with the given column right-aligned
fn finish(builder: Builder, right_aligned: usize) -> String {
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(right_aligned..right_aligned + 1), Alignment::right());
    table.to_string()
}

/// Table of watched apps
pub fn render_ls(items: &[WatchedItem]) -> String {
    if items.is_empty() {
        return "Nothing is being watched.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["App ID", "Name", "Type", "Enabled", "Threshold"]);
    for item in items {
        builder.push_record([
            item.steam_id.clone(),
            item.name.clone().unwrap_or_else(|| FieldValue::Absent.to_string()),
            item.kind.clone(),
            format_flag(Some(item.enabled)),
            format_price(item.threshold, None),
        ]);
    }
    finish(builder, 4)
}

/// Table of the snapshots of each package of one app
pub fn render_packages(packages: &[PackageReport]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Package", "Date", "Price", "Release", "Coming soon", "Linux"]);
    for report in packages {
        if report.snapshots.is_empty() {
            let mut row = vec![report.package.display_name().to_string()];
            row.extend(std::iter::repeat(FieldValue::Absent.to_string()).take(5));
            builder.push_record(row);
            continue;
        }
        for (i, snapshot) in report.snapshots.iter().enumerate() {
            let package = if i == 0 {
                report.package.display_name().to_string()
            } else {
                String::new()
            };
            let mut row = vec![package, snapshot.timestamp.format(TIMESTAMP_FORMAT).to_string()];
            row.extend(value_cells(&snapshot.values));
            builder.push_record(row);
        }
    }
    finish(builder, 2)
}

/// Reports of several apps, one table per app
pub fn render_report(reports: &[ItemReport]) -> String {
    if reports.is_empty() {
        return "Nothing is being watched.".to_string();
    }

    reports
        .iter()
        .map(|report| {
            format!(
                "{} ({})\n{}",
                report.item.display_name(),
                report.item.steam_id,
                render_packages(&report.packages)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Table of the most recent snapshots across all packages
pub fn render_recent(recent: &[RecentSnapshot]) -> String {
    if recent.is_empty() {
        return "No snapshots recorded yet.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Date", "Package", "Price", "Release", "Coming soon", "Linux"]);
    for entry in recent {
        let package = entry
            .package_name
            .clone()
            .unwrap_or_else(|| entry.package_steam_id.clone());
        let mut row = vec![
            entry.snapshot.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            package,
        ];
        row.extend(value_cells(&entry.snapshot.values));
        builder.push_record(row);
    }
    finish(builder, 2)
}

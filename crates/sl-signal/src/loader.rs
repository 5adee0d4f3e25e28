//! CSV catalog loader.
//!
//! # CSV format
//!
//! One row per signal target:
//!
//! ```csv
//! name,lon,lat
//! alpha,9.9920,53.5530
//! bravo,9.9871,53.5602
//! charlie,10.0103,53.5488
//! ```
//!
//! All targets load as `Pending`; statuses exist only at runtime.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sl_core::GeoPoint;

use crate::{SignalError, SignalResult, TargetCatalog};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TargetRecord {
    name: String,
    lon:  f64,
    lat:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`TargetCatalog`] from a CSV file.
pub fn load_targets_csv(path: &Path) -> SignalResult<TargetCatalog> {
    let file = std::fs::File::open(path).map_err(SignalError::Io)?;
    load_targets_reader(file)
}

/// Like [`load_targets_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded catalogs.
pub fn load_targets_reader<R: Read>(reader: R) -> SignalResult<TargetCatalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut positions = Vec::new();
    let mut names = Vec::new();

    for result in csv_reader.deserialize::<TargetRecord>() {
        let row = result.map_err(|e| SignalError::Parse(e.to_string()))?;
        if !(-180.0..=180.0).contains(&row.lon) || !(-90.0..=90.0).contains(&row.lat) {
            return Err(SignalError::Parse(format!(
                "target {:?} has out-of-range coordinates ({}, {})",
                row.name, row.lon, row.lat
            )));
        }
        positions.push(GeoPoint::new(row.lon, row.lat));
        names.push(row.name);
    }

    Ok(TargetCatalog::new(positions, names))
}

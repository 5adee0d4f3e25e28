//! Fleet definition and loading.
//!
//! # CSV format
//!
//! One row per drone; `name` must be unique (it becomes the drone's stable
//! display identity, while `DroneId` is the row index):
//!
//! ```csv
//! name,lon,lat
//! drone-0,9.9910,53.5541
//! drone-1,9.9884,53.5525
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sl_core::{GeoPoint, SimRng};

use crate::{SimError, SimResult};

/// One drone's spawn definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetMember {
    pub name:  String,
    pub start: GeoPoint,
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FleetRecord {
    name: String,
    lon:  f64,
    lat:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a fleet from a CSV file.
pub fn load_fleet_csv(path: &Path) -> SimResult<Vec<FleetMember>> {
    let file = std::fs::File::open(path).map_err(SimError::Io)?;
    load_fleet_reader(file)
}

/// Like [`load_fleet_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded fleets.
pub fn load_fleet_reader<R: Read>(reader: R) -> SimResult<Vec<FleetMember>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut fleet = Vec::new();
    for result in csv_reader.deserialize::<FleetRecord>() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        fleet.push(FleetMember {
            name:  row.name,
            start: GeoPoint::new(row.lon, row.lat),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for member in &fleet {
        if !seen.insert(member.name.as_str()) {
            return Err(SimError::Parse(format!("duplicate drone name {:?}", member.name)));
        }
    }

    Ok(fleet)
}

/// Generate `count` drones named `drone-0 … drone-N`, scattered uniformly
/// over a disc of `radius_m` metres around `center`.
///
/// Deterministic for a given RNG state — the usual way demos and tests
/// produce reproducible fleets.
pub fn scatter_fleet(count: usize, center: GeoPoint, radius_m: f64, rng: &mut SimRng) -> Vec<FleetMember> {
    (0..count)
        .map(|i| {
            // sqrt keeps the density uniform over the disc area.
            let distance = radius_m * rng.gen_range(0.0f64..1.0).sqrt();
            let bearing = rng.gen_range(0.0f64..360.0);
            FleetMember {
                name:  format!("drone-{i}"),
                start: center.destination(bearing, distance),
            }
        })
        .collect()
}

//! The shared fleet registry, viewed as a per-step immutable snapshot.
//!
//! Every drone publishes `(position, current target)` once per tick; every
//! drone reads all entries when deciding.  Rather than a shared mutable map,
//! the scheduler hands each `decide` call an immutable [`RegistrySnapshot`]
//! of the previous step and collects this step's writes, installing them
//! between steps.  Last-writer-per-key semantics are trivially preserved
//! because each drone writes only its own record.

use sl_core::{DroneId, GeoPoint, TargetId};

/// One drone's published state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneRecord {
    pub id:       DroneId,
    pub position: GeoPoint,
    /// The target this drone is currently committed to, if any.
    pub target:   Option<TargetId>,
}

/// An immutable view of every drone's record as of the previous step.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    records: Vec<DroneRecord>,
}

impl RegistrySnapshot {
    /// Build a snapshot; records are expected in ascending `DroneId` order.
    pub fn new(records: Vec<DroneRecord>) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].id < w[1].id));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DroneRecord> {
        self.records.iter()
    }

    /// Look up one drone's record.
    pub fn get(&self, id: DroneId) -> Option<&DroneRecord> {
        // Records are id-ordered and, in the dense common case, id == index.
        let i = id.index();
        if let Some(rec) = self.records.get(i) {
            if rec.id == id {
                return Some(rec);
            }
        }
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Arithmetic mean of all drone positions.
    ///
    /// Searching from the fleet centroid (rather than each drone's own
    /// position) is what biases independent drones toward converging on the
    /// same target.  `None` only for an empty fleet.
    pub fn centroid(&self) -> Option<GeoPoint> {
        if self.records.is_empty() {
            return None;
        }
        let mut lon = 0.0;
        let mut lat = 0.0;
        for rec in &self.records {
            lon += rec.position.lon;
            lat += rec.position.lat;
        }
        let n = self.records.len() as f64;
        Some(GeoPoint::new(lon / n, lat / n))
    }

    /// All records (self included) committed to `target` and currently within
    /// `tolerance_m` of `target_pos`.
    pub fn peers_at_target(
        &self,
        target:      TargetId,
        target_pos:  GeoPoint,
        tolerance_m: f64,
    ) -> Vec<DroneRecord> {
        self.records
            .iter()
            .copied()
            .filter(|r| {
                r.target == Some(target) && r.position.distance_m(target_pos) < tolerance_m
            })
            .collect()
    }
}

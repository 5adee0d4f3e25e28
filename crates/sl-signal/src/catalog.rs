//! Target catalog: SoA storage plus an R-tree for nearest-target queries.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lon, lat)` to `TargetId`.  The index is
//! bulk-loaded once at construction — targets never move — and every
//! nearest-neighbor query walks it in ascending-distance order.  Squared
//! Euclidean distance in lon/lat space is sufficient here: queries only rank
//! candidates within one operational area (error < 0.1 % at ≤ 60° lat).

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sl_core::{GeoPoint, TargetId};

// ── Status ────────────────────────────────────────────────────────────────────

/// Lifecycle of a signal target.
///
/// `Pending` is the only state eligible for nearest-unlocated search and for
/// marking; the two terminal states are written once and never revisited.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TargetStatus {
    /// Not yet localized — discoverable.
    #[default]
    Pending,
    /// A quorum held formation long enough; position is considered known.
    Located,
    /// Ruled out by the elevation check (terrain above the flight ceiling).
    Unreachable,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lon, lat]` point with
/// the associated `TargetId`.
#[derive(Clone)]
struct TargetEntry {
    point: [f64; 2], // [lon, lat]
    id: TargetId,
}

impl RTreeObject for TargetEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for TargetEntry {
    /// Squared Euclidean distance in lon/lat space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

// ── TargetCatalog ─────────────────────────────────────────────────────────────

/// All discoverable signal targets.
///
/// Positions and names are immutable after construction; `status` is the
/// shared mutable flag described in the crate docs.  `TargetId` is the index
/// into all three arrays.
pub struct TargetCatalog {
    positions: Vec<GeoPoint>,
    names:     Vec<String>,
    status:    Vec<TargetStatus>,
    spatial_idx: RTree<TargetEntry>,
}

impl TargetCatalog {
    /// Build a catalog from parallel position/name lists.
    pub fn new(positions: Vec<GeoPoint>, names: Vec<String>) -> Self {
        debug_assert_eq!(positions.len(), names.len());
        let entries: Vec<TargetEntry> = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| TargetEntry {
                point: [pos.lon, pos.lat],
                id: TargetId(i as u32),
            })
            .collect();
        let status = vec![TargetStatus::Pending; positions.len()];
        Self {
            positions,
            names,
            status,
            spatial_idx: RTree::bulk_load(entries),
        }
    }

    /// An empty catalog — drones idle indefinitely against it.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    // ── Dimensions & field access ─────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn position(&self, id: TargetId) -> GeoPoint {
        self.positions[id.index()]
    }

    #[inline]
    pub fn name(&self, id: TargetId) -> &str {
        &self.names[id.index()]
    }

    #[inline]
    pub fn status(&self, id: TargetId) -> TargetStatus {
        self.status[id.index()]
    }

    /// Iterator over all `TargetId`s in ascending index order.
    pub fn target_ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        (0..self.positions.len() as u32).map(TargetId)
    }

    /// Number of targets currently in the given status.
    pub fn count_with_status(&self, status: TargetStatus) -> usize {
        self.status.iter().filter(|&&s| s == status).count()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// All targets in ascending distance from `from`, regardless of status.
    ///
    /// The iterator is lazy; callers typically stop at the first match.
    pub fn nearest(&self, from: GeoPoint) -> impl Iterator<Item = TargetId> + '_ {
        self.spatial_idx
            .nearest_neighbor_iter(&[from.lon, from.lat])
            .map(|e| e.id)
    }

    /// The nearest `Pending` target to `from`, falling back to the nearest
    /// target of any status when nothing is pending.
    ///
    /// Returns `None` only for an empty catalog.  The fallback means a swarm
    /// that has located everything re-converges on the nearest solved target;
    /// this mirrors the source behavior and is flagged for policy review in
    /// DESIGN.md rather than silently changed.
    pub fn nearest_pending_or_first(&self, from: GeoPoint) -> Option<TargetId> {
        let mut first = None;
        for id in self.nearest(from) {
            if first.is_none() {
                first = Some(id);
            }
            if self.status[id.index()] == TargetStatus::Pending {
                return Some(id);
            }
        }
        first
    }

    // ── Status transitions ────────────────────────────────────────────────

    /// Mark `id` as located.  A no-op unless the target is still `Pending`,
    /// so the `Pending → Located` transition happens at most once even if a
    /// stale agent re-marks a solved target.
    pub fn mark_located(&mut self, id: TargetId) {
        let slot = &mut self.status[id.index()];
        if *slot == TargetStatus::Pending {
            *slot = TargetStatus::Located;
        }
    }

    /// Mark `id` as unreachable (elevation check).  Same `Pending`-gating as
    /// [`mark_located`](Self::mark_located).
    pub fn mark_unreachable(&mut self, id: TargetId) {
        let slot = &mut self.status[id.index()];
        if *slot == TargetStatus::Pending {
            *slot = TargetStatus::Unreachable;
        }
    }
}

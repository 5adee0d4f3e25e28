//! The permitted-area membership check.

use sl_core::GeoPoint;

use crate::AscGrid;

/// The area drones are allowed to move in, backed by a raster grid.
///
/// A point is inside the perimeter iff it falls within the grid extent AND
/// its cell does not carry the nodata value (nodata marks the region outside
/// the operational polygon in the exported raster).
#[derive(Clone, Debug)]
pub struct Perimeter {
    grid: AscGrid,
}

impl Perimeter {
    pub fn new(grid: AscGrid) -> Self {
        Self { grid }
    }

    /// Checks whether `p` is inside the permitted area.
    pub fn is_inside(&self, p: GeoPoint) -> bool {
        match self.grid.value_at(p) {
            Some(v) => v != self.grid.nodata,
            None    => false,
        }
    }

    /// Borrow the underlying grid (extent queries, diagnostics).
    pub fn grid(&self) -> &AscGrid {
        &self.grid
    }
}

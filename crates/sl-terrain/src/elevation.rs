//! Ground elevation lookup.

use sl_core::GeoPoint;

use crate::AscGrid;

/// Ground elevation in metres, backed by a raster grid.
#[derive(Clone, Debug)]
pub struct ElevationModel {
    grid: AscGrid,
}

impl ElevationModel {
    pub fn new(grid: AscGrid) -> Self {
        Self { grid }
    }

    /// Elevation at `p` in metres, or `-1.0` if the grid has no information
    /// for this coordinate.
    pub fn height_at(&self, p: GeoPoint) -> f64 {
        self.grid.value_at(p).unwrap_or(-1.0)
    }

    /// Borrow the underlying grid.
    pub fn grid(&self) -> &AscGrid {
        &self.grid
    }
}

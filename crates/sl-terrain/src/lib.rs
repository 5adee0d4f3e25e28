//! `sl-terrain` — raster layers backing the permitted-area and elevation checks.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`grid`]      | `AscGrid` — ESRI ASCII grid parsing and cell lookup   |
//! | [`perimeter`] | `Perimeter` — point-in-permitted-area membership      |
//! | [`elevation`] | `ElevationModel` — ground height lookup               |
//! | [`error`]     | `TerrainError`, `TerrainResult<T>`                    |
//!
//! Both layers are thin views over the same grid type: the perimeter treats
//! nodata cells as "outside", the elevation model returns raw cell values.

pub mod elevation;
pub mod error;
pub mod grid;
pub mod perimeter;

#[cfg(test)]
mod tests;

pub use elevation::ElevationModel;
pub use error::{TerrainError, TerrainResult};
pub use grid::AscGrid;
pub use perimeter::Perimeter;

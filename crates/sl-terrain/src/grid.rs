//! ESRI ASCII grid (`.asc`) parsing and cell lookup.
//!
//! # File format
//!
//! ```text
//! ncols        4
//! nrows        3
//! xllcorner    9.900
//! yllcorner    53.500
//! cellsize     0.001
//! NODATA_value 1
//! 0 0 0 1
//! 0 0 0 0
//! 1 0 0 0
//! ```
//!
//! Header keys are case-insensitive.  Data rows follow in row-major order
//! with the **northernmost row first** (the standard ASC convention); cell
//! lookup converts geographic coordinates accordingly.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sl_core::GeoPoint;

use crate::{TerrainError, TerrainResult};

/// A parsed ESRI ASCII grid.
///
/// Shared by [`Perimeter`](crate::Perimeter) and
/// [`ElevationModel`](crate::ElevationModel); the two layers interpret cell
/// values differently but index them identically.
#[derive(Clone, Debug)]
pub struct AscGrid {
    pub ncols:     usize,
    pub nrows:     usize,
    /// Longitude of the grid's west edge (lower-left corner).
    pub xllcorner: f64,
    /// Latitude of the grid's south edge (lower-left corner).
    pub yllcorner: f64,
    /// Cell edge length in degrees.
    pub cellsize:  f64,
    /// The value that marks a cell as carrying no data.
    pub nodata:    f64,
    /// Row-major values, north row first.  Length = `ncols * nrows`.
    values: Vec<f64>,
}

impl AscGrid {
    /// Construct a grid from already-parsed parts.
    ///
    /// Used by tests and synthetic-scenario builders; file input goes through
    /// [`from_path`](Self::from_path) / [`from_reader`](Self::from_reader).
    pub fn new(
        ncols:     usize,
        nrows:     usize,
        xllcorner: f64,
        yllcorner: f64,
        cellsize:  f64,
        nodata:    f64,
        values:    Vec<f64>,
    ) -> TerrainResult<Self> {
        if ncols == 0 || nrows == 0 {
            return Err(TerrainError::Header("grid dimensions must be non-zero".into()));
        }
        if cellsize <= 0.0 {
            return Err(TerrainError::Header(format!("cellsize {cellsize} must be positive")));
        }
        if values.len() != ncols * nrows {
            return Err(TerrainError::CellCount {
                expected: ncols * nrows,
                got:      values.len(),
            });
        }
        Ok(Self { ncols, nrows, xllcorner, yllcorner, cellsize, nodata, values })
    }

    /// Construct a grid with every cell set to `fill` — handy for synthetic
    /// rectangular areas in demos and tests.
    pub fn filled(
        ncols:     usize,
        nrows:     usize,
        xllcorner: f64,
        yllcorner: f64,
        cellsize:  f64,
        nodata:    f64,
        fill:      f64,
    ) -> TerrainResult<Self> {
        Self::new(ncols, nrows, xllcorner, yllcorner, cellsize, nodata, vec![fill; ncols * nrows])
    }

    /// Parse an `.asc` file from disk.
    pub fn from_path(path: &Path) -> TerrainResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`from_path`](Self::from_path) but accepts any `Read` source.
    ///
    /// Useful for testing (pass a `std::io::Cursor`) or embedded grids.
    pub fn from_reader<R: Read>(reader: R) -> TerrainResult<Self> {
        let reader = BufReader::new(reader);

        let mut ncols:     Option<usize> = None;
        let mut nrows:     Option<usize> = None;
        let mut xllcorner: Option<f64>   = None;
        let mut yllcorner: Option<f64>   = None;
        let mut cellsize:  Option<f64>   = None;
        let mut nodata:    Option<f64>   = None;
        let mut values:    Vec<f64>      = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let first = parts.next().unwrap_or_default();

            // Header lines start with an alphabetic key; everything else is data.
            if first.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                let value = parts
                    .next()
                    .ok_or_else(|| TerrainError::Header(format!("missing value for {first:?}")))?;
                match first.to_ascii_lowercase().as_str() {
                    "ncols"        => ncols = Some(parse(value)?),
                    "nrows"        => nrows = Some(parse(value)?),
                    "xllcorner"    => xllcorner = Some(parse(value)?),
                    "yllcorner"    => yllcorner = Some(parse(value)?),
                    "cellsize"     => cellsize = Some(parse(value)?),
                    "nodata_value" => nodata = Some(parse(value)?),
                    other => {
                        return Err(TerrainError::Header(format!("unknown header key {other:?}")))
                    }
                }
            } else {
                for tok in trimmed.split_whitespace() {
                    values.push(parse(tok)?);
                }
            }
        }

        let require = |name: &str, v: Option<f64>| {
            v.ok_or_else(|| TerrainError::Header(format!("missing header key {name:?}")))
        };

        Self::new(
            ncols.ok_or_else(|| TerrainError::Header("missing header key \"ncols\"".into()))?,
            nrows.ok_or_else(|| TerrainError::Header("missing header key \"nrows\"".into()))?,
            require("xllcorner", xllcorner)?,
            require("yllcorner", yllcorner)?,
            require("cellsize", cellsize)?,
            // NODATA_value is optional in ESRI ASCII grids; -9999 is the common default.
            nodata.unwrap_or(-9999.0),
            values,
        )
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// `true` if `p` falls within the grid's geographic extent.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.xllcorner
            && p.lon < self.xllcorner + self.ncols as f64 * self.cellsize
            && p.lat >= self.yllcorner
            && p.lat < self.yllcorner + self.nrows as f64 * self.cellsize
    }

    /// Raw cell value at `p`, or `None` if `p` is outside the extent.
    pub fn value_at(&self, p: GeoPoint) -> Option<f64> {
        if !self.contains(p) {
            return None;
        }
        let col = ((p.lon - self.xllcorner) / self.cellsize) as usize;
        let row_from_south = ((p.lat - self.yllcorner) / self.cellsize) as usize;
        // Values are stored north row first.
        let row = self.nrows - 1 - row_from_south;
        Some(self.values[row * self.ncols + col])
    }

    /// Mutate a single cell (row counted from the north, ASC order).
    ///
    /// Scenario builders use this to carve nodata holes into synthetic grids.
    pub fn set_cell(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.ncols + col] = value;
    }
}

fn parse<T: std::str::FromStr>(tok: &str) -> TerrainResult<T> {
    tok.parse()
        .map_err(|_| TerrainError::Value(tok.to_string()))
}

//! Unit tests for sl-terrain.

use std::io::Cursor;

use sl_core::GeoPoint;

use crate::{AscGrid, ElevationModel, Perimeter, TerrainError};

const SAMPLE_ASC: &str = "\
ncols        4
nrows        3
xllcorner    9.900
yllcorner    53.500
cellsize     0.100
NODATA_value 1
0 0 0 1
0 0 0 0
1 0 0 0
";

fn sample_grid() -> AscGrid {
    AscGrid::from_reader(Cursor::new(SAMPLE_ASC)).unwrap()
}

#[cfg(test)]
mod grid {
    use super::*;

    #[test]
    fn parses_header() {
        let g = sample_grid();
        assert_eq!(g.ncols, 4);
        assert_eq!(g.nrows, 3);
        assert_eq!(g.xllcorner, 9.9);
        assert_eq!(g.yllcorner, 53.5);
        assert_eq!(g.cellsize, 0.1);
        assert_eq!(g.nodata, 1.0);
    }

    #[test]
    fn north_row_first_orientation() {
        let g = sample_grid();
        // South-west corner cell is the last data row's first value (1 = nodata).
        assert_eq!(g.value_at(GeoPoint::new(9.95, 53.55)), Some(1.0));
        // North-east corner cell is the first data row's last value.
        assert_eq!(g.value_at(GeoPoint::new(10.25, 53.75)), Some(1.0));
        // Center cells carry 0.
        assert_eq!(g.value_at(GeoPoint::new(10.05, 53.65)), Some(0.0));
    }

    #[test]
    fn outside_extent_is_none() {
        let g = sample_grid();
        assert_eq!(g.value_at(GeoPoint::new(9.0, 53.6)), None);
        assert_eq!(g.value_at(GeoPoint::new(10.05, 52.0)), None);
        // East/north edges are exclusive.
        assert_eq!(g.value_at(GeoPoint::new(10.3, 53.6)), None);
        assert_eq!(g.value_at(GeoPoint::new(10.05, 53.8)), None);
    }

    #[test]
    fn cell_count_mismatch_rejected() {
        let bad = "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -1\n1 2 3\n";
        match AscGrid::from_reader(Cursor::new(bad)) {
            Err(TerrainError::CellCount { expected: 4, got: 3 }) => {}
            other => panic!("expected CellCount error, got {other:?}"),
        }
    }

    #[test]
    fn missing_header_rejected() {
        let bad = "ncols 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2\n";
        assert!(matches!(
            AscGrid::from_reader(Cursor::new(bad)),
            Err(TerrainError::Header(_))
        ));
    }

    #[test]
    fn default_nodata_when_absent() {
        let asc = "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n5\n";
        let g = AscGrid::from_reader(Cursor::new(asc)).unwrap();
        assert_eq!(g.nodata, -9999.0);
    }
}

#[cfg(test)]
mod perimeter {
    use super::*;

    #[test]
    fn nodata_cells_are_outside() {
        let p = Perimeter::new(sample_grid());
        assert!(p.is_inside(GeoPoint::new(10.05, 53.65)));
        // South-west nodata cell.
        assert!(!p.is_inside(GeoPoint::new(9.95, 53.55)));
    }

    #[test]
    fn beyond_extent_is_outside() {
        let p = Perimeter::new(sample_grid());
        assert!(!p.is_inside(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn carved_hole() {
        let mut grid = AscGrid::filled(3, 3, 0.0, 0.0, 1.0, -1.0, 0.0).unwrap();
        grid.set_cell(1, 1, -1.0); // center cell becomes nodata
        let p = Perimeter::new(grid);
        assert!(p.is_inside(GeoPoint::new(0.5, 0.5)));
        assert!(!p.is_inside(GeoPoint::new(1.5, 1.5)));
    }
}

#[cfg(test)]
mod elevation {
    use super::*;

    #[test]
    fn height_lookup() {
        let grid = AscGrid::filled(2, 2, 0.0, 0.0, 1.0, -9999.0, 42.0).unwrap();
        let e = ElevationModel::new(grid);
        assert_eq!(e.height_at(GeoPoint::new(0.5, 0.5)), 42.0);
    }

    #[test]
    fn outside_extent_is_minus_one() {
        let grid = AscGrid::filled(2, 2, 0.0, 0.0, 1.0, -9999.0, 42.0).unwrap();
        let e = ElevationModel::new(grid);
        assert_eq!(e.height_at(GeoPoint::new(5.0, 5.0)), -1.0);
    }
}

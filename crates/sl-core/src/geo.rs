//! Geographic coordinate type and bearing/distance primitives.
//!
//! `GeoPoint` uses `f64` (double-precision) longitude/latitude.  The decision
//! engine steers in 10 m steps against 50 m and 300 m thresholds, so the
//! sub-meter error of f64 spherical math is comfortably below anything the
//! swarm can perceive; f32 (~1 m at the equator) would not be.
//!
//! All three primitives — [`distance_m`](GeoPoint::distance_m),
//! [`bearing_to`](GeoPoint::bearing_to), and
//! [`destination`](GeoPoint::destination) — use standard great-circle
//! formulae on a spherical Earth (mean radius).  `destination` is the
//! movement primitive: agents never compute coordinates themselves, they
//! request "this bearing, this many meters" and get the resulting point.

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Normalize an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// A WGS-84 geographic coordinate stored as double-precision floats.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing from `self` to `other`, degrees `[0, 360)`.
    ///
    /// 0° = north, 90° = east.  For coincident points the formula degenerates
    /// to 0° (north), which downstream code treats as an arbitrary-but-stable
    /// choice.
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        normalize_deg(y.atan2(x).to_degrees())
    }

    /// The point reached by travelling `distance_m` metres from `self` along
    /// the great circle with initial bearing `bearing_deg`.
    ///
    /// This is the movement primitive executed for every `MoveTowards`
    /// action.  Distances of zero return `self` exactly.
    pub fn destination(self, bearing_deg: f64, distance_m: f64) -> GeoPoint {
        if distance_m == 0.0 {
            return self;
        }

        let ang = distance_m / EARTH_RADIUS_M; // angular distance
        let brg = bearing_deg.to_radians();

        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();

        let lat2 = (lat1.sin() * ang.cos() + lat1.cos() * ang.sin() * brg.cos()).asin();
        let lon2 = lon1
            + (brg.sin() * ang.sin() * lat1.cos())
                .atan2(ang.cos() - lat1.sin() * lat2.sin());

        GeoPoint {
            lon: lon2.to_degrees(),
            lat: lat2.to_degrees(),
        }
    }

    /// Approximate bounding-box check — much cheaper than `distance_m` for
    /// quick rejection before exact distance tests.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

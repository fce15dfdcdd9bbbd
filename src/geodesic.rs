//! Great-circle distance between two coordinates.
//!
//! ```text
//! d = 2R * asin(sqrt(sin²(Δφ/2) + cos(φ1)cos(φ2)sin²(Δλ/2)))
//! ```
//!
//! `geo`'s own haversine uses the IUGG mean radius (6371008.8 m); distances
//! here are pinned to the rounder 6371 km so totals stay comparable with
//! existing poster output.

use geo::Point;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance in meters between two points given as `x = longitude`,
/// `y = latitude` in degrees. Inputs are not range checked.
pub fn haversine_m(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat_1 = a.y().to_radians();
    let lat_2 = b.y().to_radians();
    let d_lat = lat_2 - lat_1;
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_1.cos() * lat_2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `h` a hair past 1 for antipodal points.
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

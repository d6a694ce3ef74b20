//! Spherical geodesy on a sphere of radius [`EARTH_RADIUS`].
//!
//! Longitudes and latitudes are decimal degrees, depths and distances are km.
//! Depth is positive downwards, so a negative depth is above sea level.
//! None of the functions here fail: coincident points give zero distances
//! and a zero azimuth.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{Point3, Vector3};

/// Mean Earth radius in km.
pub const EARTH_RADIUS: f64 = 6371.0;

/// A geographic point: longitude, latitude (degrees) and depth (km).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
    pub depth: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64, depth: f64) -> Self {
        Self { lon, lat, depth }
    }

    /// A point at sea level.
    pub fn surface(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, 0.0)
    }

    pub fn to_cartesian(self) -> Point3 {
        spherical_to_cartesian(self.lon, self.lat, self.depth)
    }

    pub fn from_cartesian(v: Point3) -> Self {
        cartesian_to_spherical(v)
    }

    /// Azimuth from this point to `other`, clockwise from north in `[0, 360)`.
    pub fn azimuth(self, other: GeoPoint) -> f64 {
        azimuth(self.lon, self.lat, other.lon, other.lat)
    }

    /// Great-circle distance ignoring depth.
    pub fn horizontal_distance(self, other: GeoPoint) -> f64 {
        geodetic_distance(self.lon, self.lat, other.lon, other.lat)
    }

    /// Great-circle distance combined with the depth difference.
    pub fn distance(self, other: GeoPoint) -> f64 {
        distance(self.lon, self.lat, self.depth, other.lon, other.lat, other.depth)
    }

    /// The point `horizontal_distance` km away along `azimuth`, with its depth
    /// changed by `vertical_increment` km.
    pub fn point_at(self, horizontal_distance: f64, vertical_increment: f64, azimuth: f64) -> Self {
        let (lon, lat) = point_at(self.lon, self.lat, azimuth, horizontal_distance);
        Self::new(lon, lat, self.depth + vertical_increment)
    }
}

/// Map an angle in degrees onto `[0, 360)`.
pub fn normalize_azimuth(azimuth: f64) -> f64 {
    let a = azimuth.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Position vector of a geographic point. A vector of length 1 is 1 km.
pub fn spherical_to_cartesian(lon: f64, lat: f64, depth: f64) -> Point3 {
    let phi = lon.to_radians();
    let theta = lat.to_radians();
    let rr = EARTH_RADIUS - depth;
    let cos_theta_r = rr * theta.cos();
    Point3::new(cos_theta_r * phi.cos(), cos_theta_r * phi.sin(), rr * theta.sin())
}

/// Inverse of [`spherical_to_cartesian`].
pub fn cartesian_to_spherical(v: Vector3) -> GeoPoint {
    let rr = v.length();
    if rr == 0.0 {
        return GeoPoint::new(0.0, 0.0, EARTH_RADIUS);
    }
    let lat = (v.z / rr).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v.y.atan2(v.x).to_degrees();
    GeoPoint::new(lon, lat, EARTH_RADIUS - rr)
}

/// Haversine great-circle distance in km.
pub fn geodetic_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1) = (lon1.to_radians(), lat1.to_radians());
    let (lon2, lat2) = (lon2.to_radians(), lat2.to_radians());
    let a = ((lat1 - lat2) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon1 - lon2) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * a.sqrt().min(1.0).asin()
}

/// Azimuth of the great-circle arc from the first point to the second,
/// clockwise from north, in `[0, 360)`.
pub fn azimuth(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1) = (lon1.to_radians(), lat1.to_radians());
    let (lon2, lat2) = (lon2.to_radians(), lat2.to_radians());
    let cos_lat2 = lat2.cos();
    let true_course = ((lon1 - lon2).sin() * cos_lat2)
        .atan2(lat1.cos() * lat2.sin() - lat1.sin() * cos_lat2 * (lon1 - lon2).cos())
        .to_degrees();
    normalize_azimuth(360.0 - true_course)
}

/// Distance between two points considering depth (Pythagoras on the
/// horizontal great-circle distance and the depth difference).
pub fn distance(lon1: f64, lat1: f64, depth1: f64, lon2: f64, lat2: f64, depth2: f64) -> f64 {
    let hdist = geodetic_distance(lon1, lat1, lon2, lat2);
    hdist.hypot(depth1 - depth2)
}

/// Forward geodetic problem: the point `distance` km from `(lon, lat)` along
/// the great circle leaving it at `azimuth`. Longitude is wrapped to `[-180, 180)`.
pub fn point_at(lon: f64, lat: f64, azimuth: f64, distance: f64) -> (f64, f64) {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    let tc = (360.0 - azimuth).to_radians();
    let (sin_dist, cos_dist) = (distance / EARTH_RADIUS).sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();

    let sin_lats = (sin_lat * cos_dist + cos_lat * sin_dist * tc.cos()).clamp(-1.0, 1.0);
    let lats = sin_lats.asin().to_degrees();

    let dlon = (tc.sin() * sin_dist * cos_lat).atan2(cos_dist - sin_lat * sin_lats);
    let lons = ((lon - dlon + PI).rem_euclid(2.0 * PI) - PI).to_degrees();
    (lons, lats)
}

/// Signed distance in km from a point to the great circle through
/// `(alon, alat)` with azimuth `aazimuth`.
///
/// Positive when the point lies on the right-hand side of the arc direction,
/// negative on the left, zero on the arc.
pub fn distance_to_arc(alon: f64, alat: f64, aazimuth: f64, plon: f64, plat: f64) -> f64 {
    let azimuth_to_target = azimuth(alon, alat, plon, plat);
    let distance_to_target = geodetic_distance(alon, alat, plon, plat);
    let t_angle = (azimuth_to_target - aazimuth + 360.0).rem_euclid(360.0);
    let angle = (t_angle.to_radians().sin() * (distance_to_target / EARTH_RADIUS).sin())
        .clamp(-1.0, 1.0)
        .acos();
    (PI / 2.0 - angle) * EARTH_RADIUS
}

/// Smallest great-circle distance from `(lon, lat)` to any of the mesh points.
pub fn min_geodetic_distance(mlons: &[f64], mlats: &[f64], lon: f64, lat: f64) -> f64 {
    mlons
        .iter()
        .zip(mlats)
        .map(|(&mlon, &mlat)| geodetic_distance(mlon, mlat, lon, lat))
        .fold(f64::INFINITY, f64::min)
}

/// The point halfway along the great-circle arc between two points.
pub fn middle_point(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> (f64, f64) {
    if lon1 == lon2 && lat1 == lat2 {
        return (lon1, lat1);
    }
    let dist = geodetic_distance(lon1, lat1, lon2, lat2);
    let azim = azimuth(lon1, lat1, lon2, lat2);
    point_at(lon1, lat1, azim, dist / 2.0)
}

/// Signed angle from `lon1` to `lon2` in degrees, positive eastwards,
/// never exceeding 180 in magnitude.
pub fn longitudinal_extent(lon1: f64, lon2: f64) -> f64 {
    (lon2 - lon1 + 180.0).rem_euclid(360.0) - 180.0
}

/// Whether the segment between two longitudes crosses the antimeridian.
pub fn cross_idl(lon1: f64, lon2: f64) -> bool {
    lon1 * lon2 < 0.0 && (lon1 - lon2).abs() > 180.0
}

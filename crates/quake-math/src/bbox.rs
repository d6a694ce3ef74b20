use quake_core::{QuakeError, Result};
use serde::{Deserialize, Serialize};

use crate::geodetic::{longitudinal_extent, spherical_to_cartesian};
use crate::Vector3;

/// Longitude/latitude bounding box on the sphere.
///
/// When the box straddles the antimeridian `west` is numerically greater
/// than `east`, e.g. `west = 179.9, east = -179.9`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalBoundingBox {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl SphericalBoundingBox {
    pub fn new(west: f64, east: f64, north: f64, south: f64) -> Self {
        Self {
            west,
            east,
            north,
            south,
        }
    }

    /// Bounding box of a point collection.
    ///
    /// Fails if the points span more than 180 degrees of longitude, since no
    /// single hemisphere bound to the poles contains them.
    pub fn from_points(lons: &[f64], lats: &[f64]) -> Result<Self> {
        if lons.is_empty() || lons.len() != lats.len() {
            return Err(QuakeError::InvalidOperation(format!(
                "bounding box needs matching non-empty coordinates, got {} lons and {} lats",
                lons.len(),
                lats.len()
            )));
        }
        let north = lats.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let south = lats.iter().copied().fold(f64::INFINITY, f64::min);
        let mut west = lons.iter().copied().fold(f64::INFINITY, f64::min);
        let mut east = lons.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if longitudinal_extent(west, east) < 0.0 {
            // points lie on both sides of the antimeridian: the west border
            // is the lowest positive longitude, the east one the highest negative
            west = lons
                .iter()
                .copied()
                .filter(|&lon| lon > 0.0)
                .fold(f64::INFINITY, f64::min);
            east = lons
                .iter()
                .copied()
                .filter(|&lon| lon < 0.0)
                .fold(f64::NEG_INFINITY, f64::max);
            let contained = lons.iter().all(|&lon| {
                longitudinal_extent(west, lon) >= 0.0 && longitudinal_extent(lon, east) >= 0.0
            });
            if !contained {
                return Err(QuakeError::Tolerance(
                    "points collection has longitudinal extent wider than 180 deg".into(),
                ));
            }
        }
        Ok(Self::new(west, east, north, south))
    }

    /// Bounding box of a closed polygon whose edges are great-circle arcs.
    ///
    /// Unlike [`Self::from_points`], the latitude range includes the poleward
    /// bulge of each edge between its end points.
    pub fn from_polygon(lons: &[f64], lats: &[f64]) -> Result<Self> {
        let mut bbox = Self::from_points(lons, lats)?;
        let n = lons.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let a = spherical_to_cartesian(lons[i], lats[i], 0.0).normalize();
            let b = spherical_to_cartesian(lons[j], lats[j], 0.0).normalize();
            if let Some((max_lat, min_lat)) = arc_latitude_extremes(a, b) {
                bbox.north = bbox.north.max(max_lat);
                bbox.south = bbox.south.min(min_lat);
            }
        }
        Ok(bbox)
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitudinal width in degrees, accounting for antimeridian wrap.
    pub fn lon_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east - self.west + 360.0
        } else {
            self.east - self.west
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }
}

/// Highest and lowest latitudes reached strictly inside the minor arc from
/// `a` to `b`, if the arc passes its great circle's northern or southern
/// vertex. Both inputs are unit vectors.
fn arc_latitude_extremes(a: Vector3, b: Vector3) -> Option<(f64, f64)> {
    let n = a.cross(b);
    if n.length() < 1e-15 {
        return None;
    }
    let n = n.normalize();
    // northernmost point of the great circle
    let vertex = Vector3::Z - n * n.z;
    if vertex.length() < 1e-15 {
        return None;
    }
    let vertex = vertex.normalize();

    let on_arc = |p: Vector3| a.cross(p).dot(n) >= 0.0 && p.cross(b).dot(n) >= 0.0;
    let lat_of = |p: Vector3| p.z.clamp(-1.0, 1.0).asin().to_degrees();

    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lat = f64::INFINITY;
    if on_arc(vertex) {
        max_lat = lat_of(vertex);
    }
    if on_arc(-vertex) {
        min_lat = lat_of(-vertex);
    }
    if max_lat.is_finite() || min_lat.is_finite() {
        Some((max_lat, min_lat))
    } else {
        None
    }
}

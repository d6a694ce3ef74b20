use quake_core::{QuakeError, Result};
use quake_math::{GeoPoint, Point3};

/// A batch of target points (sites), kept in both geographic and Cartesian
/// form so each metric reads whichever it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBatch {
    lons: Vec<f64>,
    lats: Vec<f64>,
    depths: Vec<f64>,
    xyz: Vec<Point3>,
}

impl PointBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: &[GeoPoint]) -> Self {
        let mut batch = Self::with_capacity(points.len());
        for &p in points {
            batch.push(p);
        }
        batch
    }

    /// Sea-level points from `(N, 2)` geographic coordinates.
    pub fn from_lon_lat(lons: &[f64], lats: &[f64]) -> Result<Self> {
        Self::from_lon_lat_depth(lons, lats, &vec![0.0; lons.len()])
    }

    /// Points from `(N, 3)` geographic coordinates.
    pub fn from_lon_lat_depth(lons: &[f64], lats: &[f64], depths: &[f64]) -> Result<Self> {
        if lons.len() != lats.len() || lons.len() != depths.len() {
            return Err(QuakeError::InvalidOperation(format!(
                "coordinate arrays differ in length: {} lons, {} lats, {} depths",
                lons.len(),
                lats.len(),
                depths.len()
            )));
        }
        let mut batch = Self::with_capacity(lons.len());
        for ((&lon, &lat), &depth) in lons.iter().zip(lats).zip(depths) {
            batch.push(GeoPoint::new(lon, lat, depth));
        }
        Ok(batch)
    }

    /// Points from `(N, 3)` Cartesian coordinates in km.
    pub fn from_cartesian(xyz: &[Point3]) -> Self {
        let mut batch = Self::with_capacity(xyz.len());
        for &v in xyz {
            let p = GeoPoint::from_cartesian(v);
            batch.lons.push(p.lon);
            batch.lats.push(p.lat);
            batch.depths.push(p.depth);
            batch.xyz.push(v);
        }
        batch
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            lons: Vec::with_capacity(n),
            lats: Vec::with_capacity(n),
            depths: Vec::with_capacity(n),
            xyz: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, p: GeoPoint) {
        self.lons.push(p.lon);
        self.lats.push(p.lat);
        self.depths.push(p.depth);
        self.xyz.push(p.to_cartesian());
    }

    pub fn clear(&mut self) {
        self.lons.clear();
        self.lats.clear();
        self.depths.clear();
        self.xyz.clear();
    }

    pub fn len(&self) -> usize {
        self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lons.is_empty()
    }

    pub fn get(&self, i: usize) -> GeoPoint {
        GeoPoint::new(self.lons[i], self.lats[i], self.depths[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    pub fn xyz(&self) -> &[Point3] {
        &self.xyz
    }
}

use quake_math::{GeoPoint, PlaneBasis, Point3, Vector3};

use super::SurfaceRow;
use crate::surface::PlanarSurface;

/// Columnar store of the per-surface data the distance kernels read.
///
/// A batch can be cleared and refilled between calls, keeping its
/// allocations.
#[derive(Debug, Clone, Default)]
pub struct SurfaceBatch {
    strike: Vec<f64>,
    lons: Vec<[f64; 4]>,
    lats: Vec<[f64; 4]>,
    origin: Vec<Point3>,
    normal: Vec<Vector3>,
    uv1: Vec<Vector3>,
    uv2: Vec<Vector3>,
    width: Vec<f64>,
    length: Vec<f64>,
    hypocentre: Vec<Option<GeoPoint>>,
}

impl SurfaceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            strike: Vec::with_capacity(n),
            lons: Vec::with_capacity(n),
            lats: Vec::with_capacity(n),
            origin: Vec::with_capacity(n),
            normal: Vec::with_capacity(n),
            uv1: Vec::with_capacity(n),
            uv2: Vec::with_capacity(n),
            width: Vec::with_capacity(n),
            length: Vec::with_capacity(n),
            hypocentre: Vec::with_capacity(n),
        }
    }

    pub fn from_surfaces<'a>(surfaces: impl IntoIterator<Item = &'a PlanarSurface>) -> Self {
        let mut batch = Self::new();
        batch.extend(surfaces);
        batch
    }

    pub fn push(&mut self, surface: &PlanarSurface) {
        let row = surface.row();
        self.strike.push(row.strike);
        self.lons.push(row.lons);
        self.lats.push(row.lats);
        self.origin.push(row.basis.origin);
        self.normal.push(row.basis.normal);
        self.uv1.push(row.basis.uv1);
        self.uv2.push(row.basis.uv2);
        self.width.push(row.basis.width);
        self.length.push(row.basis.length);
        self.hypocentre.push(row.hypocentre);
    }

    pub fn extend<'a>(&mut self, surfaces: impl IntoIterator<Item = &'a PlanarSurface>) {
        for s in surfaces {
            self.push(s);
        }
    }

    pub fn clear(&mut self) {
        self.strike.clear();
        self.lons.clear();
        self.lats.clear();
        self.origin.clear();
        self.normal.clear();
        self.uv1.clear();
        self.uv2.clear();
        self.width.clear();
        self.length.clear();
        self.hypocentre.clear();
    }

    pub fn len(&self) -> usize {
        self.strike.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strike.is_empty()
    }

    /// Index of the first surface without a hypocentre, if any.
    pub fn first_missing_hypocentre(&self) -> Option<usize> {
        self.hypocentre.iter().position(Option::is_none)
    }

    pub fn row(&self, u: usize) -> SurfaceRow {
        SurfaceRow {
            strike: self.strike[u],
            lons: self.lons[u],
            lats: self.lats[u],
            basis: PlaneBasis {
                origin: self.origin[u],
                normal: self.normal[u],
                uv1: self.uv1[u],
                uv2: self.uv2[u],
                width: self.width[u],
                length: self.length[u],
            },
            hypocentre: self.hypocentre[u],
        }
    }
}

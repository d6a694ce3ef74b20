//! Planar rectangular rupture surface.

use quake_core::traits::{BoundingBox, Validate};
use quake_core::{CheckPolicy, QuakeError, Result, Tolerance};
use quake_math::geodetic::{azimuth, geodetic_distance, middle_point};
use quake_math::{GeoPoint, PlaneBasis, Point3, SphericalBoundingBox};
use serde::{Deserialize, Serialize};

use super::RuptureSurface;
use crate::distance::{kernels, DistanceMetric, PointBatch, SurfaceRow};
use crate::nodal_plane::NodalPlane;

/// A rectangular, possibly dipping, rupture plane.
///
/// Corners are stored top-left, top-right, bottom-left, bottom-right, where
/// "left" and "right" are seen looking along strike. Their Cartesian
/// positions and the plane frame are computed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SurfaceRecord", into = "SurfaceRecord")]
pub struct PlanarSurface {
    strike: f64,
    dip: f64,
    corners: [GeoPoint; 4],
    xyz: [Point3; 4],
    basis: PlaneBasis,
    hypocentre: Option<GeoPoint>,
    tolerance: Tolerance,
}

/// Persisted form: only the defining values, the frame is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct SurfaceRecord {
    strike: f64,
    dip: f64,
    corners: [GeoPoint; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hypocentre: Option<GeoPoint>,
}

impl From<SurfaceRecord> for PlanarSurface {
    fn from(record: SurfaceRecord) -> Self {
        let surface = PlanarSurface::new_unchecked(record.strike, record.dip, record.corners);
        match record.hypocentre {
            Some(h) => surface.with_hypocentre(h),
            None => surface,
        }
    }
}

impl From<PlanarSurface> for SurfaceRecord {
    fn from(surface: PlanarSurface) -> Self {
        Self {
            strike: surface.strike,
            dip: surface.dip,
            corners: surface.corners,
            hypocentre: surface.hypocentre,
        }
    }
}

impl PlanarSurface {
    /// Build a surface from its corners, validating the edges, the strike
    /// and dip ranges and the rectangle itself.
    pub fn new(
        strike: f64,
        dip: f64,
        top_left: GeoPoint,
        top_right: GeoPoint,
        bottom_right: GeoPoint,
        bottom_left: GeoPoint,
    ) -> Result<Self> {
        Self::with_tolerance(
            strike,
            dip,
            [top_left, top_right, bottom_left, bottom_right],
            Tolerance::default(),
        )
    }

    /// Checked construction from corners ordered tl, tr, bl, br.
    pub fn with_tolerance(
        strike: f64,
        dip: f64,
        corners: [GeoPoint; 4],
        tolerance: Tolerance,
    ) -> Result<Self> {
        check_edges_level(&corners, tolerance)?;
        NodalPlane::check_dip(dip)?;
        NodalPlane::check_strike(strike)?;
        let xyz = corners.map(GeoPoint::to_cartesian);
        let basis = PlaneBasis::from_corners_checked(&xyz, tolerance)?;
        Ok(Self {
            strike,
            dip,
            corners,
            xyz,
            basis,
            hypocentre: None,
            tolerance,
        })
    }

    /// Checked or unchecked construction depending on `policy`.
    pub fn with_policy(
        strike: f64,
        dip: f64,
        corners: [GeoPoint; 4],
        policy: CheckPolicy,
        tolerance: Tolerance,
    ) -> Result<Self> {
        if policy.enabled() {
            Self::with_tolerance(strike, dip, corners, tolerance)
        } else {
            Ok(Self {
                tolerance,
                ..Self::new_unchecked(strike, dip, corners)
            })
        }
    }

    /// Accept corners (tl, tr, bl, br) as given. Meant for geometry that was
    /// validated before, e.g. when it is loaded back from storage.
    pub fn new_unchecked(strike: f64, dip: f64, corners: [GeoPoint; 4]) -> Self {
        let xyz = corners.map(GeoPoint::to_cartesian);
        Self {
            strike,
            dip,
            corners,
            xyz,
            basis: PlaneBasis::from_corners(&xyz),
            hypocentre: None,
            tolerance: Tolerance::default(),
        }
    }

    /// Build a checked surface whose strike and dip are derived from the
    /// corners: strike is the azimuth of the top edge, dip the angle between
    /// the left edge and the horizontal.
    pub fn from_corner_points(
        top_left: GeoPoint,
        top_right: GeoPoint,
        bottom_right: GeoPoint,
        bottom_left: GeoPoint,
    ) -> Result<Self> {
        let (strike, dip) = strike_and_dip(top_left, top_right, bottom_left);
        Self::new(strike, dip, top_left, top_right, bottom_right, bottom_left)
    }

    /// Unchecked surface from `[lon, lat, depth]` rows ordered tl, tr, bl, br.
    pub fn from_array(corners: [[f64; 3]; 4]) -> Self {
        let corners = corners.map(|[lon, lat, depth]| GeoPoint::new(lon, lat, depth));
        let (strike, dip) = strike_and_dip(corners[0], corners[1], corners[2]);
        Self::new_unchecked(strike, dip, corners)
    }

    pub fn with_hypocentre(mut self, hypocentre: GeoPoint) -> Self {
        self.hypocentre = Some(hypocentre);
        self
    }

    /// Corner `[lon, lat, depth]` rows ordered tl, tr, bl, br.
    pub fn to_array(&self) -> [[f64; 3]; 4] {
        self.corners.map(|p| [p.lon, p.lat, p.depth])
    }

    /// Move the surface by the displacement from `p1` to `p2`.
    ///
    /// Every corner travels the great-circle distance between the two points
    /// along their azimuth. Depths, strike, dip, width and length are kept.
    pub fn translate(&self, p1: GeoPoint, p2: GeoPoint) -> Self {
        let az = azimuth(p1.lon, p1.lat, p2.lon, p2.lat);
        let dist = geodetic_distance(p1.lon, p1.lat, p2.lon, p2.lat);
        let corners = self.corners.map(|c| c.point_at(dist, 0.0, az));
        let xyz = corners.map(GeoPoint::to_cartesian);
        let mut basis = PlaneBasis::from_corners(&xyz);
        basis.width = self.basis.width;
        basis.length = self.basis.length;
        Self {
            strike: self.strike,
            dip: self.dip,
            corners,
            xyz,
            basis,
            hypocentre: self.hypocentre.map(|h| h.point_at(dist, 0.0, az)),
            tolerance: self.tolerance,
        }
    }

    pub fn corners(&self) -> &[GeoPoint; 4] {
        &self.corners
    }

    pub fn top_left(&self) -> GeoPoint {
        self.corners[0]
    }

    pub fn top_right(&self) -> GeoPoint {
        self.corners[1]
    }

    pub fn bottom_left(&self) -> GeoPoint {
        self.corners[2]
    }

    pub fn bottom_right(&self) -> GeoPoint {
        self.corners[3]
    }

    /// Cartesian corner positions in km, ordered tl, tr, bl, br.
    pub fn xyz(&self) -> &[Point3; 4] {
        &self.xyz
    }

    pub fn basis(&self) -> &PlaneBasis {
        &self.basis
    }

    /// Along-strike extent in km.
    pub fn length(&self) -> f64 {
        self.basis.length
    }

    pub fn hypocentre(&self) -> Option<GeoPoint> {
        self.hypocentre
    }

    /// Tolerance the surface was checked against, reused by `validate`.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// The corners as a closed ring tl, tr, br, bl, tl.
    pub fn surface_boundaries(&self) -> (Vec<f64>, Vec<f64>) {
        [0, 1, 3, 2, 0]
            .iter()
            .map(|&i| (self.corners[i].lon, self.corners[i].lat))
            .unzip()
    }

    /// For each target, the nearest point of the finite rectangle.
    pub fn closest_points(&self, points: &PointBatch) -> Vec<GeoPoint> {
        let length = self.basis.length.max(0.0);
        let width = self.basis.width.max(0.0);
        points
            .xyz()
            .iter()
            .map(|&p| {
                let (_, x, y) = self.basis.project(p);
                let xyz = self
                    .basis
                    .project_back(0.0, x.max(0.0).min(length), y.max(0.0).min(width));
                GeoPoint::from_cartesian(xyz)
            })
            .collect()
    }

    /// Evaluate any metric for this surface alone.
    pub fn distances(&self, metric: DistanceMetric, points: &PointBatch) -> Result<Vec<f64>> {
        if metric.needs_hypocentre() && self.hypocentre.is_none() {
            return Err(QuakeError::InvalidOperation(format!(
                "{metric} needs a hypocentre, the surface has none"
            )));
        }
        Ok(self.evaluate(metric, points))
    }

    /// Hypocentral distance: straight line to the hypocentre.
    pub fn rhypo_distance(&self, points: &PointBatch) -> Result<Vec<f64>> {
        self.distances(DistanceMetric::Rhypo, points)
    }

    /// Epicentral distance: great-circle distance to the epicentre.
    pub fn repi_distance(&self, points: &PointBatch) -> Result<Vec<f64>> {
        self.distances(DistanceMetric::Repi, points)
    }

    /// Azimuth from the hypocentre to each point, relative to strike, in `[0, 360)`.
    pub fn azimuth(&self, points: &PointBatch) -> Result<Vec<f64>> {
        self.distances(DistanceMetric::Azimuth, points)
    }

    pub(crate) fn row(&self) -> SurfaceRow {
        SurfaceRow {
            strike: self.strike,
            lons: self.corners.map(|p| p.lon),
            lats: self.corners.map(|p| p.lat),
            basis: self.basis,
            hypocentre: self.hypocentre,
        }
    }

    fn evaluate(&self, metric: DistanceMetric, points: &PointBatch) -> Vec<f64> {
        let mut out = vec![0.0; points.len()];
        kernels::evaluate(metric, &self.row(), points, &mut out);
        out
    }
}

impl RuptureSurface for PlanarSurface {
    fn strike(&self) -> f64 {
        self.strike
    }

    fn dip(&self) -> f64 {
        self.dip
    }

    fn width(&self) -> f64 {
        self.basis.width
    }

    fn area(&self) -> f64 {
        self.basis.width * self.basis.length
    }

    fn top_edge_depth(&self) -> f64 {
        self.corners[0].depth
    }

    fn min_distance(&self, points: &PointBatch) -> Vec<f64> {
        self.evaluate(DistanceMetric::Min, points)
    }

    fn joyner_boore_distance(&self, points: &PointBatch) -> Vec<f64> {
        self.evaluate(DistanceMetric::Rjb, points)
    }

    fn rx_distance(&self, points: &PointBatch) -> Vec<f64> {
        self.evaluate(DistanceMetric::Rx, points)
    }

    fn ry0_distance(&self, points: &PointBatch) -> Vec<f64> {
        self.evaluate(DistanceMetric::Ry0, points)
    }

    /// Great-circle midpoint of the top-left/bottom-right diagonal.
    fn middle_point(&self) -> GeoPoint {
        let [tl, _, _, br] = self.corners;
        let (lon, lat) = middle_point(tl.lon, tl.lat, br.lon, br.lat);
        GeoPoint::new(lon, lat, (tl.depth + br.depth) / 2.0)
    }

    fn top_edge_centroid(&self) -> GeoPoint {
        let [tl, tr, _, _] = self.corners;
        let (lon, lat) = middle_point(tl.lon, tl.lat, tr.lon, tr.lat);
        GeoPoint::new(lon, lat, tl.depth)
    }
}

impl BoundingBox for PlanarSurface {
    type Bounds = SphericalBoundingBox;

    fn bounding_box(&self) -> Result<SphericalBoundingBox> {
        let (mut lons, mut lats) = self.surface_boundaries();
        lons.pop();
        lats.pop();
        SphericalBoundingBox::from_polygon(&lons, &lats)
    }
}

impl Validate for PlanarSurface {
    fn validate(&self) -> Result<()> {
        let tolerance = self.tolerance;
        check_edges_level(&self.corners, tolerance)?;
        NodalPlane::check_dip(self.dip)?;
        NodalPlane::check_strike(self.strike)?;
        let (basis, projection) = PlaneBasis::measure(&self.xyz);
        basis.check(&projection, tolerance)
    }
}

/// Top and bottom edges must each lie at a single depth.
fn check_edges_level(corners: &[GeoPoint; 4], tolerance: Tolerance) -> Result<()> {
    let [tl, tr, bl, br] = corners;
    if tolerance.linear_eq(tl.depth, tr.depth) && tolerance.linear_eq(bl.depth, br.depth) {
        Ok(())
    } else {
        Err(QuakeError::Geometry(
            "top and bottom edges must be parallel to the earth surface".into(),
        ))
    }
}

fn strike_and_dip(top_left: GeoPoint, top_right: GeoPoint, bottom_left: GeoPoint) -> (f64, f64) {
    let strike = top_left.azimuth(top_right);
    let dist = top_left.distance(bottom_left);
    let dip = if dist > 0.0 {
        ((bottom_left.depth - top_left.depth) / dist)
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
    } else {
        90.0
    };
    (strike, dip)
}

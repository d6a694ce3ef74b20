//! Per-surface distance kernels. Each fills one output row, one value per
//! target point.

use quake_math::geodetic::{
    azimuth, distance_to_arc, geodetic_distance, min_geodetic_distance, normalize_azimuth,
};
use quake_math::{GeoPoint, PlaneBasis};

use super::{DistanceMetric, PointBatch};

/// Everything a kernel reads from one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRow {
    pub strike: f64,
    /// Corner longitudes, ordered top-left, top-right, bottom-left, bottom-right.
    pub lons: [f64; 4],
    pub lats: [f64; 4],
    pub basis: PlaneBasis,
    pub hypocentre: Option<GeoPoint>,
}

pub(crate) fn evaluate(metric: DistanceMetric, row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    debug_assert_eq!(points.len(), out.len());
    match metric {
        DistanceMetric::Min => min_distance(row, points, out),
        DistanceMetric::Rjb => joyner_boore(row, points, out),
        DistanceMetric::Rx => rx(row, points, out),
        DistanceMetric::Ry0 => ry0(row, points, out),
        DistanceMetric::Rhypo => rhypo(row, points, out),
        DistanceMetric::Repi => repi(row, points, out),
        DistanceMetric::Azimuth => source_azimuth(row, points, out),
    }
}

/// Excess of `v` beyond `[0, max]`, negative below the range.
#[inline]
fn outside(v: f64, max: f64) -> f64 {
    if v < 0.0 {
        v
    } else if v > max {
        v - max
    } else {
        0.0
    }
}

/// Sign as -1, 0 or 1; exact zeros (and NaN) map to 0.
#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn min_distance(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    let basis = &row.basis;
    for (o, &p) in out.iter_mut().zip(points.xyz()) {
        let (dist, x, y) = basis.project(p);
        let mx = outside(x, basis.length);
        let my = outside(y, basis.width);
        *o = (dist * dist + mx * mx + my * my).sqrt();
    }
}

/// Azimuth of the edge between two corners, or `nominal` when the corners
/// coincide in plan view (vertical ruptures).
fn edge_azimuth(row: &SurfaceRow, from: usize, to: usize, nominal: f64) -> f64 {
    let (lon1, lat1) = (row.lons[from], row.lats[from]);
    let (lon2, lat2) = (row.lons[to], row.lats[to]);
    if geodetic_distance(lon1, lat1, lon2, lat2) < COINCIDENT_KM {
        nominal
    } else {
        azimuth(lon1, lat1, lon2, lat2)
    }
}

/// Horizontal separation (km) below which two corners count as one point.
const COINCIDENT_KM: f64 = 1e-6;

/// Where a site falls relative to the four edge arcs of a rupture footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RjbRegion {
    /// Outside both pairs of arcs: nearest footprint point is a corner.
    Corner,
    /// Off the top or bottom edge, between the two end arcs.
    BesideEdge,
    /// Off one end, between the top and bottom edge arcs.
    BeyondEnd,
    Inside,
}

impl RjbRegion {
    /// Classify from signed distances to the top, bottom, left-end and
    /// right-end arcs, in that order.
    fn from_arc_distances(d: &[f64; 4]) -> Self {
        match (sign(d[0]) == sign(d[1]), sign(d[2]) == sign(d[3])) {
            (true, true) => RjbRegion::Corner,
            (true, false) => RjbRegion::BesideEdge,
            (false, true) => RjbRegion::BeyondEnd,
            (false, false) => RjbRegion::Inside,
        }
    }
}

/// Arcs along the footprint edges as (lon, lat, azimuth): top and bottom
/// along strike, then both ends along dip. Each passes through the two
/// corners of its edge.
fn footprint_arcs(row: &SurfaceRow) -> [(f64, f64, f64); 4] {
    let downdip = normalize_azimuth(row.strike + 90.0);
    [
        (row.lons[0], row.lats[0], edge_azimuth(row, 0, 1, row.strike)),
        (row.lons[2], row.lats[2], edge_azimuth(row, 2, 3, row.strike)),
        (row.lons[0], row.lats[0], edge_azimuth(row, 0, 2, downdip)),
        (row.lons[1], row.lats[1], edge_azimuth(row, 1, 3, downdip)),
    ]
}

fn arc_distances(arcs: &[(f64, f64, f64); 4], lon: f64, lat: f64) -> [f64; 4] {
    arcs.map(|(alon, alat, az)| distance_to_arc(alon, alat, az, lon, lat))
}

pub(crate) fn rjb_region(row: &SurfaceRow, lon: f64, lat: f64) -> RjbRegion {
    RjbRegion::from_arc_distances(&arc_distances(&footprint_arcs(row), lon, lat))
}

fn joyner_boore(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    let arcs = footprint_arcs(row);
    for ((o, &lon), &lat) in out.iter_mut().zip(points.lons()).zip(points.lats()) {
        let d = arc_distances(&arcs, lon, lat);
        *o = match RjbRegion::from_arc_distances(&d) {
            RjbRegion::Corner => min_geodetic_distance(&row.lons, &row.lats, lon, lat),
            RjbRegion::BesideEdge => d[0].abs().min(d[1].abs()),
            RjbRegion::BeyondEnd => d[2].abs().min(d[3].abs()),
            RjbRegion::Inside => 0.0,
        };
    }
}

fn rx(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    for ((o, &lon), &lat) in out.iter_mut().zip(points.lons()).zip(points.lats()) {
        *o = distance_to_arc(row.lons[0], row.lats[0], row.strike, lon, lat);
    }
}

fn ry0(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    let downdip = normalize_azimuth(row.strike + 90.0);
    for ((o, &lon), &lat) in out.iter_mut().zip(points.lons()).zip(points.lats()) {
        let d1 = distance_to_arc(row.lons[0], row.lats[0], downdip, lon, lat);
        let d2 = distance_to_arc(row.lons[1], row.lats[1], downdip, lon, lat);
        *o = if sign(d1) == sign(d2) {
            d1.abs().min(d2.abs())
        } else {
            0.0
        };
    }
}

fn rhypo(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    let Some(h) = row.hypocentre else {
        out.fill(f64::NAN);
        return;
    };
    for (o, p) in out.iter_mut().zip(points.iter()) {
        *o = h.distance(p);
    }
}

fn repi(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    let Some(h) = row.hypocentre else {
        out.fill(f64::NAN);
        return;
    };
    for ((o, &lon), &lat) in out.iter_mut().zip(points.lons()).zip(points.lats()) {
        *o = geodetic_distance(h.lon, h.lat, lon, lat);
    }
}

fn source_azimuth(row: &SurfaceRow, points: &PointBatch, out: &mut [f64]) {
    let Some(h) = row.hypocentre else {
        out.fill(f64::NAN);
        return;
    };
    for ((o, &lon), &lat) in out.iter_mut().zip(points.lons()).zip(points.lats()) {
        *o = normalize_azimuth(azimuth(h.lon, h.lat, lon, lat) - row.strike);
    }
}

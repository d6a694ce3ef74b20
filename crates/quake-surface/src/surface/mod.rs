//! Rupture surface trait and the planar implementation.

mod planar;

use quake_math::GeoPoint;

use crate::distance::PointBatch;

pub use planar::PlanarSurface;

/// A finite rupture surface that can report its geometry and its distance
/// to target points.
pub trait RuptureSurface: Send + Sync {
    /// Azimuth of the top edge in degrees.
    fn strike(&self) -> f64;

    /// Dip angle in degrees, measured from the horizontal.
    fn dip(&self) -> f64;

    /// Down-dip extent in km.
    fn width(&self) -> f64;

    fn area(&self) -> f64;

    /// Depth of the shallowest point in km.
    fn top_edge_depth(&self) -> f64;

    /// Closest distance from each point to the surface (Rrup).
    fn min_distance(&self, points: &PointBatch) -> Vec<f64>;

    /// Distance from each point to the surface projection on the ground.
    fn joyner_boore_distance(&self, points: &PointBatch) -> Vec<f64>;

    fn rx_distance(&self, points: &PointBatch) -> Vec<f64>;

    fn ry0_distance(&self, points: &PointBatch) -> Vec<f64>;

    fn middle_point(&self) -> GeoPoint;

    fn top_edge_centroid(&self) -> GeoPoint;
}

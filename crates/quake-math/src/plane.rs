use quake_core::{QuakeError, Result, Tolerance};
use serde::{Deserialize, Serialize};

use crate::{Point3, Vector3};

/// Local frame of a rectangle given by its four corners.
///
/// The origin is the top-left corner, `uv1` points along the top edge towards
/// the top-right corner and `uv2 = normal x uv1` points down-dip. `length`
/// and `width` are the mean extents along `uv1` and `uv2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneBasis {
    pub origin: Point3,
    pub normal: Vector3,
    pub uv1: Vector3,
    pub uv2: Vector3,
    pub width: f64,
    pub length: f64,
}

/// Corners expressed in a [`PlaneBasis`]: off-plane distance and in-plane
/// coordinates, in the order top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerProjection {
    pub dists: [f64; 4],
    pub xx: [f64; 4],
    pub yy: [f64; 4],
}

impl CornerProjection {
    /// Lengths of the top and bottom edges along `uv1`.
    pub fn lengths(&self) -> (f64, f64) {
        (self.xx[1] - self.xx[0], self.xx[3] - self.xx[2])
    }

    /// Lengths of the left and right edges along `uv2`.
    pub fn widths(&self) -> (f64, f64) {
        (self.yy[2] - self.yy[0], self.yy[3] - self.yy[1])
    }
}

impl PlaneBasis {
    /// Build the frame from corners ordered top-left, top-right, bottom-left,
    /// bottom-right. Slightly non-planar input is accepted as is.
    pub fn from_corners(corners: &[Point3; 4]) -> Self {
        Self::measure(corners).0
    }

    /// Like [`Self::from_corners`], then verify the corners form a rectangle
    /// within `tolerance`.
    pub fn from_corners_checked(corners: &[Point3; 4], tolerance: Tolerance) -> Result<Self> {
        let (basis, projection) = Self::measure(corners);
        basis.check(&projection, tolerance)?;
        Ok(basis)
    }

    /// Build the frame and return it together with the corners' projection.
    pub fn measure(corners: &[Point3; 4]) -> (Self, CornerProjection) {
        let [tl, tr, bl, _] = *corners;
        let normal = (tl - tr).cross(tl - bl).normalize_or_zero();
        let uv1 = (tr - tl).normalize_or_zero();
        let uv2 = normal.cross(uv1);
        let mut basis = Self {
            origin: tl,
            normal,
            uv1,
            uv2,
            width: 0.0,
            length: 0.0,
        };

        let mut projection = CornerProjection {
            dists: [0.0; 4],
            xx: [0.0; 4],
            yy: [0.0; 4],
        };
        for (i, &corner) in corners.iter().enumerate() {
            let (dist, x, y) = basis.project(corner);
            projection.dists[i] = dist;
            projection.xx[i] = x;
            projection.yy[i] = y;
        }
        let (length1, length2) = projection.lengths();
        let (width1, width2) = projection.widths();
        basis.length = (length1 + length2) / 2.0;
        basis.width = (width1 + width2) / 2.0;
        (basis, projection)
    }

    /// Verify a corner projection describes a rectangle: corners on the plane,
    /// bottom edge running the same way as the top one, and opposite edges of
    /// equal length.
    pub fn check(&self, projection: &CornerProjection, tolerance: Tolerance) -> Result<()> {
        let tol = tolerance.for_rectangle(self.width, self.length);
        let max_offset = projection
            .dists
            .iter()
            .map(|d| d.abs())
            .fold(0.0, f64::max);
        if max_offset > tol {
            return Err(QuakeError::Geometry(
                "corner points do not lie on the same plane".into(),
            ));
        }
        let (length1, length2) = projection.lengths();
        if length2 < 0.0 {
            return Err(QuakeError::Geometry("corners are in the wrong order".into()));
        }
        if (length1 - length2).abs() > tol {
            return Err(QuakeError::Geometry(
                "top and bottom edges have different lengths".into(),
            ));
        }
        let (width1, width2) = projection.widths();
        if (width1 - width2).abs() > tol {
            return Err(QuakeError::Geometry(
                "left and right edges have different widths".into(),
            ));
        }
        Ok(())
    }

    /// Signed distance from a point to the plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point: off-plane distance and `(x, y)` in the plane's frame.
    pub fn project(&self, point: Point3) -> (f64, f64, f64) {
        let delta = point - self.origin;
        (delta.dot(self.normal), delta.dot(self.uv1), delta.dot(self.uv2))
    }

    /// Inverse of [`Self::project`].
    pub fn project_back(&self, dist: f64, x: f64, y: f64) -> Point3 {
        self.origin + self.uv1 * x + self.uv2 * y + self.normal * dist
    }
}

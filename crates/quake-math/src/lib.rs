pub mod bbox;
pub mod geodetic;
pub mod plane;

pub use glam::{dvec3, DVec3};
pub use bbox::SphericalBoundingBox;
pub use geodetic::{GeoPoint, EARTH_RADIUS};
pub use plane::{CornerProjection, PlaneBasis};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;

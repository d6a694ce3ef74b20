//! Planar rupture surfaces, their construction from rupture parameters, and
//! batched site-to-rupture distance metrics.

pub mod builder;
pub mod distance;
pub mod nodal_plane;
pub mod scaling;
pub mod surface;

pub use builder::{
    build_surfaces, BuildStrategy, RuptureDimensions, RuptureParams, SeismogenicLayer,
    SurfaceBuilder,
};
pub use distance::{DistanceEngine, DistanceMatrix, DistanceMetric, PointBatch, SurfaceBatch};
pub use nodal_plane::NodalPlane;
pub use scaling::{MsrKind, ScalingRelation};
pub use surface::{PlanarSurface, RuptureSurface};

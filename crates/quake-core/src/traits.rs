use crate::error::Result;

/// Validate structural integrity of a geometric entity.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Compute a bounding box.
pub trait BoundingBox {
    type Bounds;
    fn bounding_box(&self) -> Result<Self::Bounds>;
}

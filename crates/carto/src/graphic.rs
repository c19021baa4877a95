use crate::{Extent, Shape};

/// A shape with its symbology.
///
/// The legend is opaque to the reprojection code, it is cloned unchanged when the shape is transformed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graphic<L> {
    pub shape: Shape,
    pub legend: L,
}

impl<L> Graphic<L> {
    pub fn new(shape: Shape, legend: L) -> Self {
        Graphic { shape, legend }
    }

    pub fn extent(&self) -> Option<Extent> {
        self.shape.extent()
    }

    /// The same legend with another shape
    pub fn with_shape(&self, shape: Shape) -> Self
    where
        L: Clone,
    {
        Graphic {
            shape,
            legend: self.legend.clone(),
        }
    }
}

#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod coordinatetransformer;
pub mod crs;
mod error;
mod extent;
pub mod geodetic;
mod geotransform;
mod graphic;
mod grid;
pub mod point;
mod projectioninfo;
pub mod projectionutil;
pub mod reproject;
pub mod shape;

#[cfg(test)]
mod testutils;

#[doc(inline)]
pub use coordinatetransformer::CoordinateTransformer;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use extent::Extent;
#[doc(inline)]
pub use geodetic::{Ellipsoid, GeodesicDirect, GeodesicInverse, GeodeticCalculator};
#[doc(inline)]
pub use geotransform::{AffineTransform, GeoTransform, ProjectionTransform};
#[doc(inline)]
pub use graphic::Graphic;
#[doc(inline)]
pub use grid::{GridCoordinates, GriddedData};
#[doc(inline)]
pub use projectioninfo::{ProjectionFamily, ProjectionInfo};
#[doc(inline)]
pub use reproject::{NumThreads, ReprojectOptions, ResampleMethod};
#[doc(inline)]
pub use shape::{PolygonPart, Shape, ShapeType, WindArrow};

pub type Point<T = f64> = geo_types::Point<T>;

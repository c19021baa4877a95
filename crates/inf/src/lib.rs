//! Numeric building blocks shared by the carto crates.

pub mod angle;
pub mod interpolate;

use crate::{ProjectionInfo, crs};

pub fn wgs84() -> ProjectionInfo {
    ProjectionInfo::wgs84()
}

pub fn mercator() -> ProjectionInfo {
    ProjectionInfo::mercator(0.0).expect("Invalid mercator projection")
}

pub fn lambert72() -> ProjectionInfo {
    ProjectionInfo::from_epsg(crs::epsg::BELGIAN_LAMBERT72).expect("Invalid Lambert 72 projection")
}

/// Smallest difference between two angles in degrees
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

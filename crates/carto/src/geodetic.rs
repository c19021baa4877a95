//! Geodesic computations on an ellipsoid of revolution.
//!
//! The direct and inverse problems are solved with the algorithms of Karney (2013)
//! which are accurate to a few nanometers for the WGS84 ellipsoid.

use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use inf::angle::normalize_azimuth;

use crate::{Error, Point, ProjectionInfo, Result};

/// Reference ellipsoid described by its semi-major axis and flattening
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    a: f64,
    /// Flattening
    f: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid::from_inverse_flattening(6378137.0, 298.257223563);
    pub const GRS80: Ellipsoid = Ellipsoid::from_inverse_flattening(6378137.0, 298.257222101);
    pub const WGS72: Ellipsoid = Ellipsoid::from_inverse_flattening(6378135.0, 298.26);
    pub const CLARKE1866: Ellipsoid = Ellipsoid::from_inverse_flattening(6378206.4, 294.9786982);
    pub const INTERNATIONAL1924: Ellipsoid = Ellipsoid::from_inverse_flattening(6378388.0, 297.0);
    pub const KRASSOVSKY: Ellipsoid = Ellipsoid::from_inverse_flattening(6378245.0, 298.3);
    pub const BESSEL1841: Ellipsoid = Ellipsoid::from_inverse_flattening(6377397.155, 299.1528128);
    pub const AIRY1830: Ellipsoid = Ellipsoid::from_inverse_flattening(6377563.396, 299.3249646);
    /// Authalic sphere with the mean earth radius
    pub const SPHERE: Ellipsoid = Ellipsoid { a: 6371008.8, f: 0.0 };

    const fn from_inverse_flattening(a: f64, rf: f64) -> Self {
        Ellipsoid { a, f: 1.0 / rf }
    }

    pub fn new(a: f64, f: f64) -> Result<Self> {
        if !a.is_finite() || a <= 0.0 {
            return Err(Error::InvalidArgument(format!("Invalid semi-major axis: {a}")));
        }

        if !f.is_finite() || f >= 1.0 {
            return Err(Error::InvalidArgument(format!("Invalid flattening: {f}")));
        }

        Ok(Ellipsoid { a, f })
    }

    pub fn from_semi_axes(a: f64, b: f64) -> Result<Self> {
        if !b.is_finite() || b <= 0.0 {
            return Err(Error::InvalidArgument(format!("Invalid semi-minor axis: {b}")));
        }

        Self::new(a, (a - b) / a)
    }

    /// Lookup by the proj4 ellipsoid name (e.g. `WGS84`, `GRS80`, `intl`, `bessel`)
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "wgs84" => Ellipsoid::WGS84,
            "grs80" => Ellipsoid::GRS80,
            "wgs72" => Ellipsoid::WGS72,
            "clrk66" | "clarke1866" => Ellipsoid::CLARKE1866,
            "intl" | "international1924" | "hayford" => Ellipsoid::INTERNATIONAL1924,
            "krass" | "krassovsky" => Ellipsoid::KRASSOVSKY,
            "bessel" | "bessel1841" => Ellipsoid::BESSEL1841,
            "airy" | "airy1830" => Ellipsoid::AIRY1830,
            "sphere" => Ellipsoid::SPHERE,
            _ => return None,
        })
    }

    /// The ellipsoid of a projection definition, defaults to WGS84 when the definition does not specify one
    pub fn from_projection(proj: &ProjectionInfo) -> Result<Self> {
        if let Some(radius) = proj.param_f64("R") {
            return Self::new(radius, 0.0);
        }

        if let Some(a) = proj.param_f64("a") {
            if let Some(b) = proj.param_f64("b") {
                return Self::from_semi_axes(a, b);
            }

            if let Some(rf) = proj.param_f64("rf") {
                return Self::new(a, if rf == 0.0 { 0.0 } else { 1.0 / rf });
            }

            return Self::new(a, proj.param_f64("f").unwrap_or(0.0));
        }

        if let Some(name) = proj.param("ellps") {
            return Self::from_name(name).ok_or_else(|| Error::InvalidArgument(format!("Unknown ellipsoid: {name}")));
        }

        Ok(match proj.param("datum").map(str::to_ascii_uppercase).as_deref() {
            Some("NAD83") => Ellipsoid::GRS80,
            Some("NAD27") => Ellipsoid::CLARKE1866,
            Some("POTSDAM") => Ellipsoid::BESSEL1841,
            Some("OSGB36") => Ellipsoid::AIRY1830,
            _ => Ellipsoid::WGS84,
        })
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    pub fn flattening(&self) -> f64 {
        self.f
    }

    pub fn inverse_flattening(&self) -> Option<f64> {
        (self.f != 0.0).then(|| 1.0 / self.f)
    }

    /// First eccentricity squared
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2.0 - self.f)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

/// Solution of the direct geodesic problem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicDirect {
    pub lon: f64,
    pub lat: f64,
    /// Forward azimuth at the destination in degrees
    pub azimuth: f64,
}

impl GeodesicDirect {
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

/// Solution of the inverse geodesic problem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicInverse {
    /// Azimuth at the first point towards the second point in degrees (-180, 180]
    pub azimuth: f64,
    /// Azimuth at the second point towards the first point in degrees (-180, 180]
    pub back_azimuth: f64,
    /// Geodesic distance in meters
    pub distance: f64,
}

/// Solves geodesic problems on an ellipsoid.
///
/// Azimuths are in degrees clockwise from north, distances in meters.
#[derive(Debug, Clone)]
pub struct GeodeticCalculator {
    ellipsoid: Ellipsoid,
    geodesic: Geodesic,
}

impl Default for GeodeticCalculator {
    fn default() -> Self {
        GeodeticCalculator::new(Ellipsoid::WGS84)
    }
}

fn check_latitude(lat: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidArgument(format!("Latitude out of range: {lat}")));
    }

    Ok(())
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidArgument(format!("{name} is not finite: {value}")));
    }

    Ok(())
}

impl GeodeticCalculator {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        GeodeticCalculator {
            ellipsoid,
            geodesic: Geodesic::new(ellipsoid.semi_major_axis(), ellipsoid.flattening()),
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Destination reached when travelling `distance` meters from (`lon`, `lat`) along `azimuth`
    pub fn forward(&self, lon: f64, lat: f64, azimuth: f64, distance: f64) -> Result<GeodesicDirect> {
        check_latitude(lat)?;
        check_finite("Longitude", lon)?;
        check_finite("Azimuth", azimuth)?;
        check_finite("Distance", distance)?;

        let (lat2, lon2, azi2): (f64, f64, f64) = self.geodesic.direct(lat, lon, azimuth, distance);
        Ok(GeodesicDirect {
            lon: lon2,
            lat: lat2,
            azimuth: normalize_azimuth(azi2),
        })
    }

    /// Shortest path between two points
    pub fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Result<GeodesicInverse> {
        check_latitude(lat1)?;
        check_latitude(lat2)?;
        check_finite("Longitude", lon1)?;
        check_finite("Longitude", lon2)?;

        let (s12, azi1, azi2, _a12): (f64, f64, f64, f64) = self.geodesic.inverse(lat1, lon1, lat2, lon2);
        Ok(GeodesicInverse {
            azimuth: normalize_azimuth(azi1),
            back_azimuth: normalize_azimuth(azi2 + 180.0),
            distance: s12,
        })
    }

    /// Geodesic distance in meters between two lon/lat points
    pub fn distance(&self, from: Point, to: Point) -> Result<f64> {
        Ok(self.inverse(from.x(), from.y(), to.x(), to.y())?.distance)
    }

    /// Forward azimuth at `from` towards `to`
    pub fn azimuth(&self, from: Point, to: Point) -> Result<f64> {
        Ok(self.inverse(from.x(), from.y(), to.x(), to.y())?.azimuth)
    }

    /// Sum of the geodesic lengths of the segments of a lon/lat polyline
    pub fn path_length(&self, points: &[Point]) -> Result<f64> {
        points
            .windows(2)
            .map(|segment| self.distance(segment[0], segment[1]))
            .sum()
    }

    /// Element-wise [`GeodeticCalculator::forward`] over equally sized inputs
    pub fn forward_batch(&self, lon: &[f64], lat: &[f64], azimuth: &[f64], distance: &[f64]) -> Result<Vec<GeodesicDirect>> {
        check_sizes(lon.len(), lat.len())?;
        check_sizes(lon.len(), azimuth.len())?;
        check_sizes(lon.len(), distance.len())?;

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            (0..lon.len())
                .into_par_iter()
                .map(|i| self.forward(lon[i], lat[i], azimuth[i], distance[i]))
                .collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            (0..lon.len())
                .map(|i| self.forward(lon[i], lat[i], azimuth[i], distance[i]))
                .collect()
        }
    }

    /// Element-wise [`GeodeticCalculator::inverse`] over equally sized inputs
    pub fn inverse_batch(&self, lon1: &[f64], lat1: &[f64], lon2: &[f64], lat2: &[f64]) -> Result<Vec<GeodesicInverse>> {
        check_sizes(lon1.len(), lat1.len())?;
        check_sizes(lon1.len(), lon2.len())?;
        check_sizes(lon1.len(), lat2.len())?;

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            (0..lon1.len())
                .into_par_iter()
                .map(|i| self.inverse(lon1[i], lat1[i], lon2[i], lat2[i]))
                .collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            (0..lon1.len())
                .map(|i| self.inverse(lon1[i], lat1[i], lon2[i], lat2[i]))
                .collect()
        }
    }
}

fn check_sizes(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::SizeMismatch {
            size1: (expected, 1),
            size2: (actual, 1),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn forward_along_equator() {
        let calc = GeodeticCalculator::default();
        let dest = calc.forward(0.0, 0.0, 90.0, 111319.49).unwrap();

        assert_abs_diff_eq!(dest.lon, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dest.lat, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dest.azimuth, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn inverse_along_meridian() {
        let calc = GeodeticCalculator::default();
        let result = calc.inverse(0.0, 0.0, 0.0, 1.0).unwrap();

        // Length of the first degree of latitude on WGS84
        assert_relative_eq!(result.distance, 110574.3885, max_relative = 1e-6);
        assert_abs_diff_eq!(result.azimuth, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.back_azimuth, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn forward_inverse_consistency() {
        let calc = GeodeticCalculator::default();
        let dest = calc.forward(4.35, 50.85, 37.5, 250_000.0).unwrap();
        let back = calc.inverse(4.35, 50.85, dest.lon, dest.lat).unwrap();

        assert_relative_eq!(back.distance, 250_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back.azimuth, 37.5, epsilon = 1e-8);
    }

    #[test]
    fn back_azimuth_points_towards_origin() {
        let calc = GeodeticCalculator::default();
        let result = calc.inverse(0.0, 0.0, 1.0, 0.0).unwrap();
        assert_abs_diff_eq!(result.azimuth, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.back_azimuth, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_latitude() {
        let calc = GeodeticCalculator::default();
        assert!(matches!(calc.forward(0.0, 91.0, 0.0, 10.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(calc.inverse(0.0, 0.0, 0.0, -90.5), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn batch_size_mismatch() {
        let calc = GeodeticCalculator::default();
        assert!(matches!(
            calc.forward_batch(&[0.0, 1.0], &[0.0], &[90.0, 90.0], &[10.0, 10.0]),
            Err(Error::SizeMismatch { .. })
        ));

        let result = calc.inverse_batch(&[0.0, 0.0], &[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert_eq!(result.len(), 2);
        assert_abs_diff_eq!(result[0].azimuth, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result[1].azimuth, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn path_length_sums_segments() {
        let calc = GeodeticCalculator::default();
        let path = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        let direct = calc.distance(path[0], path[2]).unwrap();

        assert_relative_eq!(calc.path_length(&path).unwrap(), direct, epsilon = 1e-6);
        assert_eq!(calc.path_length(&path[..1]).unwrap(), 0.0);
    }

    #[test]
    fn ellipsoid_validation() {
        assert!(Ellipsoid::new(0.0, 0.0).is_err());
        assert!(Ellipsoid::new(6378137.0, 1.0).is_err());
        assert!(Ellipsoid::new(f64::NAN, 0.0).is_err());
        assert_relative_eq!(Ellipsoid::WGS84.semi_minor_axis(), 6356752.314245, epsilon = 1e-6);

        let from_axes = Ellipsoid::from_semi_axes(6378137.0, 6356752.314245179).unwrap();
        assert_relative_eq!(from_axes.flattening(), Ellipsoid::WGS84.flattening(), epsilon = 1e-12);
    }

    #[test]
    fn ellipsoid_from_projection() {
        let intl = ProjectionInfo::from_proj4("+proj=longlat +ellps=intl +no_defs").unwrap();
        assert_eq!(Ellipsoid::from_projection(&intl).unwrap(), Ellipsoid::INTERNATIONAL1924);

        let sphere = ProjectionInfo::from_proj4("+proj=longlat +R=6371000").unwrap();
        let ellipsoid = Ellipsoid::from_projection(&sphere).unwrap();
        assert_eq!(ellipsoid.semi_major_axis(), 6371000.0);
        assert_eq!(ellipsoid.flattening(), 0.0);

        assert_eq!(Ellipsoid::from_projection(&ProjectionInfo::wgs84()).unwrap(), Ellipsoid::WGS84);
    }
}

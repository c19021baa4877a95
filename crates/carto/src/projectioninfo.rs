//! Coordinate reference system descriptors.

use std::hash::{Hash, Hasher};

use crate::crs::Epsg;
use crate::{Error, Result};

/// Tokens that do not influence the transformation and are ignored when comparing projections
const COSMETIC_PARAMETERS: [&str; 3] = ["no_defs", "type", "wktext"];

const WKT_ROOTS: [&str; 7] = ["GEOGCS[", "PROJCS[", "GEOCCS[", "VERT_CS[", "LOCAL_CS[", "COMPD_CS[", "FITTED_C["];
const WKT2_ROOTS: [&str; 9] = [
    "GEODCRS[",
    "GEOGCRS[",
    "PROJCRS[",
    "VERTCRS[",
    "ENGCRS[",
    "COMPOUNDCRS[",
    "BOUNDCRS[",
    "PARAMETRICCRS[",
    "TIMECRS[",
];

fn is_wkt_string(s: &str) -> bool {
    WKT_ROOTS.iter().any(|&root| s.starts_with(root)) || WKT2_ROOTS.iter().any(|&root| s.starts_with(root))
}

/// The projection method of a coordinate reference system, derived from the proj4 `+proj` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionFamily {
    LongLat,
    LambertConformalConic,
    AlbersEqualArea,
    LambertAzimuthalEqualArea,
    Mercator,
    TransverseMercator,
    Stereographic,
    ObliqueStereographic,
    Orthographic,
    Geostationary,
    Mollweide,
    Robinson,
    Sinusoidal,
    EquidistantCylindrical,
    Other,
}

impl ProjectionFamily {
    fn from_proj_name(name: &str) -> Self {
        match name {
            "longlat" | "latlong" | "lonlat" | "latlon" => ProjectionFamily::LongLat,
            "lcc" => ProjectionFamily::LambertConformalConic,
            "aea" => ProjectionFamily::AlbersEqualArea,
            "laea" => ProjectionFamily::LambertAzimuthalEqualArea,
            "merc" | "webmerc" => ProjectionFamily::Mercator,
            "tmerc" | "etmerc" | "utm" => ProjectionFamily::TransverseMercator,
            "stere" | "ups" => ProjectionFamily::Stereographic,
            "sterea" => ProjectionFamily::ObliqueStereographic,
            "ortho" => ProjectionFamily::Orthographic,
            "geos" => ProjectionFamily::Geostationary,
            "moll" => ProjectionFamily::Mollweide,
            "robin" => ProjectionFamily::Robinson,
            "sinu" => ProjectionFamily::Sinusoidal,
            "eqc" => ProjectionFamily::EquidistantCylindrical,
            _ => ProjectionFamily::Other,
        }
    }
}

/// Immutable description of a coordinate reference system.
///
/// The definition is stored as a canonical, sorted list of proj4 parameters so two descriptors
/// compare equal when their parameters are equal, regardless of token order or number formatting.
#[derive(Debug, Clone)]
pub struct ProjectionInfo {
    params: Vec<(String, Option<String>)>,
    family: ProjectionFamily,
    cutoff: Option<f64>,
}

impl ProjectionInfo {
    /// Geographic longitude/latitude on the WGS84 datum
    pub fn wgs84() -> Self {
        ProjectionInfo {
            params: vec![
                ("proj".to_string(), Some("longlat".to_string())),
                ("datum".to_string(), Some("WGS84".to_string())),
            ],
            family: ProjectionFamily::LongLat,
            cutoff: None,
        }
    }

    pub fn lambert_conformal_conic(central_meridian: f64, origin_latitude: f64, lat_1: f64, lat_2: f64) -> Result<Self> {
        Self::from_proj4(&format!(
            "+proj=lcc +lat_1={lat_1} +lat_2={lat_2} +lat_0={origin_latitude} +lon_0={central_meridian} +x_0=0 +y_0=0 +datum=WGS84 +units=m"
        ))
    }

    pub fn mercator(central_meridian: f64) -> Result<Self> {
        Self::from_proj4(&format!(
            "+proj=merc +lon_0={central_meridian} +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m"
        ))
    }

    pub fn north_polar_stereographic(central_meridian: f64) -> Result<Self> {
        Self::from_proj4(&format!(
            "+proj=stere +lat_0=90 +lon_0={central_meridian} +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m"
        ))
    }

    pub fn south_polar_stereographic(central_meridian: f64) -> Result<Self> {
        Self::from_proj4(&format!(
            "+proj=stere +lat_0=-90 +lon_0={central_meridian} +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m"
        ))
    }

    pub fn transverse_mercator(central_meridian: f64, origin_latitude: f64, scale_factor: f64) -> Result<Self> {
        Self::from_proj4(&format!(
            "+proj=tmerc +lat_0={origin_latitude} +lon_0={central_meridian} +k={scale_factor} +x_0=0 +y_0=0 +datum=WGS84 +units=m"
        ))
    }

    pub fn utm(zone: u8, south: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(Error::InvalidArgument(format!("Invalid UTM zone: {zone}")));
        }

        let hemisphere = if south { " +south" } else { "" };
        Self::from_proj4(&format!("+proj=utm +zone={zone}{hemisphere} +datum=WGS84 +units=m"))
    }

    pub fn from_epsg(epsg: Epsg) -> Result<Self> {
        let proj_str = epsg
            .proj4_definition()
            .ok_or_else(|| Error::InvalidProjection(format!("Failed to obtain a proj4 definition for {epsg}")))?;
        Self::from_proj4(&proj_str)
    }

    pub fn from_wkt(wkt: &str) -> Result<Self> {
        let proj_str = proj4wkt::wkt_to_projstring(wkt).map_err(|e| Error::InvalidProjection(format!("Failed to parse WKT string ({e})")))?;
        Self::from_proj4(&proj_str)
    }

    /// Accepts `EPSG:<code>`, WKT or proj4 definitions
    pub fn from_definition(def: &str) -> Result<Self> {
        let def = def.trim();
        if let Some(code) = def.strip_prefix("EPSG:").or_else(|| def.strip_prefix("epsg:")) {
            let code = code
                .parse::<u16>()
                .map_err(|_| Error::InvalidProjection(format!("Invalid EPSG code: {code}")))?;
            return Self::from_epsg(Epsg::from(code));
        }

        if def.eq_ignore_ascii_case("WGS84") {
            return Ok(Self::wgs84());
        }

        if is_wkt_string(def) {
            Self::from_wkt(def)
        } else {
            Self::from_proj4(def)
        }
    }

    pub fn from_proj4(projection: &str) -> Result<Self> {
        let info = Self::parse(projection)?;
        proj4rs::Proj::from_proj_string(&info.definition())
            .map_err(|e| Error::InvalidProjection(format!("{projection} ({e:?})")))?;
        Ok(info)
    }

    fn parse(projection: &str) -> Result<Self> {
        if projection.trim().is_empty() {
            return Err(Error::InvalidProjection("Empty projection string".into()));
        }

        let mut params = Vec::new();
        for token in projection.split_whitespace() {
            let Some(token) = token.strip_prefix('+') else {
                return Err(Error::InvalidProjection(format!("Unexpected token '{token}' in '{projection}'")));
            };

            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(canonical_value(value))),
                None => (token, None),
            };

            if key.is_empty() {
                return Err(Error::InvalidProjection(format!("Empty parameter name in '{projection}'")));
            }

            if COSMETIC_PARAMETERS.contains(&key) {
                continue;
            }

            params.retain(|(k, _): &(String, Option<String>)| k != key);
            params.push((key.to_string(), value));
        }

        let proj_name = params
            .iter()
            .find(|(key, _)| key == "proj")
            .and_then(|(_, val)| val.clone())
            .ok_or_else(|| Error::InvalidProjection(format!("Missing +proj parameter in '{projection}'")))?;

        params.sort_by(|(k1, _), (k2, _)| parameter_order(k1).cmp(&parameter_order(k2)).then_with(|| k1.cmp(k2)));

        Ok(ProjectionInfo {
            family: ProjectionFamily::from_proj_name(&proj_name),
            params,
            cutoff: None,
        })
    }

    /// The canonical proj4 definition
    pub fn definition(&self) -> String {
        self.params
            .iter()
            .map(|(key, val)| match val {
                Some(val) => format!("+{key}={val}"),
                None => format!("+{key}"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn family(&self) -> ProjectionFamily {
        self.family
    }

    pub fn is_geographic(&self) -> bool {
        self.family == ProjectionFamily::LongLat
    }

    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    /// Raw value of a proj4 parameter, `Some("")` for flags without a value
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, val)| val.as_deref().unwrap_or_default())
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.param(key).is_some()
    }

    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.param(key).and_then(|val| val.parse::<f64>().ok())
    }

    pub fn central_meridian(&self) -> f64 {
        if self.param("proj") == Some("utm") {
            if let Some(zone) = self.param_f64("zone") {
                return zone * 6.0 - 183.0;
            }
        }

        self.param_f64("lon_0").unwrap_or(0.0)
    }

    pub fn origin_latitude(&self) -> f64 {
        if self.param("proj") == Some("ups") {
            return if self.has_flag("south") { -90.0 } else { 90.0 };
        }

        self.param_f64("lat_0").unwrap_or(0.0)
    }

    pub fn standard_parallels(&self) -> (Option<f64>, Option<f64>) {
        (self.param_f64("lat_1"), self.param_f64("lat_2"))
    }

    pub fn is_north_polar(&self) -> bool {
        self.family == ProjectionFamily::Stereographic && self.origin_latitude() == 90.0
    }

    pub fn is_south_polar(&self) -> bool {
        self.family == ProjectionFamily::Stereographic && self.origin_latitude() == -90.0
    }

    /// Latitude that limits the valid display domain of the projection, see [`ProjectionInfo::with_cutoff`]
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Limits the latitudes considered when computing the global extent of the projection.
    ///
    /// For polar and conic projections the cutoff is the latitude furthest away from the pole
    /// of the projection that is still considered part of the map.
    pub fn with_cutoff(mut self, latitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidArgument(format!("Invalid cutoff latitude: {latitude}")));
        }

        self.cutoff = Some(latitude);
        Ok(self)
    }

    pub(crate) fn create_proj(&self) -> Result<proj4rs::Proj> {
        Ok(proj4rs::Proj::from_proj_string(&self.definition())?)
    }
}

/// Numbers are stored in their shortest representation so `0.0` and `0` compare equal
fn canonical_value(value: &str) -> String {
    match value.parse::<f64>() {
        Ok(num) if num.is_finite() => {
            if num == 0.0 {
                "0".to_string()
            } else {
                num.to_string()
            }
        }
        _ => value.to_string(),
    }
}

fn parameter_order(key: &str) -> u8 {
    match key {
        "proj" => 0,
        _ => 1,
    }
}

impl PartialEq for ProjectionInfo {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.cutoff.map(f64::to_bits) == other.cutoff.map(f64::to_bits)
    }
}

impl Eq for ProjectionInfo {}

impl Hash for ProjectionInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.params.hash(state);
        self.cutoff.map(f64::to_bits).hash(state);
    }
}

impl std::fmt::Display for ProjectionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition())
    }
}

impl std::str::FromStr for ProjectionInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_definition(s)
    }
}

//! EPSG code handling

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsg(u16);

impl Epsg {
    pub const fn new(code: u16) -> Self {
        Epsg(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// The proj4 definition of this code, if it is known
    pub fn proj4_definition(&self) -> Option<String> {
        crs_definitions::from_code(self.0).map(|def| def.proj4.to_string())
    }

    /// The WKT definition of this code, if it is known
    pub fn wkt_definition(&self) -> Option<String> {
        crs_definitions::from_code(self.0).map(|def| def.wkt.to_string())
    }
}

impl From<u16> for Epsg {
    fn from(code: u16) -> Self {
        Epsg(code)
    }
}

impl From<Epsg> for u16 {
    fn from(epsg: Epsg) -> Self {
        epsg.0
    }
}

impl std::fmt::Display for Epsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

pub mod epsg {
    use super::Epsg;

    pub const WGS84: Epsg = Epsg(4326);
    pub const WGS84_WEB_MERCATOR: Epsg = Epsg(3857);
    pub const BELGIAN_LAMBERT72: Epsg = Epsg(31370);
    pub const BELGE72_GEO: Epsg = Epsg(4313);
    pub const ETRS89: Epsg = Epsg(4258);
    pub const ETRS89_LAEA: Epsg = Epsg(3035);
    pub const ETRS89_LCC: Epsg = Epsg(3034);
    pub const UPS_NORTH: Epsg = Epsg(32661);
    pub const UPS_SOUTH: Epsg = Epsg(32761);
    pub const NAD83: Epsg = Epsg(4269);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(epsg::WGS84.to_string(), "EPSG:4326");
        assert_eq!(Epsg::from(31370).code(), 31370);
    }

    #[test]
    fn known_definitions() {
        let def = epsg::WGS84.proj4_definition().expect("WGS84 should be known");
        assert!(def.contains("+proj=longlat"));
        assert!(epsg::BELGIAN_LAMBERT72.wkt_definition().is_some());
    }
}

use std::{fmt::Display, sync::Arc};

use gdal::spatial_ref::SpatialRef;

use crate::errors::Result;

/// Coordinate reference system of a raster, kept as
/// the WKT reported by the file header.
///
/// Cloning is cheap, samples of the same tile share it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Crs(Arc<str>);

impl Crs {
    pub fn from_wkt(wkt: impl AsRef<str>) -> Self {
        Self(Arc::from(wkt.as_ref()))
    }

    pub fn from_epsg(code: u32) -> Result<Self> {
        Ok(Self::from_wkt(SpatialRef::from_epsg(code)?.to_wkt()?))
    }

    pub fn wkt(&self) -> &str {
        self.0.as_ref()
    }

    /// Rasters without georeferencing report an empty projection.
    pub fn is_unknown(&self) -> bool {
        self.0.trim().is_empty()
    }

    fn spatial_ref(&self) -> Result<SpatialRef> {
        Ok(SpatialRef::from_wkt(self.wkt())?)
    }

    pub fn to_proj4(&self) -> Result<String> {
        Ok(self.spatial_ref()?.to_proj4()?)
    }

    /// Authority code when the authority is EPSG.
    pub fn epsg(&self) -> Option<i32> {
        let spatial_ref = self.spatial_ref().ok()?;
        match spatial_ref.auth_name() {
            Some(name) if name.eq_ignore_ascii_case("EPSG") => spatial_ref.auth_code().ok(),
            _ => None,
        }
    }

    /// Same reference system, even if the WKT differs in wording.
    pub fn equivalent(&self, other: &Crs) -> bool {
        if self == other {
            return true;
        }
        match (self.spatial_ref(), other.spatial_ref()) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.epsg() {
            Some(code) => write!(f, "EPSG:{code}"),
            None => f.write_str(self.wkt()),
        }
    }
}

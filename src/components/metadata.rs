use crate::components::{bounds::GeoBounds, crs::Crs, transforms::GeoTransform};

/// Positional metadata of one raster, exactly as the file header reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoMetadata {
    pub bounds: GeoBounds,
    pub transform: GeoTransform,
    pub crs: Crs,
}

impl GeoMetadata {
    pub fn new(bounds: GeoBounds, transform: GeoTransform, crs: Crs) -> Self {
        Self {
            bounds,
            transform,
            crs,
        }
    }

    /// Bounds implied by the transform for a `(width, height)` raster.
    pub fn bounds_for(&self, size: (usize, usize)) -> GeoBounds {
        GeoBounds::from_transform(&self.transform, size)
    }
}

/// Metadata attached to a sample, or an empty record
/// for data that never came from a file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata(Option<GeoMetadata>);

impl Metadata {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<&GeoMetadata> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<GeoMetadata> {
        self.0
    }
}

impl From<GeoMetadata> for Metadata {
    fn from(value: GeoMetadata) -> Self {
        Self(Some(value))
    }
}

impl From<Option<GeoMetadata>> for Metadata {
    fn from(value: Option<GeoMetadata>) -> Self {
        Self(value)
    }
}

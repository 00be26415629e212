use geo::{AffineTransform, Coord};
use shrinkwraprs::Shrinkwrap;

/// Affine transform from pixel space `(col, row)` to geo space,
/// with raster crs.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(AffineTransform);

impl GeoTransform {
    pub fn new(a: f64, b: f64, xoff: f64, d: f64, e: f64, yoff: f64) -> Self {
        Self(AffineTransform::new(a, b, xoff, d, e, yoff))
    }

    pub fn identity() -> Self {
        Self(AffineTransform::identity())
    }

    /// From gdal ordering `[xoff, a, b, yoff, d, e]`.
    pub fn from_gdal(gdal_transform: [f64; 6]) -> Self {
        Self::new(
            gdal_transform[1],
            gdal_transform[2],
            gdal_transform[0],
            gdal_transform[4],
            gdal_transform[5],
            gdal_transform[3],
        )
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.xoff(),
            self.a(),
            self.b(),
            self.yoff(),
            self.d(),
            self.e(),
        ]
    }

    /// `(a, b, xoff, d, e, yoff)`, same ordering as rasterio's `Affine`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.a(),
            self.b(),
            self.xoff(),
            self.d(),
            self.e(),
            self.yoff(),
        )
    }

    /// Geo coords of pixel corner `(col, row)`.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> Coord {
        self.apply(Coord { x: col, y: row })
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.to_gdal()
            .iter()
            .zip(other.to_gdal())
            .all(|(lhs, rhs)| (lhs - rhs).abs() <= epsilon)
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(value: [f64; 6]) -> Self {
        Self::from_gdal(value)
    }
}

use geo::{Coord, Rect};
use shrinkwraprs::Shrinkwrap;

use crate::components::transforms::GeoTransform;

/// Bounds of a raster in 'geospace', with raster crs.
#[derive(Shrinkwrap, Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds(Rect);

impl From<Rect> for GeoBounds {
    fn from(value: Rect) -> Self {
        Self(value)
    }
}

impl GeoBounds {
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self(Rect::new((minx, miny), (maxx, maxy)))
    }

    /// Envelope of all four pixel corners of a `(width, height)` raster.
    pub fn from_transform(transform: &GeoTransform, size: (usize, usize)) -> Self {
        let (width, height) = (size.0 as f64, size.1 as f64);
        let corners = [(0., 0.), (width, 0.), (0., height), (width, height)]
            .map(|(col, row)| transform.pixel_to_geo(col, row));
        let fold = |select: fn(f64, f64) -> f64| {
            corners[1..].iter().fold(corners[0], |acc, corner| Coord {
                x: select(acc.x, corner.x),
                y: select(acc.y, corner.y),
            })
        };
        Self(Rect::new(fold(f64::min), fold(f64::max)))
    }

    /// `(minx, miny, maxx, maxy)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        let (min, max) = (self.0.min(), self.0.max());
        (min.x, min.y, max.x, max.y)
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        let (lhs, rhs) = (self.as_tuple(), other.as_tuple());
        [lhs.0 - rhs.0, lhs.1 - rhs.1, lhs.2 - rhs.2, lhs.3 - rhs.3]
            .iter()
            .all(|diff| diff.abs() <= epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn north_up_bounds() {
        let transform = GeoTransform::from_gdal([500000., 10., 0., 4600000., 0., -10.]);
        let bounds = GeoBounds::from_transform(&transform, (4, 2));
        assert_eq!(bounds.as_tuple(), (500000., 4599980., 500040., 4600000.));
    }

    #[rstest]
    fn rotated_bounds_cover_all_corners() {
        let transform = GeoTransform::new(1., 1., 0., -1., 1., 0.);
        let bounds = GeoBounds::from_transform(&transform, (2, 2));
        assert_eq!(bounds.as_tuple(), (0., -2., 4., 2.));
    }

    #[rstest]
    fn new_normalizes_corners() {
        assert_eq!(
            GeoBounds::new(10., 10., 0., 0.).as_tuple(),
            (0., 0., 10., 10.)
        );
    }
}

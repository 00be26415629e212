mod components;
mod errors;

pub mod collate;
pub mod datasets;
pub mod loader;

pub use components::{
    bounds, crs, file, load, metadata, save, save_sample, save_sample_as, transforms, writer,
    Crs, File, GdalFile, GeoBounds, GeoMetadata, GeoTransform, Metadata, Sample,
};
pub use collate::{collate, Batch, Collate, SegmentationBatch};
pub use datasets::{
    ChannelSpec, Dataset, DatasetConfig, MultiSegmentationDataset, SampleKey, SegmentationItem,
    TargetRename,
};
pub use errors::{RastersetError, Result};
pub use loader::BatchLoader;

#[cfg(test)]
pub(crate) mod test_utils {
    use ndarray::Array3;
    use std::path::Path;

    use crate::{save, Crs, GeoBounds, GeoMetadata, GeoTransform, Metadata};

    pub const TILE_SIZE: (usize, usize) = (4, 4);

    /// 10m UTM 30N tile, shifted east by `x_offset`.
    pub fn utm_metadata(x_offset: f64) -> GeoMetadata {
        let transform = GeoTransform::from_gdal([500000. + x_offset, 10., 0., 4600000., 0., -10.]);
        GeoMetadata::new(
            GeoBounds::from_transform(&transform, TILE_SIZE),
            transform,
            Crs::from_epsg(32630).unwrap(),
        )
    }

    pub fn write_tile(path: &Path, shape: [usize; 3], value: f32, metadata: GeoMetadata) {
        let data = Array3::from_elem(shape, value);
        save(data.view(), &Metadata::from(metadata), path).unwrap();
    }

    /// Same georeferencing, tolerating wording differences in the crs.
    pub fn assert_same_place(metadata: &Metadata, expected: &GeoMetadata) {
        let actual = metadata.get().expect("metadata should be present");
        assert!(actual.transform.approx_eq(&expected.transform, 1e-9));
        assert!(actual.bounds.approx_eq(&expected.bounds, 1e-6));
        assert!(actual.crs.equivalent(&expected.crs));
    }
}

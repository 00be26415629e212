use log::{debug, warn};
use ndarray::Array3;
use std::{fmt::Debug, path::Path};

use crate::{
    components::{
        bounds::GeoBounds,
        crs::Crs,
        metadata::GeoMetadata,
        sample::Sample,
        transforms::GeoTransform,
    },
    errors::Result,
};

/// Raster file opened for reading.
///
/// The handle lives as long as the value, so
/// implementors release it on drop.
pub trait File: Debug + Sized {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;
    /// (width, height)
    fn size(&self) -> (usize, usize);
    fn num_bands(&self) -> usize;
    fn crs(&self) -> Crs;
    fn transform(&self) -> Result<GeoTransform>;
    /// All bands as `[C, H, W]`, cast to f32.
    fn read_bands(&self) -> Result<Array3<f32>>;

    fn geo_metadata(&self) -> Result<GeoMetadata> {
        let transform = self.transform()?;
        let bounds = GeoBounds::from_transform(&transform, self.size());
        Ok(GeoMetadata::new(bounds, transform, self.crs()))
    }

    fn read_sample(&self) -> Result<Sample> {
        Ok(Sample::new(self.read_bands()?, self.geo_metadata()?))
    }
}

/// Implementations for gdal
pub mod gdal_backend {
    use super::*;
    use gdal::Dataset as GdalDataset;
    use std::path::PathBuf;

    #[derive(Debug)]
    pub struct GdalFile {
        path: PathBuf,
        dataset: GdalDataset,
    }

    impl GdalFile {
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl File for GdalFile {
        fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            Ok(GdalFile {
                path: path.as_ref().to_path_buf(),
                dataset: GdalDataset::open(&path)?,
            })
        }
        fn size(&self) -> (usize, usize) {
            self.dataset.raster_size()
        }
        fn num_bands(&self) -> usize {
            self.dataset.raster_count()
        }
        fn crs(&self) -> Crs {
            Crs::from_wkt(self.dataset.projection())
        }
        fn transform(&self) -> Result<GeoTransform> {
            match self.dataset.geo_transform() {
                Ok(gdal_transform) => Ok(GeoTransform::from_gdal(gdal_transform)),
                Err(error) => {
                    warn!("{:?} is not georeferenced ({error}), using identity", self.path);
                    Ok(GeoTransform::identity())
                }
            }
        }
        fn read_bands(&self) -> Result<Array3<f32>> {
            let (width, height) = self.size();
            let num_bands = self.num_bands();
            let mut data = Vec::with_capacity(num_bands * width * height);
            for band_index in 1..=num_bands {
                let buffer = self.dataset.rasterband(band_index)?.read_as::<f32>(
                    (0, 0),
                    (width, height),
                    (width, height),
                    None,
                )?;
                data.extend_from_slice(buffer.data());
            }
            Ok(Array3::from_shape_vec((num_bands, height, width), data)?)
        }
    }
}

/// Read all bands of the raster at `path` together with its
/// bounds, transform and crs.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Sample> {
    let sample = gdal_backend::GdalFile::open(&path)?.read_sample()?;
    debug!("loaded {:?} with shape {:?}", path.as_ref(), sample.shape());
    Ok(sample)
}

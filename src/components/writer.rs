use gdal::{
    raster::{Buffer, GdalType},
    DriverManager,
};
use log::{debug, warn};
use ndarray::{ArrayView3, Axis};
use num_traits::AsPrimitive;
use std::path::Path;

use crate::{
    components::{metadata::Metadata, sample::Sample},
    errors::{RastersetError, Result},
};

const DRIVER_NAME: &str = "GTiff";
const BOUNDS_TOLERANCE: f64 = 1e-6;

/// Write `[C, H, W]` data as a GeoTIFF at `path`, one band per channel,
/// with the array's data type. An existing file is overwritten.
///
/// Without metadata the file carries no georeferencing.
/// Bounds are not stored on their own, they follow from
/// the transform and the array size.
pub fn save<T, P>(data: ArrayView3<T>, metadata: &Metadata, path: P) -> Result<()>
where
    T: GdalType + Copy,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let (num_bands, height, width) = data.dim();
    if num_bands == 0 {
        return Err(RastersetError::NoBands {
            path: path.to_path_buf(),
        });
    }

    let driver = DriverManager::get_driver_by_name(DRIVER_NAME)?;
    let mut dataset = driver.create_with_band_type::<T, _>(path, width, height, num_bands)?;

    if let Some(geo_metadata) = metadata.get() {
        let implied_bounds = geo_metadata.bounds_for((width, height));
        if !implied_bounds.approx_eq(&geo_metadata.bounds, BOUNDS_TOLERANCE) {
            warn!(
                "bounds {:?} do not match transform for {width}x{height}, writing {:?}",
                geo_metadata.bounds.as_tuple(),
                implied_bounds.as_tuple()
            );
        }
        dataset.set_geo_transform(&geo_metadata.transform.to_gdal())?;
        if !geo_metadata.crs.is_unknown() {
            dataset.set_projection(geo_metadata.crs.wkt())?;
        }
    }

    for (band_index, band_data) in data.axis_iter(Axis(0)).enumerate() {
        let mut band = dataset.rasterband(band_index + 1)?;
        let mut buffer = Buffer::new((width, height), band_data.iter().copied().collect());
        band.write((0, 0), (width, height), &mut buffer)?;
    }
    dataset.flush_cache()?;

    debug!("saved {:?} with shape {:?}", path, [num_bands, height, width]);
    Ok(())
}

pub fn save_sample<P: AsRef<Path>>(sample: &Sample, path: P) -> Result<()> {
    save(sample.view(), sample.metadata(), path)
}

/// Cast to `T` before writing, e.g. `u8` for class masks.
pub fn save_sample_as<T, P>(sample: &Sample, path: P) -> Result<()>
where
    T: GdalType + Copy + 'static,
    f32: AsPrimitive<T>,
    P: AsRef<Path>,
{
    let data = sample.data.mapv(<f32 as AsPrimitive<T>>::as_);
    save(data.view(), sample.metadata(), path)
}

pub mod bounds;
pub mod crs;
pub mod file;
pub mod metadata;
pub mod sample;
pub mod transforms;
pub mod writer;

pub use bounds::GeoBounds;
pub use crs::Crs;
pub use file::{gdal_backend::GdalFile, load, File};
pub use metadata::{GeoMetadata, Metadata};
pub use sample::Sample;
pub use transforms::GeoTransform;
pub use writer::{save, save_sample, save_sample_as};

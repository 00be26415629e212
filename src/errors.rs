use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RastersetError>;

#[derive(thiserror::Error, Debug)]
pub enum RastersetError {
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[error(transparent)]
    RegexError(#[from] regex::Error),
    #[error("Could not list samples in {path:?}: {source}")]
    Listing {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Pattern `{pattern}` matched {matches} times in sample name `{name}`, expected exactly once")]
    Naming {
        name: String,
        pattern: String,
        matches: usize,
    },
    #[error("Channel `{channel}` has no readable sample to take a placeholder shape from")]
    ShapeDiscovery { channel: String },
    #[error("Channels of sample `{name}` can not be concatenated: {source}")]
    Concatenation {
        name: String,
        source: ndarray::ShapeError,
    },
    #[error("Index {index} is out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("At least one {0} channel is required")]
    NoChannels(&'static str),
    #[error("Can not collate an empty batch")]
    EmptyBatch,
    #[error("Samples can not be stacked into a batch: {0}")]
    Stack(ndarray::ShapeError),
    #[error("Raster {path:?} has no bands")]
    NoBands { path: PathBuf },
}

pub mod config;
pub mod naming;
pub mod segmentation;

pub use config::DatasetConfig;
pub use naming::TargetRename;
pub use segmentation::{MultiSegmentationDataset, SegmentationItem};

use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Random access collection of samples.
///
/// Implementations hold no mutable state, so batch loaders
/// can call `get` from several threads at once.
pub trait Dataset: Send + Sync {
    type Item;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Result<Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A channel is one subdirectory of the dataset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub name: String,
    pub directory: PathBuf,
}

impl ChannelSpec {
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let directory = root.join(&name);
        Self { name, directory }
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

/// File name joining the channels of one tile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleKey {
    pub name: String,
}

impl SampleKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

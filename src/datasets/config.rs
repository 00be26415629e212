use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{
    datasets::{
        naming::{DEFAULT_EXTENSION, DEFAULT_NAME_PATTERN, DEFAULT_TARGET_PREFIX},
        MultiSegmentationDataset, TargetRename,
    },
    errors::Result,
};

/// Parameters of a [MultiSegmentationDataset].
///
/// Channel order is kept as given, it is the order
/// of the channel axis in the loaded arrays.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub input_channels: Vec<String>,
    pub target_channels: Vec<String>,
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
    #[serde(default = "default_target_prefix")]
    pub target_prefix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_name_pattern() -> String {
    DEFAULT_NAME_PATTERN.into()
}

fn default_target_prefix() -> String {
    DEFAULT_TARGET_PREFIX.into()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.into()
}

impl DatasetConfig {
    pub fn new(
        root: impl Into<PathBuf>,
        input_channels: impl IntoIterator<Item = impl Into<String>>,
        target_channels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            root: root.into(),
            input_channels: input_channels.into_iter().map(Into::into).collect(),
            target_channels: target_channels.into_iter().map(Into::into).collect(),
            name_pattern: default_name_pattern(),
            target_prefix: default_target_prefix(),
            extension: default_extension(),
        }
    }

    pub fn with_name_pattern(mut self, name_pattern: impl Into<String>) -> Self {
        self.name_pattern = name_pattern.into();
        self
    }

    pub fn with_target_prefix(mut self, target_prefix: impl Into<String>) -> Self {
        self.target_prefix = target_prefix.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn rename(&self) -> Result<TargetRename> {
        TargetRename::new(&self.name_pattern, &*self.target_prefix, &*self.extension)
    }

    pub fn build(&self) -> Result<MultiSegmentationDataset> {
        MultiSegmentationDataset::new(
            &self.root,
            &self.input_channels,
            &self.target_channels,
            self.rename()?,
        )
    }
}

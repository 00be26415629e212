use itertools::Itertools;
use log::{debug, info, warn};
use ndarray::{concatenate, Array3, Axis};
use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    components::{file::gdal_backend::GdalFile, load, File, Metadata, Sample},
    datasets::{ChannelSpec, Dataset, SampleKey, TargetRename},
    errors::{RastersetError, Result},
};

/// Input and target of one tile, each concatenated over its channels.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationItem {
    pub key: SampleKey,
    pub input: Sample,
    pub target: Sample,
}

/// Segmentation tiles spread over sibling channel directories,
/// `root/<channel>/<sample>.tif`.
///
/// Samples are the files of the first input channel. Other channels
/// are matched by the same file name, falling back to the
/// [TargetRename] name. Channels missing a tile contribute zeros
/// shaped like the first file found for that channel.
pub struct MultiSegmentationDataset {
    root: PathBuf,
    input_channels: Box<[ChannelSpec]>,
    target_channels: Box<[ChannelSpec]>,
    rename: TargetRename,
    samples: Box<[SampleKey]>,
    /// `[C, H, W]` per channel name.
    shapes: HashMap<String, [usize; 3]>,
}

impl Debug for MultiSegmentationDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |channels: &[ChannelSpec]| -> Vec<String> {
            channels.iter().map(|channel| channel.name.clone()).collect()
        };
        f.debug_struct("MultiSegmentationDataset")
            .field("root", &self.root)
            .field("inputs", &names(&self.input_channels))
            .field("targets", &names(&self.target_channels))
            .field("samples", &self.samples.len())
            .field("shapes", &self.shapes)
            .finish()
    }
}

impl MultiSegmentationDataset {
    pub fn new(
        root: impl AsRef<Path>,
        input_channels: impl IntoIterator<Item = impl Into<String>>,
        target_channels: impl IntoIterator<Item = impl Into<String>>,
        rename: TargetRename,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let input_channels = channel_specs(&root, input_channels);
        let target_channels = channel_specs(&root, target_channels);
        let search_channel = input_channels
            .first()
            .ok_or(RastersetError::NoChannels("input"))?;
        if target_channels.is_empty() {
            return Err(RastersetError::NoChannels("target"));
        }

        let samples = list_samples(&search_channel.directory, rename.extension())?;
        let mut dataset = Self {
            root,
            input_channels,
            target_channels,
            rename,
            samples,
            shapes: HashMap::new(),
        };
        dataset.shapes = dataset.discover_shapes()?;
        info!("new {dataset:?}");
        Ok(dataset)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn samples(&self) -> &[SampleKey] {
        &self.samples
    }

    pub fn input_channels(&self) -> &[ChannelSpec] {
        &self.input_channels
    }

    pub fn target_channels(&self) -> &[ChannelSpec] {
        &self.target_channels
    }

    pub fn rename(&self) -> &TargetRename {
        &self.rename
    }

    /// Shape recorded for `channel`, if any of its files could be found.
    pub fn channel_shape(&self, channel: &str) -> Option<[usize; 3]> {
        self.shapes.get(channel).copied()
    }

    /// File holding `key` for `channel`: the literal name, else the renamed one.
    pub fn resolve(&self, channel: &ChannelSpec, key: &SampleKey) -> Result<Option<PathBuf>> {
        let literal = channel.path_of(key.as_str());
        if literal.is_file() {
            return Ok(Some(literal));
        }
        let renamed = channel.path_of(&self.rename.rename(key.as_str())?);
        if renamed.is_file() {
            debug!("{} in {} resolved to {:?}", key.as_str(), channel.name, renamed);
            Ok(Some(renamed))
        } else {
            Ok(None)
        }
    }

    fn discover_shapes(&self) -> Result<HashMap<String, [usize; 3]>> {
        let mut shapes = HashMap::new();
        for channel in self.input_channels.iter().chain(self.target_channels.iter()) {
            if shapes.contains_key(&channel.name) {
                continue;
            }
            for key in self.samples.iter() {
                let resolved = self.resolve(channel, key).inspect_err(|_| {
                    debug!(
                        "{} can not be resolved in {} while discovering shapes",
                        key.as_str(),
                        channel.name
                    )
                })?;
                if let Some(path) = resolved {
                    let file = GdalFile::open(&path)?;
                    let (width, height) = file.size();
                    shapes.insert(channel.name.clone(), [file.num_bands(), height, width]);
                    break;
                }
            }
            if !shapes.contains_key(&channel.name) {
                warn!("no sample found for channel {}", channel.name);
            }
        }
        Ok(shapes)
    }

    /// Concatenate the channels of `key` along the first axis.
    /// Metadata is that of the last file actually read.
    fn load_group(&self, key: &SampleKey, channels: &[ChannelSpec]) -> Result<Sample> {
        let mut metadata = Metadata::empty();
        let mut arrays = Vec::with_capacity(channels.len());
        for channel in channels {
            match self.resolve(channel, key)? {
                Some(path) => {
                    let (data, file_metadata) = load(&path)?.into_parts();
                    metadata = file_metadata;
                    arrays.push(data);
                }
                None => {
                    let shape = self.channel_shape(&channel.name).ok_or_else(|| {
                        RastersetError::ShapeDiscovery {
                            channel: channel.name.clone(),
                        }
                    })?;
                    debug!("{} missing in {}, using zeros", key.as_str(), channel.name);
                    arrays.push(Sample::zeros(shape).data);
                }
            }
        }
        let views: Vec<_> = arrays.iter().map(Array3::view).collect();
        let data = concatenate(Axis(0), &views).map_err(|source| {
            RastersetError::Concatenation {
                name: key.name.clone(),
                source,
            }
        })?;
        Ok(Sample::new(data, metadata))
    }
}

impl Dataset for MultiSegmentationDataset {
    type Item = SegmentationItem;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<SegmentationItem> {
        let key = self
            .samples
            .get(index)
            .ok_or(RastersetError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        let input = self.load_group(key, &self.input_channels)?;
        let target = self.load_group(key, &self.target_channels)?;
        Ok(SegmentationItem {
            key: key.clone(),
            input,
            target,
        })
    }
}

fn channel_specs(
    root: &Path,
    names: impl IntoIterator<Item = impl Into<String>>,
) -> Box<[ChannelSpec]> {
    names
        .into_iter()
        .map(|name| ChannelSpec::new(root, name))
        .collect()
}

/// Visible files ending in `.{extension}`, sorted by name.
fn list_samples(directory: &Path, extension: &str) -> Result<Box<[SampleKey]>> {
    let suffix = format!(".{extension}");
    let listing_error = |source| RastersetError::Listing {
        path: directory.to_path_buf(),
        source,
    };
    fs::read_dir(directory)
        .map_err(listing_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .process_results(|paths| {
            paths
                .filter(|path| path.is_file())
                .filter_map(|path| {
                    let name = path.file_name()?;
                    let name = name.to_str();
                    if name.is_none() {
                        warn!("skipping {path:?}, file name is not valid UTF-8");
                    }
                    name.map(String::from)
                })
                .filter(|name| name.ends_with(&suffix) && !name.starts_with('.'))
                .sorted()
                .map(SampleKey::new)
                .collect()
        })
        .map_err(listing_error)
}

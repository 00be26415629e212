use log::debug;
use rayon::prelude::*;
use std::{ops::Range, sync::Arc};

use crate::{
    collate::Collate,
    datasets::Dataset,
    errors::Result,
};

/// Iterates a [Dataset] in index order, `batch_size` samples at a time.
///
/// Samples of one batch are read in parallel and collated in order.
#[derive(Debug)]
pub struct BatchLoader<D: Dataset> {
    dataset: Arc<D>,
    batch_size: usize,
    drop_last: bool,
}

impl<D: Dataset> Clone for BatchLoader<D> {
    fn clone(&self) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
            batch_size: self.batch_size,
            drop_last: self.drop_last,
        }
    }
}

impl<D> BatchLoader<D>
where
    D: Dataset,
    D::Item: Collate + Send,
{
    /// A `batch_size` of zero is treated as one.
    pub fn new(dataset: Arc<D>, batch_size: usize) -> Self {
        Self {
            dataset,
            batch_size: batch_size.max(1),
            drop_last: false,
        }
    }

    /// Skip the last batch if it would be smaller than `batch_size`.
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn len(&self) -> usize {
        let len = self.dataset.len();
        if self.drop_last {
            len / self.batch_size
        } else {
            len.div_ceil(self.batch_size)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn indexes(&self, batch_index: usize) -> Range<usize> {
        let start = batch_index * self.batch_size;
        start..(start + self.batch_size).min(self.dataset.len())
    }

    /// Batch number `batch_index`, `None` past the end.
    pub fn batch(&self, batch_index: usize) -> Option<Result<<D::Item as Collate>::Batch>> {
        if batch_index >= self.len() {
            return None;
        }
        let indexes = self.indexes(batch_index);
        debug!("loading batch {batch_index} with samples {indexes:?}");
        let samples = indexes
            .into_par_iter()
            .map(|index| self.dataset.get(index))
            .collect::<Result<Vec<_>>>();
        Some(samples.and_then(<D::Item as Collate>::collate))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<<D::Item as Collate>::Batch>> + '_ {
        (0..self.len()).map_while(|batch_index| self.batch(batch_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{Metadata, Sample},
        errors::RastersetError,
        test_utils::{utm_metadata, write_tile},
        MultiSegmentationDataset, SegmentationBatch, TargetRename,
    };
    use ndarray::Array3;
    use rstest::rstest;

    /// Sample `i` is filled with `i`, metadata only on even samples.
    struct Counting(usize);

    impl Dataset for Counting {
        type Item = Sample;

        fn len(&self) -> usize {
            self.0
        }

        fn get(&self, index: usize) -> Result<Sample> {
            if index >= self.0 {
                return Err(RastersetError::IndexOutOfRange {
                    index,
                    len: self.0,
                });
            }
            let data = Array3::from_elem((1, 2, 2), index as f32);
            Ok(if index % 2 == 0 {
                Sample::new(data, utm_metadata(index as f64))
            } else {
                Sample::new(data, Metadata::empty())
            })
        }
    }

    #[rstest]
    #[case(5, 2, false, vec![2, 2, 1])]
    #[case(5, 2, true, vec![2, 2])]
    #[case(4, 4, false, vec![4])]
    #[case(3, 0, false, vec![1, 1, 1])]
    #[case(0, 3, false, vec![])]
    fn batch_sizes(
        #[case] len: usize,
        #[case] batch_size: usize,
        #[case] drop_last: bool,
        #[case] expected: Vec<usize>,
    ) {
        let loader = BatchLoader::new(Arc::new(Counting(len)), batch_size).drop_last(drop_last);
        assert_eq!(loader.len(), expected.len());
        let sizes: Vec<usize> = loader.iter().map(|batch| batch.unwrap().len()).collect();
        assert_eq!(sizes, expected);
    }

    #[rstest]
    fn batches_keep_index_order() {
        let loader = BatchLoader::new(Arc::new(Counting(7)), 4);
        let batch = loader.batch(1).unwrap().unwrap();
        let values: Vec<f32> = batch.samples().map(|sample| sample.data[[0, 0, 0]]).collect();
        assert_eq!(values, [4., 5., 6.]);
        let present: Vec<bool> = batch.metadata.iter().map(|m| m.is_present()).collect();
        assert_eq!(present, [true, false, true]);
        assert!(loader.batch(2).is_none());
    }

    #[test_log::test]
    fn loads_segmentation_batches() {
        let root = tempfile::tempdir().unwrap();
        for channel in ["chips", "masks"] {
            std::fs::create_dir(root.path().join(channel)).unwrap();
        }
        for (index, x_offset) in [0., 40., 80.].into_iter().enumerate() {
            let name = format!("tile_0_{index}.tif");
            let path = root.path().join("chips").join(name);
            write_tile(&path, [2, 4, 4], 1., utm_metadata(x_offset));
        }
        write_tile(&root.path().join("masks/mask_0_1.tif"), [1, 4, 4], 1., utm_metadata(40.));

        let rename = TargetRename::new(r"_\d+_\d+", "mask", "tif").unwrap();
        let dataset =
            MultiSegmentationDataset::new(root.path(), ["chips"], ["masks"], rename).unwrap();
        let loader = BatchLoader::new(Arc::new(dataset), 2);
        let batches: Vec<SegmentationBatch> = loader.iter().collect::<Result<_>>().unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].input.data.dim(), (2, 2, 4, 4));
        assert_eq!(batches[0].target.data.dim(), (2, 1, 4, 4));
        let targets_present: Vec<bool> = batches[0]
            .target
            .metadata
            .iter()
            .map(|metadata| metadata.is_present())
            .collect();
        assert_eq!(targets_present, [false, true]);
        assert_eq!(batches[1].keys[0].as_str(), "tile_0_2.tif");
    }
}

//! Batching that keeps per-sample metadata.
//!
//! Stacking arrays along a new batch axis drops whatever was paired with
//! them, so every batch carries the metadata of its samples alongside the
//! stacked data, in the same order.

use itertools::multiunzip;
use ndarray::{stack, Array4, Axis};

use crate::{
    components::{Metadata, Sample},
    datasets::{SampleKey, SegmentationItem},
    errors::{RastersetError, Result},
};

/// `[N, C, H, W]` data with one metadata record per sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub data: Array4<f32>,
    pub metadata: Vec<Metadata>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Sample `index` of the batch with its own metadata.
    pub fn sample(&self, index: usize) -> Option<Sample> {
        let metadata = self.metadata.get(index)?;
        Some(Sample::new(
            self.data.index_axis(Axis(0), index).to_owned(),
            metadata.clone(),
        ))
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.data
            .axis_iter(Axis(0))
            .zip(self.metadata.iter())
            .map(|(data, metadata)| Sample::new(data.to_owned(), metadata.clone()))
    }
}

/// Values that can be batched together.
pub trait Collate: Sized {
    type Batch;

    fn collate(samples: Vec<Self>) -> Result<Self::Batch>;
}

impl Collate for Sample {
    type Batch = Batch;

    fn collate(samples: Vec<Self>) -> Result<Batch> {
        if samples.is_empty() {
            return Err(RastersetError::EmptyBatch);
        }
        let views: Vec<_> = samples.iter().map(Sample::view).collect();
        let data = stack(Axis(0), &views).map_err(RastersetError::Stack)?;
        let metadata = samples
            .into_iter()
            .map(|sample| sample.metadata)
            .collect();
        Ok(Batch { data, metadata })
    }
}

impl<A: Collate, B: Collate> Collate for (A, B) {
    type Batch = (A::Batch, B::Batch);

    fn collate(samples: Vec<Self>) -> Result<Self::Batch> {
        let (a, b): (Vec<A>, Vec<B>) = samples.into_iter().unzip();
        Ok((A::collate(a)?, B::collate(b)?))
    }
}

impl<A: Collate, B: Collate, C: Collate> Collate for (A, B, C) {
    type Batch = (A::Batch, B::Batch, C::Batch);

    fn collate(samples: Vec<Self>) -> Result<Self::Batch> {
        let (a, b, c): (Vec<A>, Vec<B>, Vec<C>) = multiunzip(samples);
        Ok((A::collate(a)?, B::collate(b)?, C::collate(c)?))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentationBatch {
    pub keys: Vec<SampleKey>,
    pub input: Batch,
    pub target: Batch,
}

impl Collate for SegmentationItem {
    type Batch = SegmentationBatch;

    fn collate(samples: Vec<Self>) -> Result<SegmentationBatch> {
        let (keys, inputs, targets): (Vec<_>, Vec<_>, Vec<_>) = multiunzip(
            samples
                .into_iter()
                .map(|SegmentationItem { key, input, target }| (key, input, target)),
        );
        Ok(SegmentationBatch {
            keys,
            input: Sample::collate(inputs)?,
            target: Sample::collate(targets)?,
        })
    }
}

/// Stack `samples` position by position, keeping their metadata.
pub fn collate<T: Collate>(samples: Vec<T>) -> Result<T::Batch> {
    T::collate(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utm_metadata;
    use ndarray::Array3;
    use rstest::{fixture, rstest};

    #[fixture]
    fn with_metadata() -> Sample {
        Sample::new(Array3::from_elem((2, 3, 3), 1.), utm_metadata(0.))
    }

    #[fixture]
    fn without_metadata() -> Sample {
        Sample::new(Array3::from_elem((2, 3, 3), 2.), Metadata::empty())
    }

    #[rstest]
    fn stacks_along_batch_axis(with_metadata: Sample, without_metadata: Sample) {
        let batch = collate(vec![with_metadata, without_metadata]).unwrap();
        assert_eq!(batch.data.dim(), (2, 2, 3, 3));
        assert_eq!(batch.len(), 2);
        assert!(batch.data.index_axis(Axis(0), 0).iter().all(|v| *v == 1.));
        assert!(batch.data.index_axis(Axis(0), 1).iter().all(|v| *v == 2.));
    }

    #[rstest]
    fn metadata_follows_sample_order(with_metadata: Sample, without_metadata: Sample) {
        let batch = collate(vec![with_metadata.clone(), without_metadata.clone()]).unwrap();
        assert_eq!(batch.metadata, [Metadata::from(utm_metadata(0.)), Metadata::empty()]);

        let batch = collate(vec![without_metadata, with_metadata]).unwrap();
        assert_eq!(batch.metadata, [Metadata::empty(), Metadata::from(utm_metadata(0.))]);
    }

    #[rstest]
    fn unbatching_restores_samples(with_metadata: Sample, without_metadata: Sample) {
        let samples = vec![with_metadata, without_metadata];
        let batch = collate(samples.clone()).unwrap();
        assert_eq!(batch.samples().collect::<Vec<_>>(), samples);
        assert_eq!(batch.sample(1), Some(samples[1].clone()));
        assert_eq!(batch.sample(2), None);
    }

    #[rstest]
    fn tuples_collate_per_position(with_metadata: Sample, without_metadata: Sample) {
        let (inputs, targets) = collate(vec![
            (with_metadata.clone(), without_metadata.clone()),
            (without_metadata.clone(), with_metadata.clone()),
        ])
        .unwrap();
        assert_eq!(inputs.metadata, [Metadata::from(utm_metadata(0.)), Metadata::empty()]);
        assert_eq!(targets.metadata, [Metadata::empty(), Metadata::from(utm_metadata(0.))]);

        let (_, _, third) = collate(vec![(
            with_metadata.clone(),
            without_metadata.clone(),
            with_metadata,
        )])
        .unwrap();
        assert_eq!(third.data.dim(), (1, 2, 3, 3));
    }

    #[rstest]
    fn segmentation_items(with_metadata: Sample, without_metadata: Sample) {
        let items = vec![
            SegmentationItem {
                key: SampleKey::new("tile_0_0.tif"),
                input: with_metadata.clone(),
                target: without_metadata.clone(),
            },
            SegmentationItem {
                key: SampleKey::new("tile_0_1.tif"),
                input: without_metadata,
                target: with_metadata,
            },
        ];
        let batch = collate(items).unwrap();
        assert_eq!(
            batch.keys,
            [SampleKey::new("tile_0_0.tif"), SampleKey::new("tile_0_1.tif")]
        );
        assert_eq!(batch.input.data.dim(), (2, 2, 3, 3));
        assert_eq!(batch.target.metadata[1], Metadata::from(utm_metadata(0.)));
    }

    #[rstest]
    fn empty_batch() {
        assert!(matches!(
            collate(Vec::<Sample>::new()),
            Err(RastersetError::EmptyBatch)
        ));
    }

    #[rstest]
    fn mismatched_shapes(with_metadata: Sample) {
        let other = Sample::zeros([1, 3, 3]);
        assert!(matches!(
            collate(vec![with_metadata, other]),
            Err(RastersetError::Stack(_))
        ));
    }
}

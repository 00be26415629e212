use ndarray::{Array3, ArrayView3};

use crate::components::metadata::Metadata;

/// Channel × height × width array paired with the metadata
/// of the file(s) it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub data: Array3<f32>,
    pub metadata: Metadata,
}

impl Sample {
    pub fn new(data: Array3<f32>, metadata: impl Into<Metadata>) -> Self {
        Self {
            data,
            metadata: metadata.into(),
        }
    }

    /// Sample without metadata, e.g. a placeholder for a missing file.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self::new(Array3::zeros(shape), Metadata::empty())
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// `[C, H, W]`
    pub fn shape(&self) -> [usize; 3] {
        let (channels, height, width) = self.data.dim();
        [channels, height, width]
    }

    /// Apply a transform to the data, the metadata is carried over untouched.
    pub fn map<F>(self, transform: F) -> Sample
    where
        F: FnOnce(Array3<f32>) -> Array3<f32>,
    {
        Sample {
            data: transform(self.data),
            metadata: self.metadata,
        }
    }

    pub fn into_parts(self) -> (Array3<f32>, Metadata) {
        (self.data, self.metadata)
    }
}

//! Batched sampling of model inputs for evaluation.
//!
//! An evaluation run draws a fixed number of samples from a model in
//! batches, all from a single random source: noise via
//! [`GenerativeModel::sample_z`] and, for conditional models, class labels
//! via [`GenerativeModel::sample_labels`].

use ndarray::{concatenate, Array1, Array2, ArrayD, Axis};
use rand::RngCore;
use tracing::trace;

use crate::error::GenError;
use crate::ports::GenerativeModel;

/// One batch of model inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Noise of shape `(n, z_size)`.
    pub z: Array2<f32>,
    /// Class labels of length `n`, present for conditional models.
    pub labels: Option<Array1<usize>>,
}

impl Batch {
    /// Number of samples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.z.nrows()
    }

    /// Whether the batch holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `model` on this batch.
    ///
    /// # Errors
    ///
    /// Propagates the model's forward error.
    pub fn generate<M>(&self, model: &M) -> Result<ArrayD<f32>, GenError>
    where
        M: GenerativeModel + ?Sized,
    {
        model.forward(&self.z, self.labels.as_ref())
    }
}

/// Iterator over input batches for a model. See [`sample_batches`].
pub struct SampleBatches<'a, M: ?Sized> {
    model: &'a M,
    rng: &'a mut dyn RngCore,
    remaining: usize,
    batch_size: usize,
}

impl<M: GenerativeModel + ?Sized> Iterator for SampleBatches<'_, M> {
    type Item = Result<Batch, GenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = self.remaining.min(self.batch_size);
        self.remaining -= n;
        trace!(n, remaining = self.remaining, "drawing batch");

        let rng: &mut dyn RngCore = &mut *self.rng;
        let z = match self.model.sample_z(n, Some(rng)) {
            Ok(z) => z,
            Err(e) => {
                // A failing source fails every later batch the same way.
                self.remaining = 0;
                return Some(Err(e.into()));
            }
        };
        let labels = self.model.sample_labels(n, &mut *self.rng);
        Some(Ok(Batch { z, labels }))
    }
}

/// Draw `num_samples` model inputs in batches of at most `batch_size`.
///
/// Batches are full-sized except possibly the last; their sizes sum to
/// `num_samples`. `num_samples == 0` yields no batches.
///
/// # Errors
///
/// Returns [`GenError::InvalidArgument`] if `batch_size` is zero.
pub fn sample_batches<'a, M: GenerativeModel + ?Sized>(
    model: &'a M,
    num_samples: usize,
    batch_size: usize,
    rng: &'a mut dyn RngCore,
) -> Result<SampleBatches<'a, M>, GenError> {
    if batch_size == 0 {
        return Err(GenError::InvalidArgument("batch size must be positive".into()));
    }
    Ok(SampleBatches { model, rng, remaining: num_samples, batch_size })
}

/// Draw `num_samples` inputs and concatenate them into one batch.
///
/// # Errors
///
/// Returns an error if `num_samples` or `batch_size` is zero, or if sampling fails.
pub fn collect_samples<M: GenerativeModel + ?Sized>(
    model: &M,
    num_samples: usize,
    batch_size: usize,
    rng: &mut dyn RngCore,
) -> Result<Batch, GenError> {
    if num_samples == 0 {
        return Err(GenError::InvalidArgument("sample count must be positive".into()));
    }
    let batches = sample_batches(model, num_samples, batch_size, rng)?
        .collect::<Result<Vec<_>, _>>()?;

    let zs: Vec<_> = batches.iter().map(|b| b.z.view()).collect();
    let z = concatenate(Axis(0), &zs).map_err(|e| GenError::InvalidArgument(e.to_string()))?;

    let labels = if model.is_conditional() {
        let ls: Vec<_> = batches
            .iter()
            .filter_map(|b| b.labels.as_ref().map(Array1::view))
            .collect();
        Some(concatenate(Axis(0), &ls).map_err(|e| GenError::InvalidArgument(e.to_string()))?)
    } else {
        None
    };

    Ok(Batch { z, labels })
}

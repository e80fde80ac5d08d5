//! Adapter that turns a forward closure into a [`GenerativeModel`].

use std::fmt;

use ndarray::{Array1, Array2, ArrayD};

use crate::error::GenError;
use crate::ports::GenerativeModel;

/// Wraps a forward function together with the noise properties it expects.
///
/// The properties are validated once at construction, so an invalid model
/// can never be handed to a sampler.
pub struct ModuleWrapper<F> {
    forward: F,
    z_size: usize,
    z_type: String,
    num_classes: usize,
}

impl<F> fmt::Debug for ModuleWrapper<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleWrapper")
            .field("z_size", &self.z_size)
            .field("z_type", &self.z_type)
            .field("num_classes", &self.num_classes)
            .finish_non_exhaustive()
    }
}

impl<F> ModuleWrapper<F>
where
    F: Fn(&Array2<f32>, Option<&Array1<usize>>) -> Result<ArrayD<f32>, GenError>,
{
    /// Wrap `forward` as a model consuming `z_size`-dimensional `z_type` noise.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidModel`] if `z_size` is zero or `z_type` is empty.
    pub fn new(
        forward: F,
        z_size: usize,
        z_type: impl Into<String>,
        num_classes: usize,
    ) -> Result<Self, GenError> {
        let z_type = z_type.into();
        if z_size == 0 {
            return Err(GenError::InvalidModel("z_size must be positive".into()));
        }
        if z_type.is_empty() {
            return Err(GenError::InvalidModel("z_type must not be empty".into()));
        }
        Ok(Self { forward, z_size, z_type, num_classes })
    }
}

impl<F> GenerativeModel for ModuleWrapper<F>
where
    F: Fn(&Array2<f32>, Option<&Array1<usize>>) -> Result<ArrayD<f32>, GenError>,
{
    fn z_size(&self) -> usize {
        self.z_size
    }

    fn z_type(&self) -> &str {
        &self.z_type
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn forward(
        &self,
        z: &Array2<f32>,
        labels: Option<&Array1<usize>>,
    ) -> Result<ArrayD<f32>, GenError> {
        if z.ncols() != self.z_size {
            return Err(GenError::Forward(format!(
                "expected noise with {} columns, got {}",
                self.z_size,
                z.ncols()
            )));
        }
        if self.num_classes > 0 && labels.is_none() {
            return Err(GenError::Forward("conditional model requires labels".into()));
        }
        (self.forward)(z, labels)
    }
}

/// Identity forward pass: returns the noise unchanged.
///
/// # Errors
///
/// Never fails; the signature matches [`ModuleWrapper`]'s forward bound.
pub fn passthrough(
    z: &Array2<f32>,
    _labels: Option<&Array1<usize>>,
) -> Result<ArrayD<f32>, GenError> {
    Ok(z.clone().into_dyn())
}

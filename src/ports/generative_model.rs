//! Generative model port consumed by evaluation pipelines.

use ndarray::{Array1, Array2, ArrayD};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{GenError, NoiseError};
use crate::registry::{self, NoiseRegistry};

/// A generative model that can be sampled and evaluated uniformly,
/// regardless of its architecture.
///
/// Implementors supply the three noise properties and a forward pass; the
/// sampling helpers are derived from them.
///
/// ```
/// use genmodel::{GenError, GenerativeModel};
/// use ndarray::{Array1, Array2, ArrayD};
///
/// struct Identity;
///
/// impl GenerativeModel for Identity {
///     fn z_size(&self) -> usize {
///         128
///     }
///
///     fn z_type(&self) -> &str {
///         "normal"
///     }
///
///     fn num_classes(&self) -> usize {
///         0
///     }
///
///     fn forward(
///         &self,
///         z: &Array2<f32>,
///         _labels: Option<&Array1<usize>>,
///     ) -> Result<ArrayD<f32>, GenError> {
///         Ok(z.clone().into_dyn())
///     }
/// }
///
/// let z = Identity.sample_z(4, None).unwrap();
/// assert_eq!(z.dim(), (4, 128));
/// ```
///
/// The properties have no defaults, so a model missing one does not build:
///
/// ```compile_fail
/// use genmodel::{GenError, GenerativeModel};
/// use ndarray::{Array1, Array2, ArrayD};
///
/// struct Identity;
///
/// impl GenerativeModel for Identity {
///     fn z_size(&self) -> usize {
///         128
///     }
///
///     fn z_type(&self) -> &str {
///         "normal"
///     }
///
///     fn forward(
///         &self,
///         z: &Array2<f32>,
///         _labels: Option<&Array1<usize>>,
///     ) -> Result<ArrayD<f32>, GenError> {
///         Ok(z.clone().into_dyn())
///     }
/// }
/// ```
pub trait GenerativeModel {
    /// Size of the per-sample noise vector (positive).
    fn z_size(&self) -> usize;

    /// Registry key of the noise distribution the model consumes.
    ///
    /// Must be registered by the time [`sample_z`](Self::sample_z) is called.
    fn z_type(&self) -> &str;

    /// Number of label classes. Zero for unconditional models.
    fn num_classes(&self) -> usize;

    /// Run the model on a `(n, z_size)` noise batch and, for conditional
    /// models, `n` class labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot process the inputs.
    fn forward(
        &self,
        z: &Array2<f32>,
        labels: Option<&Array1<usize>>,
    ) -> Result<ArrayD<f32>, GenError>;

    /// Whether the model is conditioned on class labels.
    fn is_conditional(&self) -> bool {
        self.num_classes() > 0
    }

    /// Draw `count` noise vectors of shape `(count, z_size)` from the
    /// process-wide registry entry for [`z_type`](Self::z_type).
    ///
    /// Without `rng` a fresh entropy-seeded generator is used, so the result
    /// is not reproducible. With `rng` the generator is advanced by however
    /// much the noise source consumes.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::UnknownNoiseType`] if `z_type` is not
    /// registered, [`NoiseError::InvalidShape`] if `count` or `z_size` is
    /// zero, or whatever the noise source itself reports.
    fn sample_z(
        &self,
        count: usize,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Array2<f32>, NoiseError> {
        match rng {
            Some(rng) => registry::sample_noise(self.z_type(), rng, (count, self.z_size())),
            None => {
                let mut fresh = StdRng::from_entropy();
                registry::sample_noise(self.z_type(), &mut fresh, (count, self.z_size()))
            }
        }
    }

    /// Like [`sample_z`](Self::sample_z), against an injected registry.
    ///
    /// # Errors
    ///
    /// Same as [`sample_z`](Self::sample_z).
    fn sample_z_from(
        &self,
        registry: &NoiseRegistry,
        count: usize,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Array2<f32>, NoiseError> {
        match rng {
            Some(rng) => registry.sample(self.z_type(), rng, (count, self.z_size())),
            None => {
                let mut fresh = StdRng::from_entropy();
                registry.sample(self.z_type(), &mut fresh, (count, self.z_size()))
            }
        }
    }

    /// Draw `count` labels uniformly from `0..num_classes`.
    ///
    /// Returns `None` for unconditional models without touching `rng`.
    fn sample_labels(&self, count: usize, rng: &mut dyn RngCore) -> Option<Array1<usize>> {
        let classes = self.num_classes();
        if classes == 0 {
            return None;
        }
        Some(Array1::from_shape_fn(count, |_| rng.gen_range(0..classes)))
    }
}

//! Noise source registry.
//!
//! Maps a string key (a model's `z_type`) to a function that produces a
//! `(count, z_size)` noise tensor from a random source. A process-wide
//! registry pre-populated with the built-ins from [`crate::noise`] backs
//! [`GenerativeModel::sample_z`](crate::ports::GenerativeModel::sample_z);
//! standalone [`NoiseRegistry`] values can be injected instead.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use ndarray::Array2;
use rand::RngCore;
use tracing::debug;

use crate::error::NoiseError;
use crate::noise;

/// Shape of a noise tensor: `(count, z_size)`.
pub type Shape = (usize, usize);

/// A noise-generation function.
pub type NoiseFn =
    Arc<dyn Fn(&mut dyn RngCore, Shape) -> Result<Array2<f32>, NoiseError> + Send + Sync>;

/// Mapping from noise type name to noise-generation function.
#[derive(Clone, Default)]
pub struct NoiseRegistry {
    sources: BTreeMap<String, NoiseFn>,
}

impl fmt::Debug for NoiseRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseRegistry").field("sources", &self.names()).finish()
    }
}

impl NoiseRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in sources (`normal`, `unit`, `uniform_0_1`).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut sources: BTreeMap<String, NoiseFn> = BTreeMap::new();
        sources.insert(noise::NORMAL.into(), Arc::new(noise::normal));
        sources.insert(noise::UNIT.into(), Arc::new(noise::unit));
        sources.insert(noise::UNIFORM_0_1.into(), Arc::new(noise::uniform_0_1));
        Self { sources }
    }

    /// Register a new noise source under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is empty or already registered.
    pub fn register<F>(&mut self, name: impl Into<String>, source: F) -> Result<(), NoiseError>
    where
        F: Fn(&mut dyn RngCore, Shape) -> Result<Array2<f32>, NoiseError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(NoiseError::EmptyNoiseName);
        }
        if self.sources.contains_key(&name) {
            return Err(NoiseError::DuplicateNoiseSource(name));
        }
        debug!(noise_type = %name, "registered noise source");
        self.sources.insert(name, Arc::new(source));
        Ok(())
    }

    /// Whether `name` resolves to a source.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    /// Look up the source registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::UnknownNoiseType`] if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<NoiseFn, NoiseError> {
        self.sources.get(name).cloned().ok_or_else(|| NoiseError::UnknownNoiseType {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    /// Draw a noise tensor of `shape` from the source registered under `name`.
    ///
    /// The shape is checked before the source runs, so an invalid request
    /// never touches `rng`. The source's output is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is unknown, a dimension of `shape` is zero,
    /// or the source itself fails.
    pub fn sample(
        &self,
        name: &str,
        rng: &mut dyn RngCore,
        shape: Shape,
    ) -> Result<Array2<f32>, NoiseError> {
        let source = self.get(name)?;
        invoke(name, &source, rng, shape)
    }
}

fn invoke(
    name: &str,
    source: &NoiseFn,
    rng: &mut dyn RngCore,
    (count, z_size): Shape,
) -> Result<Array2<f32>, NoiseError> {
    if count == 0 || z_size == 0 {
        return Err(NoiseError::InvalidShape { count, z_size });
    }
    debug!(noise_type = name, count, z_size, "sampling noise");
    source(rng, (count, z_size))
}

static GLOBAL: OnceLock<RwLock<NoiseRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<NoiseRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(NoiseRegistry::with_builtins()))
}

/// Register a noise source in the process-wide registry.
///
/// # Errors
///
/// Returns an error if `name` is empty or already registered.
pub fn register_noise_source<F>(name: impl Into<String>, source: F) -> Result<(), NoiseError>
where
    F: Fn(&mut dyn RngCore, Shape) -> Result<Array2<f32>, NoiseError> + Send + Sync + 'static,
{
    global().write().unwrap_or_else(PoisonError::into_inner).register(name, source)
}

/// Names registered in the process-wide registry, sorted.
#[must_use]
pub fn registered_noise_sources() -> Vec<String> {
    global().read().unwrap_or_else(PoisonError::into_inner).names()
}

/// Draw noise from the process-wide registry.
///
/// The lock is released before the source runs, so sources may themselves
/// consult the registry.
///
/// # Errors
///
/// Same as [`NoiseRegistry::sample`].
pub fn sample_noise(
    name: &str,
    rng: &mut dyn RngCore,
    shape: Shape,
) -> Result<Array2<f32>, NoiseError> {
    let source = global().read().unwrap_or_else(PoisonError::into_inner).get(name)?;
    invoke(name, &source, rng, shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ones(_rng: &mut dyn RngCore, shape: Shape) -> Result<Array2<f32>, NoiseError> {
        Ok(Array2::ones(shape))
    }

    #[test]
    fn builtins_are_registered() {
        let registry = NoiseRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["normal", "uniform_0_1", "unit"]);
    }

    #[test]
    fn empty_registry_has_no_sources() {
        let registry = NoiseRegistry::new();
        assert!(registry.names().is_empty());
        assert!(!registry.contains("normal"));
    }

    #[test]
    fn register_custom_source() {
        let mut registry = NoiseRegistry::new();
        registry.register("ones", ones).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let z = registry.sample("ones", &mut rng, (2, 3)).unwrap();
        assert_eq!(z, Array2::<f32>::ones((2, 3)));
    }

    #[test]
    fn register_closure_source() {
        let mut registry = NoiseRegistry::new();
        let fill = 0.25_f32;
        registry.register("quarter", move |_, shape| Ok(Array2::from_elem(shape, fill))).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let z = registry.sample("quarter", &mut rng, (1, 2)).unwrap();
        assert!(z.iter().all(|&v| (v - 0.25).abs() < f32::EPSILON));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = NoiseRegistry::with_builtins();
        let err = registry.register("normal", ones).unwrap_err();
        assert!(matches!(err, NoiseError::DuplicateNoiseSource(ref n) if n == "normal"));
    }

    #[test]
    fn empty_name_rejected() {
        let mut registry = NoiseRegistry::new();
        assert!(matches!(registry.register("", ones), Err(NoiseError::EmptyNoiseName)));
    }

    #[test]
    fn unknown_name_lists_available() {
        let registry = NoiseRegistry::with_builtins();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = registry.sample("cauchy", &mut rng, (1, 1)).unwrap_err();
        match err {
            NoiseError::UnknownNoiseType { name, available } => {
                assert_eq!(name, "cauchy");
                assert_eq!(available, "normal, uniform_0_1, unit");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_shape_rejected_before_source_runs() {
        let mut registry = NoiseRegistry::new();
        registry
            .register("panics", |_, _| -> Result<Array2<f32>, NoiseError> {
                panic!("source must not run for an invalid shape")
            })
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            registry.sample("panics", &mut rng, (0, 8)),
            Err(NoiseError::InvalidShape { count: 0, z_size: 8 })
        ));
    }

    #[test]
    fn source_errors_propagate_untranslated() {
        let mut registry = NoiseRegistry::new();
        registry
            .register("broken", |_, _| {
                Err(NoiseError::Source { name: "broken".into(), message: "no entropy".into() })
            })
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = registry.sample("broken", &mut rng, (1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Noise source 'broken' failed: no entropy");
    }

    #[test]
    fn global_registry_accepts_new_sources() {
        register_noise_source("registry_test_ones", ones).unwrap();
        assert!(registered_noise_sources().contains(&"registry_test_ones".to_string()));
        assert!(registered_noise_sources().contains(&"normal".to_string()));

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let z = sample_noise("registry_test_ones", &mut rng, (3, 1)).unwrap();
        assert_eq!(z.dim(), (3, 1));

        assert!(matches!(
            register_noise_source("registry_test_ones", ones),
            Err(NoiseError::DuplicateNoiseSource(_))
        ));
    }
}

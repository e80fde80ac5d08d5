//! Genmodel - a uniform sampling interface for generative models.
//!
//! A [`GenerativeModel`] declares the size and kind of the noise it
//! consumes and how many classes it conditions on. Noise is drawn through a
//! [`NoiseRegistry`] keyed by the model's `z_type`, so an evaluation
//! pipeline can feed any model without knowing its architecture.

pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod noise;
pub mod output;
pub mod ports;
pub mod registry;
pub mod sampler;

pub use adapters::ModuleWrapper;
pub use error::{GenError, NoiseError};
pub use ports::GenerativeModel;
pub use registry::{register_noise_source, registered_noise_sources, NoiseFn, NoiseRegistry, Shape};
pub use sampler::{collect_samples, sample_batches, Batch};

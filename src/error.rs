//! Unified error types for genmodel.

use thiserror::Error;

/// Errors raised while looking up or running a noise source.
#[derive(Debug, Error)]
pub enum NoiseError {
    /// The requested noise type has no registered source.
    #[error("Unknown noise type '{name}'. Registered: {available}")]
    UnknownNoiseType {
        /// The key that failed to resolve.
        name: String,
        /// Comma-separated list of registered keys.
        available: String,
    },

    /// The requested noise shape has a zero dimension.
    #[error("Invalid noise shape ({count}, {z_size}): both dimensions must be positive")]
    InvalidShape {
        /// Number of samples requested.
        count: usize,
        /// Noise dimensionality requested.
        z_size: usize,
    },

    /// A noise source with this name is already registered.
    #[error("Noise source '{0}' is already registered")]
    DuplicateNoiseSource(String),

    /// Noise source names must be non-empty.
    #[error("Noise source name must not be empty")]
    EmptyNoiseName,

    /// A registered noise source reported a failure of its own.
    #[error("Noise source '{name}' failed: {message}")]
    Source {
        /// The noise source key.
        name: String,
        /// Error message from the source.
        message: String,
    },
}

/// Errors that can occur while building, sampling from, or running a model.
#[derive(Debug, Error)]
pub enum GenError {
    /// Noise sampling failed.
    #[error(transparent)]
    Noise(#[from] NoiseError),

    /// The model description is invalid (zero `z_size`, empty `z_type`).
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// The model's forward pass failed.
    #[error("Forward pass failed: {0}")]
    Forward(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sample file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Preview image could not be written.
    #[error("Image error: {0}")]
    Image(String),
}

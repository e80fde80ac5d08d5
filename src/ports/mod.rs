//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the sampling core and the models
//! an evaluation pipeline plugs in. Implementations live in `src/adapters/`.

pub mod generative_model;

pub use generative_model::GenerativeModel;

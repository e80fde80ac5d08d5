//! Adapter implementations for port traits.
//!
//! - `module_wrapper` — Closure-backed [`GenerativeModel`](crate::ports::GenerativeModel)

pub mod module_wrapper;

pub use module_wrapper::{passthrough, ModuleWrapper};

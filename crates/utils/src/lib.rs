//! Shared utilities for the toolbox workspace
//!
//! - `atomic_file`: scratch files and swap-into-place replacement
//! - `tracing`: subscriber initialisation

pub mod atomic_file;
pub mod tracing;

pub use atomic_file::*;

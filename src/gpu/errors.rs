//! GPU-specific error types.

use crate::errors::GraphError;
use thiserror::Error;

/// Errors raised while compiling a graph for the GPU or executing it.
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("GPU device not available: {message}")]
    DeviceNotAvailable { message: String },

    #[error("GPU device request failed: {message}")]
    DeviceRequestFailed { message: String },

    #[error("Module has no input named '{name}'")]
    UnknownInput { name: String },

    #[error("Input '{name}' expects {expected} elements but {provided} were provided")]
    InputSizeMismatch {
        name: String,
        provided: usize,
        expected: usize,
    },

    #[error("Failed to read back output buffer: {message}")]
    OutputReadFailed { message: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type GpuResult<T> = std::result::Result<T, GpuError>;

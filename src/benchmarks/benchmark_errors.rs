//! Error types for benchmark execution.

use crate::errors::GraphError;
use crate::gpu::errors::GpuError;
use crate::timing::TimingError;
use thiserror::Error;

/// Errors that abort a benchmark run.
///
/// There is no recovery path: the first failure propagates to the binary's
/// `main` and terminates the process with a non-zero status.
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Timing(#[from] TimingError),
}

pub type BenchmarkResult<T> = std::result::Result<T, BenchmarkError>;

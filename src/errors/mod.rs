//! Error types for graph construction and shape inference.
//!
//! GPU-specific errors live in [`crate::gpu::errors`] and benchmark-level
//! errors in [`crate::benchmarks::benchmark_errors`]; this module covers the
//! graph IR itself.

mod graph_error;

pub use graph_error::GraphError;

/// Result type alias for graph construction and shape inference.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

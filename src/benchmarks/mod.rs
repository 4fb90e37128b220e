//! Compile-and-measure benchmark harness.

pub mod benchmark_errors;
pub mod runner;

pub use benchmark_errors::{BenchmarkError, BenchmarkResult};
pub use runner::{run_all_benchmarks, run_single_op_benchmark};

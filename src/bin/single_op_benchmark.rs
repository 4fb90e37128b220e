//! Single-operator graph GPU latency benchmark.
//!
//! Builds seven one-operator graphs (conv2d, max_pool2d, softmax, dense,
//! batch_norm, relu, multiply), compiles each into a GPU compute pipeline
//! and prints preheat and benchmark latency statistics for every graph.
//!
//! Run with: cargo run --release --bin single_op_benchmark

use opgraph_bench::benchmarks::{run_all_benchmarks, BenchmarkError};
use opgraph_bench::gpu::GpuContext;

fn main() -> Result<(), BenchmarkError> {
    env_logger::init();

    let context = GpuContext::new()?;
    run_all_benchmarks(&context)?;
    Ok(())
}

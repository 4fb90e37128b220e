//! The compile-and-measure routine and the driver loop.

use crate::benchmarks::benchmark_errors::BenchmarkResult;
use crate::gpu::context::GpuContext;
use crate::gpu::module::CompiledModule;
use crate::networks::{all_networks, SingleOpNetwork};
use crate::timing::TimeEvaluator;
use crate::utils::random::uniform_random_tensor;
use log::info;

/// Warm-up phase: stabilizes caches and clocks before measurement.
const PREHEAT_NUMBER: u32 = 50;
const PREHEAT_REPEAT: u32 = 50;

/// Measured phase.
const BENCHMARK_NUMBER: u32 = 500;
const BENCHMARK_REPEAT: u32 = 100;

/// Base seed for synthesized input tensors.
const INPUT_SEED: u64 = 12345;

/// Compiles one builder's network for the GPU and prints its latency.
///
/// Synthesizes a uniform-random tensor for every declared input, binds it
/// under its declared name, then runs a preheat pass followed by the
/// measured pass. Mean and standard deviation of the per-repeat samples
/// are printed in milliseconds with four-decimal precision.
pub fn run_single_op_benchmark(
    context: &GpuContext,
    builder: fn() -> SingleOpNetwork,
) -> BenchmarkResult<()> {
    let network = builder();

    let module = CompiledModule::compile(context, &network.graph)?;
    info!(
        "Compiled {} ({} input(s), output shape {})",
        network.graph.op.name(),
        network.input_names.len(),
        network.output_shape
    );

    for (index, (shape, name)) in network
        .input_shapes
        .iter()
        .zip(network.input_names.iter())
        .enumerate()
    {
        let data = uniform_random_tensor(shape.num_elements(), INPUT_SEED + index as u64);
        module.set_input(name, &data)?;
    }

    let preheat = TimeEvaluator::new(PREHEAT_NUMBER, PREHEAT_REPEAT)?.evaluate(&module)?;
    println!(
        "[PreHeat]Mean inference time (std dev): {:.4} ms ({:.4} ms)",
        preheat.mean_ms(),
        preheat.std_dev_ms()
    );

    let benchmark = TimeEvaluator::new(BENCHMARK_NUMBER, BENCHMARK_REPEAT)?.evaluate(&module)?;
    println!(
        "[Benchmark]Mean inference time (std dev): {:.4} ms ({:.4} ms)",
        benchmark.mean_ms(),
        benchmark.std_dev_ms()
    );

    Ok(())
}

/// Runs every single-operator benchmark, strictly in sequence.
///
/// Stops at the first failure; there is no retry or partial-result
/// reporting.
pub fn run_all_benchmarks(context: &GpuContext) -> BenchmarkResult<()> {
    for builder in all_networks() {
        run_single_op_benchmark(context, builder)?;
    }
    info!("All benchmarks completed");
    Ok(())
}

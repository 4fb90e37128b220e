//! Latency benchmark for single-operator compute graphs on the GPU.
//!
//! This library builds tiny one-operator graphs (convolution, pooling,
//! softmax, matrix multiply, batch normalization, elementwise multiply,
//! activation), compiles each one into a GPU compute pipeline through wgpu,
//! and measures execution latency with a repeated-measurement time
//! evaluator. Graphs are described declaratively and validated by shape
//! inference before compilation.

pub mod benchmarks;
pub mod errors;
pub mod gpu;
pub mod graph;
pub mod networks;
pub mod shape;
pub mod timing;
pub mod utils;

pub use graph::{OpGraph, OpKind, TensorVar};
pub use networks::SingleOpNetwork;
pub use shape::Shape;
pub use timing::{TimeEvaluator, TimingResults};

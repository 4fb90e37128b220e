//! WGSL compute shader sources for the supported operators.
//!
//! Shaders are kept in standalone `.wgsl` files for IDE highlighting and
//! pulled in with `include_str!`. Every shader follows the same binding
//! convention: binding 0 is the uniform parameter block, bindings 1..N are
//! the read-only input tensors in declaration order, and the last binding
//! is the read-write output tensor.

use crate::graph::OpKind;

/// Invocations per workgroup; all shaders dispatch in one dimension.
pub const WORKGROUP_SIZE: u32 = 256;

/// Returns the WGSL source for the given operator kind.
pub fn shader_source(op: &OpKind) -> &'static str {
    match op {
        OpKind::Conv2d { .. } => include_str!("conv2d.wgsl"),
        OpKind::MaxPool2d { .. } => include_str!("max_pool2d.wgsl"),
        OpKind::Softmax => include_str!("softmax.wgsl"),
        OpKind::Dense => include_str!("dense.wgsl"),
        OpKind::BatchNorm { .. } => include_str!("batch_norm.wgsl"),
        OpKind::Relu => include_str!("relu.wgsl"),
        OpKind::Multiply => include_str!("multiply.wgsl"),
    }
}

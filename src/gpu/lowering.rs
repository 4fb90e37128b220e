//! Lowering from the graph IR to GPU dispatch descriptions.
//!
//! Lowering selects the WGSL shader for the operator, packs its uniform
//! parameter block from the input shapes, and sizes the one-dimensional
//! dispatch. No device resource is touched here; the result is plain data
//! consumed by [`crate::gpu::module::CompiledModule`].

use crate::errors::GraphResult;
use crate::gpu::shaders::{shader_source, WORKGROUP_SIZE};
use crate::graph::{OpGraph, OpKind};
use crate::shape::Shape;

/// A graph lowered to a shader, parameter block and dispatch size.
pub struct LoweredOp {
    /// Operator name, used to label GPU objects.
    pub label: &'static str,
    pub shader_source: &'static str,
    /// Uniform parameter block, already laid out for the shader.
    pub params_bytes: Vec<u8>,
    /// Number of workgroups along x.
    pub workgroups: u32,
    pub output_shape: Shape,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Conv2dParams {
    batch: u32,
    in_channels: u32,
    in_height: u32,
    in_width: u32,
    out_channels: u32,
    out_height: u32,
    out_width: u32,
    kernel_h: u32,
    kernel_w: u32,
    stride_h: u32,
    stride_w: u32,
    pad_h: u32,
    pad_w: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MaxPool2dParams {
    batch: u32,
    channels: u32,
    in_height: u32,
    in_width: u32,
    out_height: u32,
    out_width: u32,
    pool_h: u32,
    pool_w: u32,
    stride_h: u32,
    stride_w: u32,
    pad_h: u32,
    pad_w: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SoftmaxParams {
    rows: u32,
    cols: u32,
    _pad0: u32,
    _pad1: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct DenseParams {
    m: u32,
    n: u32,
    k: u32,
    _pad0: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BatchNormParams {
    batch: u32,
    channels: u32,
    height: u32,
    width: u32,
    epsilon: f32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ElementwiseParams {
    len: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

/// Lowers a validated graph into a dispatch description.
pub fn lower(graph: &OpGraph) -> GraphResult<LoweredOp> {
    let output_shape = graph.infer_output_shape()?;
    let out_elements = output_shape.num_elements() as u32;

    let (params_bytes, threads) = match &graph.op {
        OpKind::Conv2d {
            kernel_size,
            strides,
            padding,
        } => {
            let data = &graph.inputs[0].shape;
            let weight = &graph.inputs[1].shape;
            let params = Conv2dParams {
                batch: data[0] as u32,
                in_channels: data[1] as u32,
                in_height: data[2] as u32,
                in_width: data[3] as u32,
                out_channels: weight[0] as u32,
                out_height: output_shape[2] as u32,
                out_width: output_shape[3] as u32,
                kernel_h: kernel_size.0 as u32,
                kernel_w: kernel_size.1 as u32,
                stride_h: strides.0 as u32,
                stride_w: strides.1 as u32,
                pad_h: padding.0 as u32,
                pad_w: padding.1 as u32,
                _pad0: 0,
                _pad1: 0,
                _pad2: 0,
            };
            (bytemuck::bytes_of(&params).to_vec(), out_elements)
        }
        OpKind::MaxPool2d {
            pool_size,
            strides,
            padding,
        } => {
            let data = &graph.inputs[0].shape;
            let params = MaxPool2dParams {
                batch: data[0] as u32,
                channels: data[1] as u32,
                in_height: data[2] as u32,
                in_width: data[3] as u32,
                out_height: output_shape[2] as u32,
                out_width: output_shape[3] as u32,
                pool_h: pool_size.0 as u32,
                pool_w: pool_size.1 as u32,
                stride_h: strides.0 as u32,
                stride_w: strides.1 as u32,
                pad_h: padding.0 as u32,
                pad_w: padding.1 as u32,
            };
            (bytemuck::bytes_of(&params).to_vec(), out_elements)
        }
        OpKind::Softmax => {
            let data = &graph.inputs[0].shape;
            let params = SoftmaxParams {
                rows: data[0] as u32,
                cols: data[1] as u32,
                _pad0: 0,
                _pad1: 0,
            };
            // One invocation per row, not per element.
            (bytemuck::bytes_of(&params).to_vec(), data[0] as u32)
        }
        OpKind::Dense => {
            let x = &graph.inputs[0].shape;
            let y = &graph.inputs[1].shape;
            let params = DenseParams {
                m: x[0] as u32,
                n: y[0] as u32,
                k: x[1] as u32,
                _pad0: 0,
            };
            (bytemuck::bytes_of(&params).to_vec(), out_elements)
        }
        OpKind::BatchNorm { epsilon } => {
            let data = &graph.inputs[0].shape;
            let params = BatchNormParams {
                batch: data[0] as u32,
                channels: data[1] as u32,
                height: data[2] as u32,
                width: data[3] as u32,
                epsilon: *epsilon,
                _pad0: 0,
                _pad1: 0,
                _pad2: 0,
            };
            (bytemuck::bytes_of(&params).to_vec(), out_elements)
        }
        OpKind::Relu | OpKind::Multiply => {
            let params = ElementwiseParams {
                len: out_elements,
                _pad0: 0,
                _pad1: 0,
                _pad2: 0,
            };
            (bytemuck::bytes_of(&params).to_vec(), out_elements)
        }
    };

    Ok(LoweredOp {
        label: graph.op.name(),
        shader_source: shader_source(&graph.op),
        params_bytes,
        workgroups: threads.div_ceil(WORKGROUP_SIZE),
        output_shape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TensorVar;

    #[test]
    fn test_softmax_dispatches_per_row() {
        let graph = OpGraph::new(OpKind::Softmax, vec![TensorVar::new("x", [1024, 2048])]);
        let lowered = lower(&graph).unwrap();
        // 1024 rows at 256 invocations per workgroup.
        assert_eq!(lowered.workgroups, 4);
        assert_eq!(lowered.output_shape, Shape::from([1024, 2048]));
    }

    #[test]
    fn test_elementwise_dispatches_per_element() {
        let graph = OpGraph::new(OpKind::Relu, vec![TensorVar::new("x", [1, 512, 7, 7])]);
        let lowered = lower(&graph).unwrap();
        assert_eq!(lowered.workgroups, (25088u32).div_ceil(256));
    }

    #[test]
    fn test_param_blocks_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Conv2dParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<MaxPool2dParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<SoftmaxParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<DenseParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<BatchNormParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<ElementwiseParams>() % 16, 0);
    }

    #[test]
    fn test_lowering_rejects_invalid_graphs() {
        let graph = OpGraph::new(
            OpKind::Multiply,
            vec![
                TensorVar::new("x", [2, 2]),
                TensorVar::new("y", [2, 3]),
            ],
        );
        assert!(lower(&graph).is_err());
    }
}

//! Single-operator graph intermediate representation.
//!
//! A graph is one operator applied to a list of named input tensors. The
//! description is plain data: it can be serialized as JSON, compared for
//! structural equality, and validated by [`OpGraph::infer_output_shape`]
//! before any GPU resource is created.

use crate::errors::{GraphError, GraphResult};
use crate::shape::Shape;
use serde::{Deserialize, Serialize};

/// A named graph input with a declared shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorVar {
    pub name: String,
    pub shape: Shape,
}

impl TensorVar {
    /// Creates a named input tensor of the given shape.
    pub fn new(name: &str, shape: impl Into<Shape>) -> Self {
        TensorVar {
            name: name.to_string(),
            shape: shape.into(),
        }
    }
}

/// The operator kinds supported by the benchmark, with their attributes.
///
/// Convolution and pooling operate on NCHW data; convolution weights are
/// OIHW. `Dense` follows the matmul-with-transposed-rhs convention: the
/// second operand is laid out as (units, in_features).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpKind {
    Conv2d {
        kernel_size: (usize, usize),
        strides: (usize, usize),
        padding: (usize, usize),
    },
    MaxPool2d {
        pool_size: (usize, usize),
        strides: (usize, usize),
        padding: (usize, usize),
    },
    /// Softmax over the last axis.
    Softmax,
    Dense,
    /// Inference-mode batch normalization over the channel axis. Takes
    /// five inputs (data, gamma, beta, moving mean, moving variance) and
    /// yields the normalized tensor.
    BatchNorm { epsilon: f32 },
    Relu,
    /// Elementwise multiply of two tensors of identical shape.
    Multiply,
}

impl OpKind {
    /// Canonical operator name used in diagnostics and announcements.
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Conv2d { .. } => "nn.conv2d",
            OpKind::MaxPool2d { .. } => "nn.max_pool2d",
            OpKind::Softmax => "nn.softmax",
            OpKind::Dense => "nn.dense",
            OpKind::BatchNorm { .. } => "nn.batch_norm",
            OpKind::Relu => "nn.relu",
            OpKind::Multiply => "multiply",
        }
    }

    /// Number of input tensors the operator consumes.
    pub fn arity(&self) -> usize {
        match self {
            OpKind::Conv2d { .. } | OpKind::Dense | OpKind::Multiply => 2,
            OpKind::MaxPool2d { .. } | OpKind::Softmax | OpKind::Relu => 1,
            OpKind::BatchNorm { .. } => 5,
        }
    }
}

/// A one-operator expression over named input tensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpGraph {
    pub op: OpKind,
    pub inputs: Vec<TensorVar>,
}

impl OpGraph {
    /// Creates a graph applying `op` to `inputs`.
    pub fn new(op: OpKind, inputs: Vec<TensorVar>) -> Self {
        OpGraph { op, inputs }
    }

    /// Validates the graph and computes its output shape.
    ///
    /// Checks operator arity, input ranks and the extent constraints each
    /// operator imposes. Spatial extents of convolution and pooling follow
    /// `floor((in + 2 * pad - window) / stride) + 1`.
    pub fn infer_output_shape(&self) -> GraphResult<Shape> {
        self.check_arity()?;
        match &self.op {
            OpKind::Conv2d {
                kernel_size,
                strides,
                padding,
            } => self.infer_conv2d(*kernel_size, *strides, *padding),
            OpKind::MaxPool2d {
                pool_size,
                strides,
                padding,
            } => self.infer_max_pool2d(*pool_size, *strides, *padding),
            OpKind::Softmax => {
                self.check_rank(0, 2)?;
                Ok(self.inputs[0].shape.clone())
            }
            OpKind::Dense => self.infer_dense(),
            OpKind::BatchNorm { .. } => self.infer_batch_norm(),
            OpKind::Relu => Ok(self.inputs[0].shape.clone()),
            OpKind::Multiply => {
                let (x, y) = (&self.inputs[0], &self.inputs[1]);
                if x.shape != y.shape {
                    return Err(GraphError::ShapeMismatch {
                        op: self.op.name().to_string(),
                        left: x.shape.clone(),
                        right: y.shape.clone(),
                    });
                }
                Ok(x.shape.clone())
            }
        }
    }

    fn check_arity(&self) -> GraphResult<()> {
        let expected = self.op.arity();
        if self.inputs.len() != expected {
            return Err(GraphError::ArityMismatch {
                op: self.op.name().to_string(),
                expected,
                actual: self.inputs.len(),
            });
        }
        Ok(())
    }

    fn check_rank(&self, index: usize, expected: usize) -> GraphResult<()> {
        let input = &self.inputs[index];
        if input.shape.rank() != expected {
            return Err(GraphError::RankMismatch {
                op: self.op.name().to_string(),
                input: input.name.clone(),
                expected,
                actual: input.shape.rank(),
            });
        }
        Ok(())
    }

    fn infer_conv2d(
        &self,
        kernel_size: (usize, usize),
        strides: (usize, usize),
        padding: (usize, usize),
    ) -> GraphResult<Shape> {
        self.check_rank(0, 4)?;
        self.check_rank(1, 4)?;
        let data = &self.inputs[0].shape;
        let weight = &self.inputs[1].shape;

        if weight[1] != data[1] {
            return Err(GraphError::ChannelMismatch {
                op: self.op.name().to_string(),
                input: self.inputs[1].name.clone(),
                expected: data[1],
                actual: weight[1],
            });
        }
        let out_h = windowed_extent(self.op.name(), data[2], kernel_size.0, strides.0, padding.0)?;
        let out_w = windowed_extent(self.op.name(), data[3], kernel_size.1, strides.1, padding.1)?;
        Ok(Shape::from([data[0], weight[0], out_h, out_w]))
    }

    fn infer_max_pool2d(
        &self,
        pool_size: (usize, usize),
        strides: (usize, usize),
        padding: (usize, usize),
    ) -> GraphResult<Shape> {
        self.check_rank(0, 4)?;
        let data = &self.inputs[0].shape;
        let out_h = windowed_extent(self.op.name(), data[2], pool_size.0, strides.0, padding.0)?;
        let out_w = windowed_extent(self.op.name(), data[3], pool_size.1, strides.1, padding.1)?;
        Ok(Shape::from([data[0], data[1], out_h, out_w]))
    }

    fn infer_dense(&self) -> GraphResult<Shape> {
        self.check_rank(0, 2)?;
        self.check_rank(1, 2)?;
        let x = &self.inputs[0].shape;
        let y = &self.inputs[1].shape;
        // y is (units, in_features); the inner dimension is its second axis.
        if x[1] != y[1] {
            return Err(GraphError::InnerDimensionMismatch {
                op: self.op.name().to_string(),
                left: x[1],
                right: y[1],
            });
        }
        Ok(Shape::from([x[0], y[0]]))
    }

    fn infer_batch_norm(&self) -> GraphResult<Shape> {
        self.check_rank(0, 4)?;
        let data = &self.inputs[0].shape;
        let channels = data[1];
        for index in 1..5 {
            self.check_rank(index, 1)?;
            let input = &self.inputs[index];
            if input.shape[0] != channels {
                return Err(GraphError::ChannelMismatch {
                    op: self.op.name().to_string(),
                    input: input.name.clone(),
                    expected: channels,
                    actual: input.shape[0],
                });
            }
        }
        Ok(data.clone())
    }
}

/// Output extent of a strided window over a padded axis.
fn windowed_extent(
    op: &str,
    extent: usize,
    window: usize,
    stride: usize,
    padding: usize,
) -> GraphResult<usize> {
    if stride == 0 {
        return Err(GraphError::ZeroStride { op: op.to_string() });
    }
    let padded = extent + 2 * padding;
    if window > padded {
        return Err(GraphError::WindowExceedsInput {
            op: op.to_string(),
            window,
            padded_extent: padded,
        });
    }
    Ok((padded - window) / stride + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windowed_extent() {
        // 112 with pool 3, stride 2, pad 1 -> 56
        assert_eq!(windowed_extent("nn.max_pool2d", 112, 3, 2, 1).unwrap(), 56);
        // 7 with kernel 3, stride 1, pad 1 -> 7
        assert_eq!(windowed_extent("nn.conv2d", 7, 3, 1, 1).unwrap(), 7);
    }

    #[test]
    fn test_windowed_extent_rejects_oversized_window() {
        let err = windowed_extent("nn.max_pool2d", 2, 8, 1, 1).unwrap_err();
        assert!(matches!(err, GraphError::WindowExceedsInput { .. }));
    }

    #[test]
    fn test_multiply_requires_identical_shapes() {
        let graph = OpGraph::new(
            OpKind::Multiply,
            vec![
                TensorVar::new("x", [1, 512, 7, 7]),
                TensorVar::new("y", [1, 512, 7, 8]),
            ],
        );
        assert!(matches!(
            graph.infer_output_shape(),
            Err(GraphError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_dense_inner_dimension_check() {
        let graph = OpGraph::new(
            OpKind::Dense,
            vec![
                TensorVar::new("x", [512, 512]),
                TensorVar::new("y", [512, 256]),
            ],
        );
        assert!(matches!(
            graph.infer_output_shape(),
            Err(GraphError::InnerDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_arity_check() {
        let graph = OpGraph::new(OpKind::Relu, vec![]);
        assert!(matches!(
            graph.infer_output_shape(),
            Err(GraphError::ArityMismatch { .. })
        ));
    }
}

//! The seven single-operator benchmark networks.
//!
//! Each builder takes no arguments, announces which operator it is about to
//! build on stdout, and returns the graph together with its declared input
//! shapes, output shape and input names. Shapes are hard-coded constants,
//! so construction never fails.

use crate::graph::{OpGraph, OpKind, TensorVar};
use crate::shape::Shape;

/// A single-operator network as produced by one of the builders.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleOpNetwork {
    pub graph: OpGraph,
    /// Pre-bound parameters. Always empty for these networks: every tensor
    /// is a runtime input.
    pub params: Vec<Vec<f32>>,
    pub input_shapes: Vec<Shape>,
    pub output_shape: Shape,
    pub input_names: Vec<String>,
}

impl SingleOpNetwork {
    fn from_graph(graph: OpGraph, output_shape: impl Into<Shape>) -> Self {
        let input_shapes = graph.inputs.iter().map(|var| var.shape.clone()).collect();
        let input_names = graph.inputs.iter().map(|var| var.name.clone()).collect();
        SingleOpNetwork {
            graph,
            params: Vec::new(),
            input_shapes,
            output_shape: output_shape.into(),
            input_names,
        }
    }
}

/// 3x3 convolution over a (1, 512, 7, 7) feature map, stride 1, padding 1.
pub fn get_network_conv2d() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op nn.conv2d");
    let graph = OpGraph::new(
        OpKind::Conv2d {
            kernel_size: (3, 3),
            strides: (1, 1),
            padding: (1, 1),
        },
        vec![
            TensorVar::new("x", [1, 512, 7, 7]),
            TensorVar::new("y", [512, 512, 3, 3]),
        ],
    );
    SingleOpNetwork::from_graph(graph, [1, 512, 7, 7])
}

/// 3x3 max pooling over a (1, 64, 112, 112) feature map, stride 2, padding 1.
pub fn get_network_pool2d() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op nn.max_pool2d");
    let graph = OpGraph::new(
        OpKind::MaxPool2d {
            pool_size: (3, 3),
            strides: (2, 2),
            padding: (1, 1),
        },
        vec![TensorVar::new("x", [1, 64, 112, 112])],
    );
    SingleOpNetwork::from_graph(graph, [1, 64, 56, 56])
}

/// Row softmax over a (1024, 2048) matrix.
pub fn get_network_softmax() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op nn.softmax");
    let graph = OpGraph::new(OpKind::Softmax, vec![TensorVar::new("x", [1024, 2048])]);
    SingleOpNetwork::from_graph(graph, [1024, 2048])
}

/// 512x512 dense matrix multiply.
pub fn get_network_matmul() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op nn.dense (matmul)");
    let graph = OpGraph::new(
        OpKind::Dense,
        vec![
            TensorVar::new("x", [512, 512]),
            TensorVar::new("y", [512, 512]),
        ],
    );
    SingleOpNetwork::from_graph(graph, [512, 512])
}

/// Inference-mode batch normalization over 512 channels.
pub fn get_network_batchnorm() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op nn.batch_norm");
    let graph = OpGraph::new(
        OpKind::BatchNorm { epsilon: 1e-5 },
        vec![
            TensorVar::new("data0", [1, 512, 7, 7]),
            TensorVar::new("bn_gamma1", [512]),
            TensorVar::new("bn_beta1", [512]),
            TensorVar::new("bn_mean1", [512]),
            TensorVar::new("bn_var1", [512]),
        ],
    );
    SingleOpNetwork::from_graph(graph, [1, 512, 7, 7])
}

/// ReLU over a (1, 512, 7, 7) feature map.
pub fn get_network_relu() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op nn.relu");
    let graph = OpGraph::new(OpKind::Relu, vec![TensorVar::new("x", [1, 512, 7, 7])]);
    SingleOpNetwork::from_graph(graph, [1, 512, 7, 7])
}

/// Elementwise multiply of two (1, 512, 7, 7) tensors.
pub fn get_network_elementwise() -> SingleOpNetwork {
    println!("[Test]Begin building graph with op multiply");
    let graph = OpGraph::new(
        OpKind::Multiply,
        vec![
            TensorVar::new("x", [1, 512, 7, 7]),
            TensorVar::new("y", [1, 512, 7, 7]),
        ],
    );
    SingleOpNetwork::from_graph(graph, [1, 512, 7, 7])
}

/// All builders in the order the driver loop runs them.
pub fn all_networks() -> Vec<fn() -> SingleOpNetwork> {
    vec![
        get_network_conv2d,
        get_network_pool2d,
        get_network_softmax,
        get_network_matmul,
        get_network_batchnorm,
        get_network_relu,
        get_network_elementwise,
    ]
}

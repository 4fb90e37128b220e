//! Shape inference and graph description tests.

use opgraph_bench::errors::GraphError;
use opgraph_bench::graph::{OpGraph, OpKind, TensorVar};
use opgraph_bench::shape::Shape;

#[test]
fn test_conv2d_same_padding_preserves_spatial_extent() {
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
    assert_eq!(
        graph.infer_output_shape().unwrap(),
        Shape::from([1, 512, 7, 7])
    );
}

#[test]
fn test_conv2d_changes_channel_count_with_weights() {
    let graph = OpGraph::new(
        OpKind::Conv2d {
            kernel_size: (3, 3),
            strides: (2, 2),
            padding: (1, 1),
        },
        vec![
            TensorVar::new("x", [1, 3, 224, 224]),
            TensorVar::new("y", [64, 3, 3, 3]),
        ],
    );
    assert_eq!(
        graph.infer_output_shape().unwrap(),
        Shape::from([1, 64, 112, 112])
    );
}

#[test]
fn test_conv2d_rejects_channel_mismatch() {
    let graph = OpGraph::new(
        OpKind::Conv2d {
            kernel_size: (3, 3),
            strides: (1, 1),
            padding: (1, 1),
        },
        vec![
            TensorVar::new("x", [1, 512, 7, 7]),
            TensorVar::new("y", [512, 256, 3, 3]),
        ],
    );
    assert!(matches!(
        graph.infer_output_shape(),
        Err(GraphError::ChannelMismatch { .. })
    ));
}

#[test]
fn test_max_pool2d_halves_spatial_extent() {
    let graph = OpGraph::new(
        OpKind::MaxPool2d {
            pool_size: (3, 3),
            strides: (2, 2),
            padding: (1, 1),
        },
        vec![TensorVar::new("x", [1, 64, 112, 112])],
    );
    assert_eq!(
        graph.infer_output_shape().unwrap(),
        Shape::from([1, 64, 56, 56])
    );
}

#[test]
fn test_batch_norm_requires_per_channel_vectors() {
    let graph = OpGraph::new(
        OpKind::BatchNorm { epsilon: 1e-5 },
        vec![
            TensorVar::new("data0", [1, 512, 7, 7]),
            TensorVar::new("bn_gamma1", [512]),
            TensorVar::new("bn_beta1", [512]),
            TensorVar::new("bn_mean1", [256]),
            TensorVar::new("bn_var1", [512]),
        ],
    );
    let err = graph.infer_output_shape().unwrap_err();
    match err {
        GraphError::ChannelMismatch {
            input,
            expected,
            actual,
            ..
        } => {
            assert_eq!(input, "bn_mean1");
            assert_eq!(expected, 512);
            assert_eq!(actual, 256);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_batch_norm_rejects_wrong_arity() {
    let graph = OpGraph::new(
        OpKind::BatchNorm { epsilon: 1e-5 },
        vec![TensorVar::new("data0", [1, 512, 7, 7])],
    );
    assert!(matches!(
        graph.infer_output_shape(),
        Err(GraphError::ArityMismatch {
            expected: 5,
            actual: 1,
            ..
        })
    ));
}

#[test]
fn test_softmax_requires_rank_two() {
    let graph = OpGraph::new(OpKind::Softmax, vec![TensorVar::new("x", [1, 512, 7, 7])]);
    assert!(matches!(
        graph.infer_output_shape(),
        Err(GraphError::RankMismatch { .. })
    ));
}

#[test]
fn test_graph_round_trips_through_json() {
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
    let json = serde_json::to_string(&graph).expect("serialization should succeed");
    let parsed: OpGraph = serde_json::from_str(&json).expect("deserialization should succeed");
    assert_eq!(parsed, graph);
    assert_eq!(
        parsed.infer_output_shape().unwrap(),
        Shape::from([1, 512, 7, 7])
    );
}

#[test]
fn test_graph_parses_from_json_document() {
    let json = r#"
    {
        "op": {"op": "multiply"},
        "inputs": [
            {"name": "x", "shape": [1, 512, 7, 7]},
            {"name": "y", "shape": [1, 512, 7, 7]}
        ]
    }"#;
    let graph: OpGraph = serde_json::from_str(json).expect("JSON graph should parse");
    assert_eq!(graph.op, OpKind::Multiply);
    assert_eq!(
        graph.infer_output_shape().unwrap(),
        Shape::from([1, 512, 7, 7])
    );
}

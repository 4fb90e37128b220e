//! Contract tests for the seven single-operator network builders.

use opgraph_bench::networks::{
    all_networks, get_network_batchnorm, get_network_conv2d, get_network_elementwise,
    get_network_matmul, get_network_pool2d, get_network_relu, get_network_softmax,
};
use opgraph_bench::shape::Shape;

#[test]
fn test_every_builder_declares_one_name_per_input() {
    for builder in all_networks() {
        let network = builder();
        assert_eq!(
            network.input_shapes.len(),
            network.input_names.len(),
            "{}",
            network.graph.op.name()
        );
        assert_eq!(network.input_shapes.len(), network.graph.inputs.len());
    }
}

#[test]
fn test_every_builder_has_empty_params() {
    for builder in all_networks() {
        assert!(builder().params.is_empty());
    }
}

#[test]
fn test_declared_output_shape_matches_inference() {
    for builder in all_networks() {
        let network = builder();
        let inferred = network
            .graph
            .infer_output_shape()
            .expect("builder graphs are always valid");
        assert_eq!(
            inferred,
            network.output_shape,
            "{}",
            network.graph.op.name()
        );
    }
}

#[test]
fn test_graph_construction_is_deterministic() {
    for builder in all_networks() {
        assert_eq!(builder(), builder());
    }
}

#[test]
fn test_conv2d_network() {
    let network = get_network_conv2d();
    assert_eq!(
        network.input_shapes,
        vec![Shape::from([1, 512, 7, 7]), Shape::from([512, 512, 3, 3])]
    );
    assert_eq!(network.output_shape, Shape::from([1, 512, 7, 7]));
    assert_eq!(network.input_names, vec!["x", "y"]);
}

#[test]
fn test_pool2d_network() {
    let network = get_network_pool2d();
    assert_eq!(network.input_shapes, vec![Shape::from([1, 64, 112, 112])]);
    assert_eq!(network.output_shape, Shape::from([1, 64, 56, 56]));
    assert_eq!(network.input_names, vec!["x"]);
}

#[test]
fn test_batchnorm_network() {
    let network = get_network_batchnorm();
    assert_eq!(
        network.input_shapes,
        vec![
            Shape::from([1, 512, 7, 7]),
            Shape::from([512]),
            Shape::from([512]),
            Shape::from([512]),
            Shape::from([512]),
        ]
    );
    assert_eq!(network.output_shape, Shape::from([1, 512, 7, 7]));
    assert_eq!(
        network.input_names,
        vec!["data0", "bn_gamma1", "bn_beta1", "bn_mean1", "bn_var1"]
    );
}

#[test]
fn test_softmax_and_matmul_networks() {
    let softmax = get_network_softmax();
    assert_eq!(softmax.output_shape, Shape::from([1024, 2048]));

    let matmul = get_network_matmul();
    assert_eq!(matmul.output_shape, Shape::from([512, 512]));
    assert_eq!(matmul.input_names, vec!["x", "y"]);
}

#[test]
fn test_elementwise_networks_preserve_shape() {
    for network in [get_network_relu(), get_network_elementwise()] {
        assert_eq!(network.output_shape, Shape::from([1, 512, 7, 7]));
    }
}

#[test]
fn test_driver_order() {
    let names: Vec<&str> = all_networks()
        .into_iter()
        .map(|builder| builder().graph.op.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "nn.conv2d",
            "nn.max_pool2d",
            "nn.softmax",
            "nn.dense",
            "nn.batch_norm",
            "nn.relu",
            "multiply",
        ]
    );
}

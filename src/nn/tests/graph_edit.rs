/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : ConnectionGraph 编辑操作测试（增删节点、参数、连接、序列）
 */

use super::{chain, conv, linear};
use crate::assert_err;
use crate::errors::GraphError;
use crate::nn::{ConnectionGraph, LayerCatalog, LayerDef, LayerId, LayerType, ParamValue};

#[test]
fn test_uids_are_monotonic_and_never_reused() {
    let mut graph = ConnectionGraph::new();
    let a = graph.add_layer(linear(4, 4), (0.0, 0.0));
    let b = graph.add_layer(linear(4, 4), (0.0, 0.0));
    assert_eq!((a, b), (LayerId(1), LayerId(2)));

    graph.remove_layer(b).unwrap();
    let c = graph.add_layer(linear(4, 4), (0.0, 0.0));
    assert_eq!(c, LayerId(3));

    // 清空画布后计数器保留
    graph.clear();
    assert!(graph.is_empty());
    assert_eq!(graph.add_layer(LayerDef::relu(), (0.0, 0.0)), LayerId(4));
    assert_eq!(graph.max_uid(), 4);
}

#[test]
fn test_add_layer_appends_to_sequence() {
    let mut graph = ConnectionGraph::new();
    let a = graph.add_layer(linear(4, 4), (10.0, 20.0));
    let b = graph.add_layer(LayerDef::relu(), (10.0, 80.0));
    assert_eq!(graph.sequence(), [a, b]);
    assert_eq!(graph.node(a).unwrap().position, (10.0, 20.0));
    assert_eq!(graph.node(b).unwrap().label(), "ReLU #2");
}

#[test]
fn test_add_from_catalog() {
    let catalog = LayerCatalog::builtin();
    let mut graph = ConnectionGraph::new();
    let uid = graph
        .add_from_catalog(&catalog, &LayerType::Dropout, (0.0, 0.0))
        .unwrap();
    assert_eq!(graph.node(uid).unwrap().params.get("p"), Some(&ParamValue::Float(0.5)));

    let result = graph.add_from_catalog(&catalog, &LayerType::from("Mystery"), (0.0, 0.0));
    assert_err!(result, GraphError::UnknownLayerType(name) if name == "Mystery");
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_remove_layer_clears_references() {
    let (mut graph, uids) = chain(vec![linear(8, 4), linear(4, 2), linear(2, 1)]);
    let removed = graph.remove_layer(uids[1]).unwrap();
    assert_eq!(removed.uid(), uids[1]);
    assert_eq!(graph.sequence(), [uids[0], uids[2]]);
    assert!(graph.node(uids[0]).unwrap().connections().is_empty());
    assert!(graph.edges().is_empty());

    assert_err!(graph.remove_layer(uids[1]), GraphError::NodeNotFound(uids[1]));
}

#[test]
fn test_connect_rejects_invalid_edges() {
    let (mut graph, uids) = chain(vec![linear(8, 4), linear(4, 2)]);
    assert_err!(graph.connect(uids[0], uids[0]), GraphError::SelfLoop(_));
    assert_err!(
        graph.connect(uids[0], uids[1]),
        GraphError::DuplicateConnection { src, tgt } if *src == uids[0] && *tgt == uids[1]
    );
    assert_err!(graph.connect(uids[0], LayerId(99)), GraphError::NodeNotFound(LayerId(99)));
    assert_err!(graph.connect(LayerId(99), uids[0]), GraphError::NodeNotFound(LayerId(99)));
    assert_eq!(graph.edges(), [(uids[0], uids[1])]);
}

#[test]
fn test_disconnect() {
    let (mut graph, uids) = chain(vec![linear(8, 4), linear(4, 2)]);
    assert!(graph.disconnect(uids[0], uids[1]).unwrap());
    assert!(!graph.disconnect(uids[0], uids[1]).unwrap());
    assert!(graph.edges().is_empty());
}

#[test]
fn test_set_param_returns_old_value() {
    let (mut graph, uids) = chain(vec![linear(8, 4)]);
    let old = graph.set_param(uids[0], "out_features", 16).unwrap();
    assert_eq!(old, Some(ParamValue::Int(4)));
    assert_eq!(graph.node(uids[0]).unwrap().params.get_int("out_features"), Some(16));

    let added = graph.set_param(uids[0], "bias", false).unwrap();
    assert_eq!(added, None);
    assert_err!(graph.set_param(LayerId(42), "bias", true), GraphError::NodeNotFound(LayerId(42)));
}

#[test]
fn test_connect_in_sequence_order_rebuilds_chain_and_validates() {
    let mut graph = ConnectionGraph::new();
    let a = graph.add_layer(linear(10, 5), (0.0, 0.0));
    let b = graph.add_layer(linear(5, 3), (0.0, 0.0));
    let c = graph.add_layer(linear(3, 1), (0.0, 0.0));
    // 多余的连接会被清除
    graph.connect(a, c).unwrap();

    let report = graph.connect_in_sequence_order().unwrap();
    assert!(report.ok, "{}", report.message);
    assert_eq!(graph.edges(), [(a, b), (b, c)]);
}

#[test]
fn test_connect_in_sequence_order_needs_two_layers() {
    let (mut graph, _) = chain(vec![conv(3, 8)]);
    assert_err!(
        graph.connect_in_sequence_order(),
        GraphError::NotEnoughLayers { required: 2, actual: 1 }
    );
}

#[test]
fn test_reorder_sequence() {
    let (mut graph, uids) = chain(vec![linear(4, 4), linear(4, 4), linear(4, 4)]);
    graph.reorder_sequence(vec![uids[2], uids[0], uids[1]]).unwrap();
    assert_eq!(graph.sequence(), [uids[2], uids[0], uids[1]]);
    assert_eq!(graph.edges(), [(uids[0], uids[1]), (uids[2], uids[0])]);

    assert_err!(graph.reorder_sequence(vec![uids[0], uids[1]]), GraphError::InvalidSequence);
    assert_err!(
        graph.reorder_sequence(vec![uids[0], uids[1], LayerId(77)]),
        GraphError::InvalidSequence
    );
}

#[test]
fn test_insert_expanded_chains_new_layers() {
    let mut graph = ConnectionGraph::new();
    let head = graph.add_layer(conv(3, 64), (0.0, 0.0));
    let block = LayerDef::new(LayerType::ResidualBlock, crate::layer_params! { "repeats" => 1 });
    let uids = graph.insert_expanded(&block, (0.0, 0.0));
    assert_eq!(uids.len(), 6);
    assert_eq!(graph.len(), 7);
    // 新层之间按顺序连接，与已有层之间不自动连接
    assert_eq!(graph.edges().len(), 5);
    assert!(graph.node(head).unwrap().connections().is_empty());
}

#[test]
fn test_summary_lists_sequence() {
    let (graph, _) = chain(vec![conv(3, 8), super::flatten(), linear(8, 2)]);
    let summary = graph.summary_string();
    assert!(summary.contains("3→8 k=3"));
    assert!(summary.contains("8→2"));
    assert!(summary.contains("#2"));
    assert!(summary.ends_with("层数: 3  连接数: 2\n"));

    let markdown = graph.summary_markdown();
    assert_eq!(markdown.lines().count(), 2 + 3);
}

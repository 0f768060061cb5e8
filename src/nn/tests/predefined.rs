/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 预定义网络测试
 */

use crate::assert_err;
use crate::errors::GraphError;
use crate::nn::{ConnectionGraph, LayerType, expand_all, predefined, predefined_names};

#[test]
fn test_all_architectures_available() {
    assert_eq!(predefined_names(), ["LeNet-5", "AlexNet", "VGG16", "ResNet-18", "GoogLeNet"]);
    for name in predefined_names() {
        assert!(predefined(name).is_some_and(|defs| !defs.is_empty()), "{name}");
    }
    assert!(predefined("Transformer").is_none());
}

#[test]
fn test_plain_architectures_validate() {
    for name in ["LeNet-5", "AlexNet", "VGG16"] {
        let mut graph = ConnectionGraph::new();
        graph.insert_predefined(name, false).unwrap();
        let report = graph.validate();
        assert!(report.ok, "{name}: {}", report.message);
    }
}

#[test]
fn test_lenet_layout() {
    let defs = predefined("LeNet-5").unwrap();
    assert_eq!(defs.len(), 12);
    assert_eq!(defs[0].params.get_int("in_channels"), Some(1));
    assert_eq!(defs[7].params.get_int("in_features"), Some(256));
}

#[test]
fn test_resnet18_validates_collapsed_and_expanded() {
    let defs = predefined("ResNet-18").unwrap();
    let blocks = defs.iter().filter(|d| d.layer_type == LayerType::ResidualBlock).count();
    assert_eq!(blocks, 4);
    assert_eq!(expand_all(&defs).len(), defs.len() - blocks + blocks * 12);

    for expand in [false, true] {
        let mut graph = ConnectionGraph::new();
        let uids = graph.insert_predefined("ResNet-18", expand).unwrap();
        assert_eq!(graph.sequence(), uids);
        let report = graph.validate();
        assert!(report.ok, "expand={expand}: {}", report.message);
    }
}

#[test]
fn test_googlenet_collapsed_validates() {
    let mut graph = ConnectionGraph::new();
    graph.insert_predefined("GoogLeNet", false).unwrap();
    let report = graph.validate();
    assert!(report.ok, "{}", report.message);
}

#[test]
fn test_googlenet_expanded_is_lossy() {
    // 分支串接后相邻卷积的通道数不再衔接
    let mut graph = ConnectionGraph::new();
    graph.insert_predefined("GoogLeNet", true).unwrap();
    assert!(graph.nodes().all(|node| !node.layer_type.is_composite()));
    assert!(!graph.validate().ok);
}

#[test]
fn test_unknown_architecture() {
    let mut graph = ConnectionGraph::new();
    assert_err!(
        graph.insert_predefined("Transformer", false),
        GraphError::UnknownArchitecture(name) if name == "Transformer"
    );
    assert!(graph.is_empty());
}

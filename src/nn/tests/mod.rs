mod graph_edit;
mod layer_catalog;
mod predefined;

use crate::layer_params;
use crate::nn::{ConnectionGraph, LayerDef, LayerId, LayerType};

// ----------------------以下是各测试共用的构造函数----------------------

fn linear(in_features: i64, out_features: i64) -> LayerDef {
    LayerDef::new(
        LayerType::Linear,
        layer_params! { "in_features" => in_features, "out_features" => out_features },
    )
}

fn conv(in_channels: i64, out_channels: i64) -> LayerDef {
    LayerDef::conv2d(in_channels, out_channels, 3, 1, 1)
}

fn flatten() -> LayerDef {
    LayerDef::new(LayerType::Flatten, layer_params! {})
}

/// 依次添加各层并按序列连成链
fn chain(defs: Vec<LayerDef>) -> (ConnectionGraph, Vec<LayerId>) {
    let mut graph = ConnectionGraph::new();
    let uids: Vec<LayerId> = defs
        .into_iter()
        .map(|def| graph.add_layer(def, (0.0, 0.0)))
        .collect();
    for pair in uids.windows(2) {
        graph.connect(pair[0], pair[1]).unwrap();
    }
    (graph, uids)
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 画布坐标与序列之间的换算
 *
 * 坐标变化不会自动改变序列：UI 在拖动结束后显式调用
 * `recompute_sequence_from_positions`，核心只提供纯函数。
 */

use super::{ConnectionGraph, LayerId, LayerNode};
use crate::nn::LayoutConfig;

/// 按画布坐标推导序列：y 从上到下；y 相同时按 x，再按 uid（保证结果确定）
pub fn sequence_from_positions<'a, I>(nodes: I) -> Vec<LayerId>
where
    I: IntoIterator<Item = &'a LayerNode>,
{
    let mut nodes: Vec<&LayerNode> = nodes.into_iter().collect();
    nodes.sort_by(|a, b| {
        a.position
            .1
            .total_cmp(&b.position.1)
            .then(a.position.0.total_cmp(&b.position.0))
            .then(a.uid().cmp(&b.uid()))
    });
    nodes.into_iter().map(LayerNode::uid).collect()
}

/// 序列中第 `index` 个层的网格坐标
pub fn grid_position(index: usize, config: &LayoutConfig) -> (f64, f64) {
    (config.x_offset, config.y_offset + index as f64 * config.y_gap)
}

impl ConnectionGraph {
    /// 按当前坐标重新推导序列（连接不变）
    pub fn recompute_sequence_from_positions(&mut self) {
        self.sequence = sequence_from_positions(self.nodes.values());
    }

    /// 按序列把层排成一列；不在序列中的层保持原位
    pub fn auto_layout(&mut self, config: &LayoutConfig) {
        for (index, uid) in self.sequence.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(uid) {
                node.position = grid_position(index, config);
            }
        }
    }
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 连接图（ConnectionGraph）：层节点 + 有向连接 + 执行序列
 *
 * 各 impl 块分散在子模块中：
 * - mod.rs: 节点增删、参数编辑、连接编辑
 * - layout.rs: 坐标 -> 序列、网格布局
 * - io.rs: 设计文档的保存/加载/导入
 *
 * 单线程模型：所有修改都经由 `&mut self`，不需要任何锁。
 */

mod io;
pub mod layout;
mod node;

pub use node::{LayerId, LayerNode};

use crate::errors::GraphError;
use crate::nn::layer::predefined;
use crate::nn::{
    LayerCatalog, LayerDef, LayerParams, LayerType, ParamValue, ValidationReport, expand_all, expand_definition,
};
use log::debug;
use std::collections::BTreeMap;

/// 连接图
///
/// - `nodes`：uid -> 层节点（按 uid 有序，保证保存/导出结果确定）
/// - `sequence`：用户看到的执行顺序，校验时以它为准
/// - `max_uid`：本会话分配/见过的最大 uid，新 uid 总是它加一
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionGraph {
    pub(in crate::nn) nodes: BTreeMap<LayerId, LayerNode>,
    pub(in crate::nn) sequence: Vec<LayerId>,
    pub(in crate::nn) max_uid: u64,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 查询 ==========

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, uid: LayerId) -> Option<&LayerNode> {
        self.nodes.get(&uid)
    }

    pub fn contains(&self, uid: LayerId) -> bool {
        self.nodes.contains_key(&uid)
    }

    /// 所有节点（按 uid 升序）
    pub fn nodes(&self) -> impl Iterator<Item = &LayerNode> {
        self.nodes.values()
    }

    pub fn sequence(&self) -> &[LayerId] {
        &self.sequence
    }

    /// 本会话见过的最大 uid
    pub const fn max_uid(&self) -> u64 {
        self.max_uid
    }

    /// 由各节点的 connections 推导出的边（目标不存在的连接不计入）
    pub fn edges(&self) -> Vec<(LayerId, LayerId)> {
        let nodes = &self.nodes;
        nodes
            .values()
            .flat_map(|node| {
                node.connections
                    .iter()
                    .filter(move |&target| nodes.contains_key(target))
                    .map(move |&target| (node.uid(), target))
            })
            .collect()
    }

    // ========== 节点增删 ==========

    fn alloc_uid(&mut self) -> LayerId {
        self.max_uid += 1;
        LayerId(self.max_uid)
    }

    /// 添加一个层并追加到序列末尾，返回新 uid
    pub fn add_layer(&mut self, def: LayerDef, position: (f64, f64)) -> LayerId {
        let uid = self.alloc_uid();
        self.nodes.insert(uid, LayerNode::new(uid, def, position));
        self.sequence.push(uid);
        uid
    }

    /// 以目录中的默认参数添加一个层
    pub fn add_from_catalog(
        &mut self,
        catalog: &LayerCatalog,
        layer_type: &LayerType,
        position: (f64, f64),
    ) -> Result<LayerId, GraphError> {
        let def = catalog
            .instantiate(layer_type)
            .ok_or_else(|| GraphError::UnknownLayerType(layer_type.to_string()))?;
        Ok(self.add_layer(def, position))
    }

    /// 添加一个层；复合模块先展开为基本层再逐个添加，新层之间按顺序连接
    pub fn insert_expanded(&mut self, def: &LayerDef, position: (f64, f64)) -> Vec<LayerId> {
        self.insert_chain(expand_definition(def), position)
    }

    /// 插入预定义网络，新层之间按顺序连接
    ///
    /// `expand` 为 true 时复合模块占位符（ResidualBlock / Inception）会被展开。
    pub fn insert_predefined(&mut self, name: &str, expand: bool) -> Result<Vec<LayerId>, GraphError> {
        let defs = predefined::predefined(name)
            .ok_or_else(|| GraphError::UnknownArchitecture(name.to_string()))?;
        let defs = if expand { expand_all(&defs) } else { defs };
        debug!(architecture = name, layers = defs.len(); "插入预定义网络");
        Ok(self.insert_chain(defs, (0.0, 0.0)))
    }

    fn insert_chain(&mut self, defs: Vec<LayerDef>, position: (f64, f64)) -> Vec<LayerId> {
        let uids: Vec<LayerId> = defs
            .into_iter()
            .map(|def| self.add_layer(def, position))
            .collect();
        for pair in uids.windows(2) {
            self.push_connection(pair[0], pair[1]);
        }
        uids
    }

    /// 删除一个层，并清除所有指向它的连接及其在序列中的位置
    pub fn remove_layer(&mut self, uid: LayerId) -> Result<LayerNode, GraphError> {
        let removed = self.nodes.remove(&uid).ok_or(GraphError::NodeNotFound(uid))?;
        for node in self.nodes.values_mut() {
            node.connections.retain(|&target| target != uid);
        }
        self.sequence.retain(|&id| id != uid);
        Ok(removed)
    }

    /// 清空画布（uid 计数器保留，旧 uid 不会被复用）
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.sequence.clear();
    }

    // ========== 参数编辑 ==========

    /// 设置某个层的参数，返回旧值
    pub fn set_param(
        &mut self,
        uid: LayerId,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<Option<ParamValue>, GraphError> {
        let node = self.nodes.get_mut(&uid).ok_or(GraphError::NodeNotFound(uid))?;
        Ok(node.params.insert(key, value))
    }

    /// 整体替换某个层的参数
    pub fn replace_params(&mut self, uid: LayerId, params: LayerParams) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&uid).ok_or(GraphError::NodeNotFound(uid))?;
        node.params = params;
        Ok(())
    }

    /// 设置某个层的画布坐标（不影响序列，见 `recompute_sequence_from_positions`）
    pub fn set_position(&mut self, uid: LayerId, position: (f64, f64)) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&uid).ok_or(GraphError::NodeNotFound(uid))?;
        node.position = position;
        Ok(())
    }

    // ========== 连接编辑 ==========

    /// 添加连接 src -> tgt
    pub fn connect(&mut self, src: LayerId, tgt: LayerId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&tgt) {
            return Err(GraphError::NodeNotFound(tgt));
        }
        if src == tgt {
            return Err(GraphError::SelfLoop(src));
        }
        let node = self.nodes.get_mut(&src).ok_or(GraphError::NodeNotFound(src))?;
        if node.connections.contains(&tgt) {
            return Err(GraphError::DuplicateConnection { src, tgt });
        }
        node.connections.push(tgt);
        Ok(())
    }

    /// 删除连接 src -> tgt，返回连接是否存在
    pub fn disconnect(&mut self, src: LayerId, tgt: LayerId) -> Result<bool, GraphError> {
        let node = self.nodes.get_mut(&src).ok_or(GraphError::NodeNotFound(src))?;
        let before = node.connections.len();
        node.connections.retain(|&target| target != tgt);
        Ok(node.connections.len() != before)
    }

    pub fn clear_connections(&mut self) {
        for node in self.nodes.values_mut() {
            node.connections.clear();
        }
    }

    /// 已知两端都存在且不同的情况下追加连接（重复时忽略）
    fn push_connection(&mut self, src: LayerId, tgt: LayerId) {
        if src == tgt || !self.nodes.contains_key(&tgt) {
            return;
        }
        if let Some(node) = self.nodes.get_mut(&src) {
            if !node.connections.contains(&tgt) {
                node.connections.push(tgt);
            }
        }
    }

    /// 清空所有连接，按序列重建 `sequence[i] -> sequence[i+1]` 的链，然后校验
    ///
    /// 至少需要两个层；序列中缺失的 uid 两侧不连接，交给校验报告。
    pub fn connect_in_sequence_order(&mut self) -> Result<ValidationReport, GraphError> {
        if self.sequence.len() < 2 {
            return Err(GraphError::NotEnoughLayers {
                required: 2,
                actual: self.sequence.len(),
            });
        }
        self.rebuild_chain();
        Ok(self.validate())
    }

    /// 重新排序：新序列必须是当前序列的一个排列，连接随之重建为链
    pub fn reorder_sequence(&mut self, order: Vec<LayerId>) -> Result<(), GraphError> {
        let mut current = self.sequence.clone();
        let mut proposed = order.clone();
        current.sort();
        proposed.sort();
        if current != proposed {
            return Err(GraphError::InvalidSequence);
        }
        self.sequence = order;
        self.rebuild_chain();
        Ok(())
    }

    fn rebuild_chain(&mut self) {
        self.clear_connections();
        let sequence = self.sequence.clone();
        for pair in sequence.windows(2) {
            self.push_connection(pair[0], pair[1]);
        }
    }
}

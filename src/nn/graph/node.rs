/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 层节点（LayerNode）及其标识（LayerId）
 */

use crate::nn::display::params_short;
use crate::nn::{LayerDef, LayerParams, LayerType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 层节点 ID（会话内单调递增，永不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 画布上的一个层
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    uid: LayerId,
    pub layer_type: LayerType,
    pub params: LayerParams,
    /// 画布坐标 (x, y)，只用于显示与持久化，与校验无关
    pub position: (f64, f64),
    /// 出边目标（有序、无重复、无自环；由 ConnectionGraph 的编辑方法维护）
    pub(in crate::nn) connections: Vec<LayerId>,
}

impl LayerNode {
    pub(in crate::nn) fn new(uid: LayerId, def: LayerDef, position: (f64, f64)) -> Self {
        Self {
            uid,
            layer_type: def.layer_type,
            params: def.params,
            position,
            connections: Vec::new(),
        }
    }

    pub const fn uid(&self) -> LayerId {
        self.uid
    }

    pub fn connections(&self) -> &[LayerId] {
        &self.connections
    }

    pub fn is_connected_to(&self, target: LayerId) -> bool {
        self.connections.contains(&target)
    }

    /// 去掉 uid/位置/连接后的层定义
    pub fn to_def(&self) -> LayerDef {
        LayerDef::new(self.layer_type.clone(), self.params.clone())
    }

    /// 序列列表中的显示名，如 `Conv2d #3`
    pub fn label(&self) -> String {
        format!("{} #{}", self.layer_type, self.uid)
    }

    /// 画布节点上的两行文字：类型 + 参数摘要
    pub fn display_text(&self) -> String {
        format!("{}\n{}", self.layer_type, params_short(&self.params))
    }
}

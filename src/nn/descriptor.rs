/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 设计文档（Design Document）：连接图的持久化形式
 *
 * ```json
 * {
 *   "layers": [
 *     {"uid": 1, "type": "Linear", "params": {"in_features": 10, "out_features": 5},
 *      "pos": [50.0, 50.0], "connections": [2]}
 *   ],
 *   "sequence": [1, 2]
 * }
 * ```
 */

use crate::nn::{LayerParams, LayerType};
use serde::{Deserialize, Serialize};

/// 设计文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// 所有层
    pub layers: Vec<LayerRecord>,
    /// 执行序列（uid 列表）
    #[serde(default)]
    pub sequence: Vec<u64>,
}

/// 单个层的持久化记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub uid: u64,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub params: LayerParams,
    /// 画布坐标
    #[serde(default)]
    pub pos: [f64; 2],
    /// 出边目标 uid
    #[serde(default)]
    pub connections: Vec<u64>,
}

impl DesignDocument {
    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

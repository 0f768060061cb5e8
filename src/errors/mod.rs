/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 设计器各环节的错误类型
 *
 * - ValidationError：网络结构校验失败（结构/形状/环），可由用户编辑图后恢复
 * - GraphError：图编辑操作失败（节点不存在、自环、重复连接等）
 * - PersistenceError：设计文档读写失败（I/O、格式错误），加载失败时图保持不变
 * - CatalogError：层目录（catalog）加载失败
 */

use crate::nn::{LayerId, LayerType};
use thiserror::Error;
mod kind;
pub use self::kind::ErrorKind;

/// 网络结构校验错误（每次校验只报告第一个违规项）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("没有任何层（no layers）")]
    Empty,

    // ========== 结构错误 ==========
    #[error("序列中的层 UID {uid} 不存在")]
    MissingLayer { uid: LayerId },
    #[error("{owner_type} #{owner} 的连接目标 UID {target} 不存在")]
    DanglingConnection {
        owner_type: LayerType,
        owner: LayerId,
        target: LayerId,
    },
    #[error("{src_type} #{src} 与 {tgt_type} #{tgt} 未连接（not connected）")]
    NotConnected {
        src_type: LayerType,
        src: LayerId,
        tgt_type: LayerType,
        tgt: LayerId,
    },
    #[error("{layer_type} #{uid} 没有输出连接（layer has no outgoing connection）")]
    DanglingTail { layer_type: LayerType, uid: LayerId },

    // ========== 形状错误 ==========
    #[error(
        "Linear #{src} 的 out_features 与 Linear #{tgt} 的 in_features 不匹配：{out_features} != {in_features}"
    )]
    FeatureMismatch {
        src: LayerId,
        tgt: LayerId,
        out_features: i64,
        in_features: i64,
    },
    #[error(
        "{src_type} #{src} 的 out_channels 与 {tgt_type} #{tgt} 的 in_channels 不匹配：{out_channels} != {in_channels}"
    )]
    ChannelMismatch {
        src_type: LayerType,
        src: LayerId,
        tgt_type: LayerType,
        tgt: LayerId,
        out_channels: i64,
        in_channels: i64,
    },
    #[error("{src_type} #{src} 与 Linear #{tgt} 之间需要 Flatten（Flatten required between Conv2d and Linear）")]
    FlattenRequired {
        src_type: LayerType,
        src: LayerId,
        tgt: LayerId,
    },
    #[error("{layer_type} #{uid} 缺少整数参数 {key}（missing {key}）")]
    MissingParam {
        layer_type: LayerType,
        uid: LayerId,
        key: &'static str,
    },

    // ========== 环 ==========
    #[error("检测到环（cycle detected），经过 {layer_type} #{uid}")]
    CycleDetected { layer_type: LayerType, uid: LayerId },
}

impl ValidationError {
    /// 错误所属类别（供 UI 决定提示方式）
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty
            | Self::MissingLayer { .. }
            | Self::DanglingConnection { .. }
            | Self::NotConnected { .. }
            | Self::DanglingTail { .. } => ErrorKind::Structural,
            Self::FeatureMismatch { .. }
            | Self::ChannelMismatch { .. }
            | Self::FlattenRequired { .. }
            | Self::MissingParam { .. } => ErrorKind::ShapeMismatch,
            Self::CycleDetected { .. } => ErrorKind::Cycle,
        }
    }
}

/// 图编辑操作错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("层 #{0} 不存在")]
    NodeNotFound(LayerId),
    #[error("层 #{0} 不能连接到自身")]
    SelfLoop(LayerId),
    #[error("层 #{src} 已连接到 #{tgt}")]
    DuplicateConnection { src: LayerId, tgt: LayerId },
    #[error("未知的层类型: {0}")]
    UnknownLayerType(String),
    #[error("未知的预定义网络: {0}")]
    UnknownArchitecture(String),
    #[error("至少需要 {required} 个层，当前只有 {actual} 个")]
    NotEnoughLayers { required: usize, actual: usize },
    #[error("新序列必须是当前序列的一个排列")]
    InvalidSequence,
}

/// 设计文档读写错误
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("读写设计文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("设计文档格式错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("设计文档中 UID {0} 重复")]
    DuplicateUid(u64),
    #[error("设计文档中层 #{uid} 的连接无效: {reason}")]
    InvalidConnection { uid: u64, reason: &'static str },
}

/// 层目录加载错误
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("读取层目录失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("层目录格式错误: {0}")]
    Json(#[from] serde_json::Error),
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Layer 模块 - 层类型、参数与层定义
 *
 * 这里的“层”只是静态的元信息（类型 + 参数），不持有任何张量，
 * 也不参与数值计算；形状是否一致由 validate 模块根据参数推断。
 */

mod catalog;
mod composite;
mod param;
pub mod predefined;

pub use catalog::{CatalogEntry, LayerCatalog};
pub use composite::{
    Composite, CompositeModule, Inception, MAX_REPEATS, ResidualBlock, expand_all, expand_definition,
};
pub use param::{LayerParams, ParamValue};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 层类型
///
/// 序列化为纯字符串（如 `"Conv2d"`）；目录中不认识的名字保存在 `Custom` 中，
/// 以便加载任意设计文档而不丢失信息。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerType {
    Linear,
    Conv2d,
    ReLU,
    Flatten,
    Dropout,
    BatchNorm2d,
    MaxPool2d,
    AvgPool2d,
    LSTM,
    /// 复合模块占位符：残差块
    ResidualBlock,
    /// 复合模块占位符：Inception 模块
    Inception,
    AdaptiveAvgPool2d,
    Custom(String),
}

impl LayerType {
    /// 所有内置层类型（按调色板顺序）
    pub fn builtin() -> [LayerType; 12] {
        [
            Self::Linear,
            Self::Conv2d,
            Self::ReLU,
            Self::Flatten,
            Self::Dropout,
            Self::BatchNorm2d,
            Self::MaxPool2d,
            Self::AvgPool2d,
            Self::LSTM,
            Self::ResidualBlock,
            Self::Inception,
            Self::AdaptiveAvgPool2d,
        ]
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Linear => "Linear",
            Self::Conv2d => "Conv2d",
            Self::ReLU => "ReLU",
            Self::Flatten => "Flatten",
            Self::Dropout => "Dropout",
            Self::BatchNorm2d => "BatchNorm2d",
            Self::MaxPool2d => "MaxPool2d",
            Self::AvgPool2d => "AvgPool2d",
            Self::LSTM => "LSTM",
            Self::ResidualBlock => "ResidualBlock",
            Self::Inception => "Inception",
            Self::AdaptiveAvgPool2d => "AdaptiveAvgPool2d",
            Self::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::builtin()
            .into_iter()
            .find(|t| t.name() == name)
            .unwrap_or_else(|| Self::Custom(name.to_string()))
    }

    /// 是否为需要展开的复合模块占位符
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::ResidualBlock | Self::Inception)
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for LayerType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<&str> for LayerType {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<LayerType> for String {
    fn from(layer_type: LayerType) -> Self {
        layer_type.name().to_string()
    }
}

/// 层定义：类型 + 参数（不含 uid、位置、连接）
///
/// 复合模块展开、预定义网络、层目录实例化都以它为单位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    #[serde(default)]
    pub params: LayerParams,
}

impl LayerDef {
    pub fn new(layer_type: impl Into<LayerType>, params: LayerParams) -> Self {
        Self {
            layer_type: layer_type.into(),
            params,
        }
    }

    pub fn conv2d(in_channels: i64, out_channels: i64, kernel_size: i64, stride: i64, padding: i64) -> Self {
        Self::new(
            LayerType::Conv2d,
            crate::layer_params! {
                "in_channels" => in_channels,
                "out_channels" => out_channels,
                "kernel_size" => kernel_size,
                "stride" => stride,
                "padding" => padding,
            },
        )
    }

    pub fn batch_norm2d(num_features: i64) -> Self {
        Self::new(
            LayerType::BatchNorm2d,
            crate::layer_params! { "num_features" => num_features },
        )
    }

    pub fn relu() -> Self {
        Self::new(LayerType::ReLU, LayerParams::new())
    }

    pub fn max_pool2d(kernel_size: i64, stride: i64, padding: i64) -> Self {
        Self::new(
            LayerType::MaxPool2d,
            crate::layer_params! {
                "kernel_size" => kernel_size,
                "stride" => stride,
                "padding" => padding,
            },
        )
    }
}

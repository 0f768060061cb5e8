/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 层目录（Layer Catalog）：层类型 -> 类名、默认参数、显示标签
 *
 * 纯数据表，由调用方注入（内置表或 JSON 配置），校验器与展开器都不持有它。
 */

use super::{LayerDef, LayerParams, LayerType};
use crate::errors::CatalogError;
use crate::layer_params;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// 导出代码时使用的类名（如 `nn.Conv2d`、`ResidualBlock`）
    pub class_name: String,
    /// 新建该层时的默认参数（顺序即导出时关键字参数的顺序）
    #[serde(default)]
    pub default_params: LayerParams,
    /// 调色板中的提示文字
    #[serde(default)]
    pub display_label: String,
}

impl CatalogEntry {
    pub fn new(class_name: &str, default_params: LayerParams, display_label: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            default_params,
            display_label: display_label.to_string(),
        }
    }
}

/// 层目录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerCatalog {
    entries: BTreeMap<LayerType, CatalogEntry>,
}

impl LayerCatalog {
    /// 空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置目录（覆盖所有内置层类型）
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog
            .with_entry(
                LayerType::Linear,
                CatalogEntry::new(
                    "nn.Linear",
                    layer_params! { "in_features" => 128, "out_features" => 64, "bias" => true },
                    "Linear(in,out)",
                ),
            )
            .with_entry(
                LayerType::Conv2d,
                CatalogEntry::new(
                    "nn.Conv2d",
                    layer_params! {
                        "in_channels" => 3,
                        "out_channels" => 16,
                        "kernel_size" => 3,
                        "stride" => 1,
                        "padding" => 0,
                        "bias" => true,
                    },
                    "Conv2d(Cin,Cout,k)",
                ),
            )
            .with_entry(
                LayerType::ReLU,
                CatalogEntry::new("nn.ReLU", layer_params! { "inplace" => false }, "ReLU()"),
            )
            .with_entry(
                LayerType::Flatten,
                CatalogEntry::new(
                    "nn.Flatten",
                    layer_params! { "start_dim" => 1, "end_dim" => -1 },
                    "Flatten()",
                ),
            )
            .with_entry(
                LayerType::Dropout,
                CatalogEntry::new(
                    "nn.Dropout",
                    layer_params! { "p" => 0.5, "inplace" => false },
                    "Dropout(p)",
                ),
            )
            .with_entry(
                LayerType::BatchNorm2d,
                CatalogEntry::new(
                    "nn.BatchNorm2d",
                    layer_params! { "num_features" => 16 },
                    "BatchNorm2d(num_features)",
                ),
            )
            .with_entry(
                LayerType::MaxPool2d,
                CatalogEntry::new(
                    "nn.MaxPool2d",
                    layer_params! { "kernel_size" => 2, "stride" => 2 },
                    "MaxPool2d(k)",
                ),
            )
            .with_entry(
                LayerType::AvgPool2d,
                CatalogEntry::new(
                    "nn.AvgPool2d",
                    layer_params! { "kernel_size" => 2, "stride" => 2 },
                    "AvgPool2d(k)",
                ),
            )
            .with_entry(
                LayerType::LSTM,
                CatalogEntry::new(
                    "nn.LSTM",
                    layer_params! {
                        "input_size" => 128,
                        "hidden_size" => 64,
                        "num_layers" => 1,
                        "batch_first" => true,
                    },
                    "LSTM(in,hidden)",
                ),
            )
            .with_entry(
                LayerType::ResidualBlock,
                CatalogEntry::new(
                    "ResidualBlock",
                    layer_params! {
                        "in_channels" => 64,
                        "out_channels" => 64,
                        "stride" => 1,
                        "repeats" => 2,
                    },
                    "ResidualBlock(in,out,stride,repeats)",
                ),
            )
            .with_entry(
                LayerType::Inception,
                CatalogEntry::new(
                    "Inception",
                    layer_params! {
                        "in_channels" => 192,
                        "out_1x1" => 64,
                        "out_3x3_reduce" => 96,
                        "out_3x3" => 128,
                        "out_5x5_reduce" => 16,
                        "out_5x5" => 32,
                        "out_pool_proj" => 32,
                    },
                    "Inception(...)",
                ),
            )
            .with_entry(
                LayerType::AdaptiveAvgPool2d,
                CatalogEntry::new(
                    "nn.AdaptiveAvgPool2d",
                    layer_params! { "output_size" => (1, 1) },
                    "AdaptiveAvgPool2d(out)",
                ),
            );
        catalog
    }

    /// 从 JSON 解析目录：`{type_name: {class_name, default_params, display_label}}`
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, CatalogEntry> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        catalog.entries = raw
            .into_iter()
            .map(|(name, entry)| (LayerType::from_name(&name), entry))
            .collect();
        Ok(catalog)
    }

    /// 从 JSON 文件加载目录
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// 以另一份目录覆盖/补充本目录（同名条目以 `other` 为准）
    pub fn merge(&mut self, other: LayerCatalog) -> &mut Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn with_entry(&mut self, layer_type: LayerType, entry: CatalogEntry) -> &mut Self {
        self.entries.insert(layer_type, entry);
        self
    }

    pub fn entry(&self, layer_type: &LayerType) -> Option<&CatalogEntry> {
        self.entries.get(layer_type)
    }

    pub fn contains(&self, layer_type: &LayerType) -> bool {
        self.entries.contains_key(layer_type)
    }

    /// 所有条目的类型（调色板顺序）
    pub fn layer_types(&self) -> impl Iterator<Item = &LayerType> {
        self.entries.keys()
    }

    /// 所有条目的类型名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(LayerType::name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 以默认参数实例化一个层定义；目录中没有该类型时返回 None
    pub fn instantiate(&self, layer_type: &LayerType) -> Option<LayerDef> {
        self.entry(layer_type)
            .map(|entry| LayerDef::new(layer_type.clone(), entry.default_params.clone()))
    }

    /// 导出代码使用的类名；目录中没有该类型时回退为 `nn.<类型名>`
    pub fn class_name(&self, layer_type: &LayerType) -> String {
        self.entry(layer_type).map_or_else(
            || format!("nn.{}", layer_type.name()),
            |entry| entry.class_name.clone(),
        )
    }
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 设计器配置：自动布局、代码导出、加载行为
 *
 * 所有字段都有默认值，JSON 中缺省的字段取默认值。
 */

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 设计器整体配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    pub layout: LayoutConfig,
    pub export: ExportConfig,
    /// 加载设计文档后是否按序列重新网格布局
    pub auto_layout_on_load: bool,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            export: ExportConfig::default(),
            auto_layout_on_load: true,
        }
    }
}

impl DesignerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 从 JSON 文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, crate::errors::PersistenceError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&json)?)
    }
}

/// 网格布局：第 i 个层放在 (x_offset, y_offset + i * y_gap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub x_offset: f64,
    pub y_offset: f64,
    pub y_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_offset: 50.0,
            y_offset: 50.0,
            y_gap: 100.0,
        }
    }
}

/// 代码导出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 生成的模块类名
    pub class_name: String,
    /// 是否生成 `if __name__ == '__main__':` 冒烟测试段
    pub smoke_test: bool,
    /// 首层为卷积类时，猜测的输入图像高宽
    pub image_size: (usize, usize),
    /// 首层既无 in_channels 也无 in_features 时使用的输入特征数
    pub default_features: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            class_name: "Net".to_string(),
            smoke_test: true,
            image_size: (224, 224),
            default_features: 128,
        }
    }
}

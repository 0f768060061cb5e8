/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 复合模块（ResidualBlock / Inception）展开器
 *
 * 复合模块在画布上是一个占位节点，展开后变为一串基本层，后续流程（校验、导出）无需特殊处理。
 *
 * 注意：当前图模型只有线性序列，无法表达分支与跳跃连接，因此展开是有损近似：
 * - ResidualBlock：只保留主路径的卷积序列，跳跃相加（skip-add）不建模
 * - Inception：四个并行分支依次串接，分支合并（concat）不建模
 */

use super::{LayerDef, LayerParams, LayerType};
use crate::layer_params;
use enum_dispatch::enum_dispatch;
use log::debug;

/// 复合模块能力接口：展开为基本层序列，或折叠回占位定义
#[enum_dispatch]
pub trait CompositeModule {
    /// 展开为基本层定义序列（首层输入 = 模块输入，末层输出 = 模块输出）
    fn expand(&self) -> Vec<LayerDef>;
    /// 折叠为占位定义
    fn collapse(&self) -> LayerDef;
    /// 模块声明的输入通道数
    fn in_channels(&self) -> i64;
    /// 模块声明的输出通道数
    fn out_channels(&self) -> i64;
}

/// 所有已知的复合模块
#[enum_dispatch(CompositeModule)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composite {
    ResidualBlock,
    Inception,
}

impl Composite {
    /// 若定义是可识别的复合模块则解析出来，否则返回 None
    ///
    /// 参数缺失时取目录默认值；参数存在但不是正整数时视为无法识别。
    pub fn from_def(def: &LayerDef) -> Option<Self> {
        match def.layer_type {
            LayerType::ResidualBlock => ResidualBlock::from_params(&def.params).map(Into::into),
            LayerType::Inception => Inception::from_params(&def.params).map(Into::into),
            _ => None,
        }
    }
}

/// ResidualBlock 允许的最大重复次数，超出视为无法识别
pub const MAX_REPEATS: i64 = 64;

/// 读取尺寸类参数
fn size_param(params: &LayerParams, key: &str, default: i64) -> Option<i64> {
    match params.get(key) {
        None => Some(default),
        Some(value) => value.as_int().filter(|&n| n > 0),
    }
}

/// 残差块（主路径近似）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualBlock {
    pub in_channels: i64,
    pub out_channels: i64,
    pub stride: i64,
    pub repeats: i64,
}

impl ResidualBlock {
    pub fn from_params(params: &LayerParams) -> Option<Self> {
        Some(Self {
            in_channels: size_param(params, "in_channels", 64)?,
            out_channels: size_param(params, "out_channels", 64)?,
            stride: size_param(params, "stride", 1)?,
            repeats: size_param(params, "repeats", 2).filter(|&n| n <= MAX_REPEATS)?,
        })
    }
}

impl CompositeModule for ResidualBlock {
    fn expand(&self) -> Vec<LayerDef> {
        let out = self.out_channels;
        let repeats = self.repeats.clamp(0, MAX_REPEATS);
        let mut layers = Vec::with_capacity(6 * repeats as usize);
        let (mut in_channels, mut stride) = (self.in_channels, self.stride);
        for _ in 0..repeats {
            layers.push(LayerDef::conv2d(in_channels, out, 3, stride, 1));
            layers.push(LayerDef::batch_norm2d(out));
            layers.push(LayerDef::relu());
            layers.push(LayerDef::conv2d(out, out, 3, 1, 1));
            layers.push(LayerDef::batch_norm2d(out));
            layers.push(LayerDef::relu());
            // 第一次重复之后：步长恢复为 1，输入通道等于输出通道
            in_channels = out;
            stride = 1;
        }
        layers
    }

    fn collapse(&self) -> LayerDef {
        LayerDef::new(
            LayerType::ResidualBlock,
            layer_params! {
                "in_channels" => self.in_channels,
                "out_channels" => self.out_channels,
                "stride" => self.stride,
                "repeats" => self.repeats,
            },
        )
    }

    fn in_channels(&self) -> i64 {
        self.in_channels
    }

    fn out_channels(&self) -> i64 {
        self.out_channels
    }
}

/// Inception 模块（四分支串接近似）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inception {
    pub in_channels: i64,
    pub out_1x1: i64,
    pub out_3x3_reduce: i64,
    pub out_3x3: i64,
    pub out_5x5_reduce: i64,
    pub out_5x5: i64,
    pub out_pool_proj: i64,
}

impl Inception {
    pub fn from_params(params: &LayerParams) -> Option<Self> {
        let inception = Self {
            in_channels: size_param(params, "in_channels", 192)?,
            out_1x1: size_param(params, "out_1x1", 64)?,
            out_3x3_reduce: size_param(params, "out_3x3_reduce", 96)?,
            out_3x3: size_param(params, "out_3x3", 128)?,
            out_5x5_reduce: size_param(params, "out_5x5_reduce", 16)?,
            out_5x5: size_param(params, "out_5x5", 32)?,
            out_pool_proj: size_param(params, "out_pool_proj", 32)?,
        };
        // 拼接后的通道数溢出时视为无法识别
        inception.checked_out_channels()?;
        Some(inception)
    }

    fn checked_out_channels(&self) -> Option<i64> {
        self.out_1x1
            .checked_add(self.out_3x3)?
            .checked_add(self.out_5x5)?
            .checked_add(self.out_pool_proj)
    }
}

impl CompositeModule for Inception {
    fn expand(&self) -> Vec<LayerDef> {
        let c = self.in_channels;
        vec![
            // 分支 1：1x1
            LayerDef::conv2d(c, self.out_1x1, 1, 1, 0),
            // 分支 2：1x1 降维 -> 3x3
            LayerDef::conv2d(c, self.out_3x3_reduce, 1, 1, 0),
            LayerDef::conv2d(self.out_3x3_reduce, self.out_3x3, 3, 1, 1),
            // 分支 3：1x1 降维 -> 5x5
            LayerDef::conv2d(c, self.out_5x5_reduce, 1, 1, 0),
            LayerDef::conv2d(self.out_5x5_reduce, self.out_5x5, 5, 1, 2),
            // 分支 4：3x3 池化 -> 1x1 投影
            LayerDef::max_pool2d(3, 1, 1),
            LayerDef::conv2d(c, self.out_pool_proj, 1, 1, 0),
        ]
    }

    fn collapse(&self) -> LayerDef {
        LayerDef::new(
            LayerType::Inception,
            layer_params! {
                "in_channels" => self.in_channels,
                "out_1x1" => self.out_1x1,
                "out_3x3_reduce" => self.out_3x3_reduce,
                "out_3x3" => self.out_3x3,
                "out_5x5_reduce" => self.out_5x5_reduce,
                "out_5x5" => self.out_5x5,
                "out_pool_proj" => self.out_pool_proj,
            },
        )
    }

    fn in_channels(&self) -> i64 {
        self.in_channels
    }

    /// 四个分支拼接后的通道数
    fn out_channels(&self) -> i64 {
        self.checked_out_channels().unwrap_or(i64::MAX)
    }
}

/// 展开单个层定义
///
/// 复合模块展开为基本层序列；基本层或无法识别的占位符原样返回（单元素列表），
/// 连接是否合理交给后续的网络校验。
pub fn expand_definition(def: &LayerDef) -> Vec<LayerDef> {
    match Composite::from_def(def) {
        Some(composite) => {
            let expanded = composite.expand();
            debug!(layer_type = def.layer_type.name(), count = expanded.len(); "展开复合模块");
            expanded
        }
        None => vec![def.clone()],
    }
}

/// 依次展开一组层定义并拼接
pub fn expand_all(defs: &[LayerDef]) -> Vec<LayerDef> {
    defs.iter().flat_map(expand_definition).collect()
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 预定义网络结构（LeNet-5 / AlexNet / VGG16 / ResNet-18 / GoogLeNet）
 *
 * ResNet-18 与 GoogLeNet 使用 ResidualBlock / Inception 占位符表示，
 * 插入图时可选择是否展开（见 `ConnectionGraph::insert_predefined`）。
 */

use super::{LayerDef, LayerType};
use crate::layer_params;

/// 所有预定义网络的名称
pub const ARCHITECTURES: [&str; 5] = ["LeNet-5", "AlexNet", "VGG16", "ResNet-18", "GoogLeNet"];

pub fn predefined_names() -> &'static [&'static str] {
    &ARCHITECTURES
}

/// 按名称取预定义网络的层定义序列
pub fn predefined(name: &str) -> Option<Vec<LayerDef>> {
    match name {
        "LeNet-5" => Some(lenet5()),
        "AlexNet" => Some(alexnet()),
        "VGG16" => Some(vgg16()),
        "ResNet-18" => Some(resnet18()),
        "GoogLeNet" => Some(googlenet()),
        _ => None,
    }
}

fn conv(in_channels: i64, out_channels: i64, kernel_size: i64) -> LayerDef {
    LayerDef::new(
        LayerType::Conv2d,
        layer_params! {
            "in_channels" => in_channels,
            "out_channels" => out_channels,
            "kernel_size" => kernel_size,
        },
    )
}

fn conv_padded(in_channels: i64, out_channels: i64, kernel_size: i64, padding: i64) -> LayerDef {
    let mut def = conv(in_channels, out_channels, kernel_size);
    def.params.insert("padding", padding);
    def
}

fn conv_strided(in_channels: i64, out_channels: i64, kernel_size: i64, stride: i64, padding: i64) -> LayerDef {
    let mut def = conv(in_channels, out_channels, kernel_size);
    def.params.insert("stride", stride);
    def.params.insert("padding", padding);
    def
}

fn relu() -> LayerDef {
    LayerDef::relu()
}

fn pool(layer_type: LayerType, kernel_size: i64, stride: i64) -> LayerDef {
    LayerDef::new(
        layer_type,
        layer_params! { "kernel_size" => kernel_size, "stride" => stride },
    )
}

fn pool_padded(kernel_size: i64, stride: i64, padding: i64) -> LayerDef {
    LayerDef::max_pool2d(kernel_size, stride, padding)
}

fn flatten() -> LayerDef {
    LayerDef::new(LayerType::Flatten, layer_params! {})
}

fn linear(in_features: i64, out_features: i64) -> LayerDef {
    LayerDef::new(
        LayerType::Linear,
        layer_params! { "in_features" => in_features, "out_features" => out_features },
    )
}

fn dropout(p: f64) -> LayerDef {
    LayerDef::new(LayerType::Dropout, layer_params! { "p" => p })
}

fn adaptive_avg_pool() -> LayerDef {
    LayerDef::new(
        LayerType::AdaptiveAvgPool2d,
        layer_params! { "output_size" => (1, 1) },
    )
}

/// 分类头：Flatten -> Linear -> ReLU -> Dropout -> Linear -> ReLU -> Dropout -> Linear
fn classifier(in_features: i64) -> Vec<LayerDef> {
    vec![
        flatten(),
        linear(in_features, 4096),
        relu(),
        dropout(0.5),
        linear(4096, 4096),
        relu(),
        dropout(0.5),
        linear(4096, 1000),
    ]
}

fn lenet5() -> Vec<LayerDef> {
    vec![
        conv(1, 6, 5),
        relu(),
        pool(LayerType::AvgPool2d, 2, 2),
        conv(6, 16, 5),
        relu(),
        pool(LayerType::AvgPool2d, 2, 2),
        flatten(),
        linear(16 * 4 * 4, 120),
        relu(),
        linear(120, 84),
        relu(),
        linear(84, 10),
    ]
}

fn alexnet() -> Vec<LayerDef> {
    let mut layers = vec![
        conv_strided(3, 96, 11, 4, 0),
        relu(),
        pool(LayerType::MaxPool2d, 3, 2),
        conv_strided(96, 256, 5, 1, 2),
        relu(),
        pool(LayerType::MaxPool2d, 3, 2),
        conv_strided(256, 384, 3, 1, 1),
        relu(),
        conv_strided(384, 384, 3, 1, 1),
        relu(),
        conv_strided(384, 256, 3, 1, 1),
        relu(),
        pool(LayerType::MaxPool2d, 3, 2),
    ];
    layers.extend(classifier(256 * 6 * 6));
    layers
}

fn vgg16() -> Vec<LayerDef> {
    // (输出通道, 卷积层数) 的五个阶段
    let stages: [(i64, usize); 5] = [(64, 2), (128, 2), (256, 3), (512, 3), (512, 3)];
    let mut layers = Vec::new();
    let mut in_channels = 3;
    for (out_channels, convs) in stages {
        for _ in 0..convs {
            layers.push(conv_padded(in_channels, out_channels, 3, 1));
            layers.push(relu());
            in_channels = out_channels;
        }
        layers.push(pool(LayerType::MaxPool2d, 2, 2));
    }
    layers.extend(classifier(512 * 7 * 7));
    layers
}

fn residual_block(in_channels: i64, out_channels: i64, stride: i64) -> LayerDef {
    LayerDef::new(
        LayerType::ResidualBlock,
        layer_params! {
            "in_channels" => in_channels,
            "out_channels" => out_channels,
            "stride" => stride,
            "repeats" => 2,
        },
    )
}

fn resnet18() -> Vec<LayerDef> {
    vec![
        conv_strided(3, 64, 7, 2, 3),
        LayerDef::batch_norm2d(64),
        relu(),
        pool_padded(3, 2, 1),
        residual_block(64, 64, 1),
        residual_block(64, 128, 2),
        residual_block(128, 256, 2),
        residual_block(256, 512, 2),
        adaptive_avg_pool(),
        flatten(),
        linear(512, 1000),
    ]
}

/// Inception 参数顺序：in, 1x1, 3x3_reduce, 3x3, 5x5_reduce, 5x5, pool_proj
fn inception(widths: [i64; 7]) -> LayerDef {
    let [in_channels, out_1x1, out_3x3_reduce, out_3x3, out_5x5_reduce, out_5x5, out_pool_proj] = widths;
    LayerDef::new(
        LayerType::Inception,
        layer_params! {
            "in_channels" => in_channels,
            "out_1x1" => out_1x1,
            "out_3x3_reduce" => out_3x3_reduce,
            "out_3x3" => out_3x3,
            "out_5x5_reduce" => out_5x5_reduce,
            "out_5x5" => out_5x5,
            "out_pool_proj" => out_pool_proj,
        },
    )
}

fn googlenet() -> Vec<LayerDef> {
    vec![
        conv_strided(3, 64, 7, 2, 3),
        relu(),
        pool_padded(3, 2, 1),
        conv(64, 64, 1),
        conv_padded(64, 192, 3, 1),
        pool_padded(3, 2, 1),
        inception([192, 64, 96, 128, 16, 32, 32]),
        inception([256, 128, 128, 192, 32, 96, 64]),
        pool_padded(3, 2, 1),
        inception([480, 192, 96, 208, 16, 48, 64]),
        inception([512, 160, 112, 224, 24, 64, 64]),
        inception([512, 128, 128, 256, 24, 64, 64]),
        inception([512, 112, 144, 288, 32, 64, 64]),
        inception([528, 256, 160, 320, 32, 128, 128]),
        pool_padded(3, 2, 1),
        inception([832, 256, 160, 320, 32, 128, 128]),
        inception([832, 384, 192, 384, 48, 128, 128]),
        adaptive_avg_pool(),
        flatten(),
        linear(1024, 1000),
    ]
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 代码导出：按序列把连接图转换为 PyTorch 模块源码
 *
 * 输出骨架：
 * ```python
 * import torch
 * import torch.nn as nn
 *
 * class Net(nn.Module):
 *     def __init__(self):
 *         super(Net, self).__init__()
 *         self.l1 = nn.Linear(in_features=10, out_features=5)
 *
 *     def forward(self, x):
 *         x = self.l1(x)
 *         return x
 * ```
 * 序列中引用但不存在的层只输出注释，不视为失败。
 */

use crate::nn::{ConnectionGraph, ExportConfig, LayerCatalog, LayerNode, LayerType, ParamValue};
use crate::utils::write_atomic;
use log::{info, warn};
use std::collections::BTreeSet;
use std::path::Path;

const INDENT: &str = "    ";

/// 把参数值写成 Python 字面量
pub fn python_literal(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(true) => "True".to_string(),
        ParamValue::Bool(false) => "False".to_string(),
        ParamValue::Int(v) => v.to_string(),
        ParamValue::Float(v) if v.is_nan() => "float('nan')".to_string(),
        ParamValue::Float(v) if v.is_infinite() => {
            let sign = if *v > 0.0 { "" } else { "-" };
            format!("float('{sign}inf')")
        }
        ParamValue::Float(v) => format!("{v:?}"),
        ParamValue::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        ParamValue::List(items) => match items.as_slice() {
            [single] => format!("({},)", python_literal(single)),
            items => format!(
                "({})",
                items.iter().map(python_literal).collect::<Vec<_>>().join(", ")
            ),
        },
    }
}

/// PyTorch 代码导出器
pub struct CodeExporter<'a> {
    catalog: &'a LayerCatalog,
    config: &'a ExportConfig,
}

impl<'a> CodeExporter<'a> {
    pub const fn new(catalog: &'a LayerCatalog, config: &'a ExportConfig) -> Self {
        Self { catalog, config }
    }

    /// 生成模块源码（空图也会输出完整骨架）
    pub fn export(&self, graph: &ConnectionGraph) -> String {
        let class_name = &self.config.class_name;
        let mut lines: Vec<String> = vec![
            "import torch".to_string(),
            "import torch.nn as nn".to_string(),
            String::new(),
        ];

        let custom: BTreeSet<&str> = graph
            .sequence()
            .iter()
            .filter_map(|&uid| graph.node(uid))
            .filter_map(|node| match &node.layer_type {
                LayerType::Custom(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        if !custom.is_empty() {
            for name in &custom {
                lines.push(format!("# 自定义模块 {name} 需要自行定义或导入"));
            }
            lines.push(String::new());
        }

        lines.push(format!("class {class_name}(nn.Module):"));
        lines.push(format!("{INDENT}def __init__(self):"));
        lines.push(format!("{INDENT}{INDENT}super({class_name}, self).__init__()"));
        let mut skipped = 0_usize;
        for &uid in graph.sequence() {
            match graph.node(uid) {
                Some(node) => lines.push(format!("{INDENT}{INDENT}{}", self.constructor(node))),
                None => {
                    skipped += 1;
                    lines.push(format!("{INDENT}{INDENT}# WARNING: layer uid {uid} not found (skipped)"));
                }
            }
        }
        if skipped > 0 {
            warn!(skipped = skipped; "导出时跳过了不存在的层");
        }

        lines.push(String::new());
        lines.push(format!("{INDENT}def forward(self, x):"));
        for &uid in graph.sequence() {
            if graph.contains(uid) {
                lines.push(format!("{INDENT}{INDENT}x = self.l{uid}(x)"));
            } else {
                lines.push(format!("{INDENT}{INDENT}# skipped missing layer {uid}"));
            }
        }
        lines.push(format!("{INDENT}{INDENT}return x"));

        if self.config.smoke_test {
            lines.push(String::new());
            lines.push("if __name__ == '__main__':".to_string());
            lines.push(format!("{INDENT}model = {class_name}()"));
            lines.push(format!("{INDENT}y = model(torch.randn{})", self.input_shape(graph)));
            lines.push(format!("{INDENT}print(y.shape)"));
        }

        let mut code = lines.join("\n");
        code.push('\n');
        code
    }

    /// 生成源码并写入文件
    pub fn export_to_file<P: AsRef<Path>>(&self, graph: &ConnectionGraph, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        let code = self.export(graph);
        write_atomic(path, code.as_bytes())?;
        info!(layers = graph.sequence().len(); "代码已导出: {}", path.display());
        Ok(())
    }

    fn constructor(&self, node: &LayerNode) -> String {
        let args = node
            .params
            .iter()
            .map(|(key, value)| format!("{key}={}", python_literal(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "self.l{} = {}({args})",
            node.uid(),
            self.catalog.class_name(&node.layer_type)
        )
    }

    /// 根据序列首层猜测冒烟测试的输入形状
    fn input_shape(&self, graph: &ConnectionGraph) -> String {
        let first = graph.sequence().iter().find_map(|&uid| graph.node(uid));
        let (height, width) = self.config.image_size;
        if let Some(channels) = first.and_then(|n| n.params.get_int("in_channels")) {
            return format!("(1, {channels}, {height}, {width})");
        }
        if let Some(features) = first.and_then(|n| n.params.get_int("in_features")) {
            return format!("(1, {features})");
        }
        format!("(1, {})", self.config.default_features)
    }
}

impl ConnectionGraph {
    /// 以给定目录与配置导出 PyTorch 源码
    pub fn export_code(&self, catalog: &LayerCatalog, config: &ExportConfig) -> String {
        CodeExporter::new(catalog, config).export(self)
    }
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 层参数摘要与连接图摘要（summary）的文本格式化
 */

use crate::nn::{ConnectionGraph, LayerParams};

/// 参数摘要（画布节点上的第二行文字）
///
/// - Linear：`in→out`
/// - Conv2d 类：`Cin→Cout k=K`（缺 kernel_size 时按 3 显示）
/// - Dropout：`p=0.5`
/// - 其他：前两个参数 `k=v, k=v`
pub fn params_short(params: &LayerParams) -> String {
    if let (Some(i), Some(o)) = (params.get("in_features"), params.get("out_features")) {
        return format!("{i}→{o}");
    }
    if let (Some(i), Some(o)) = (params.get("in_channels"), params.get("out_channels")) {
        let k = params
            .get("kernel_size")
            .map_or_else(|| "3".to_string(), ToString::to_string);
        return format!("{i}→{o} k={k}");
    }
    if let Some(p) = params.get("p") {
        return format!("p={p}");
    }
    params
        .iter()
        .take(2)
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn pad(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(display_width(s))))
}

impl ConnectionGraph {
    /// 按序列顺序生成的摘要行：(uid, 类型, 参数摘要, 出边)
    fn summary_rows(&self) -> Vec<[String; 4]> {
        self.sequence
            .iter()
            .map(|uid| match self.nodes.get(uid) {
                Some(node) => [
                    uid.to_string(),
                    node.layer_type.to_string(),
                    params_short(&node.params),
                    node.connections
                        .iter()
                        .map(|t| format!("#{t}"))
                        .collect::<Vec<_>>()
                        .join(", "),
                ],
                None => [uid.to_string(), "<缺失>".to_string(), "-".to_string(), "-".to_string()],
            })
            .collect()
    }

    /// 返回连接图摘要字符串（Unicode 文本表格）
    pub fn summary_string(&self) -> String {
        let header = ["UID", "类型", "参数", "连接"];
        let rows = self.summary_rows();
        let widths: Vec<usize> = (0..4)
            .map(|col| {
                rows.iter()
                    .map(|row| display_width(&row[col]))
                    .chain(std::iter::once(display_width(header[col])))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = |left: &str, mid: &str, right: &str| {
            let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", cells.join(mid))
        };
        let line = |cells: &[String]| {
            let cells: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!(" {} ", pad(c, w)))
                .collect();
            format!("│{}│\n", cells.join("│"))
        };

        let mut output = String::new();
        output.push_str(&border("┌", "┬", "┐"));
        output.push_str(&line(&header.map(String::from)));
        output.push_str(&border("├", "┼", "┤"));
        for row in &rows {
            output.push_str(&line(row));
        }
        output.push_str(&border("└", "┴", "┘"));
        output.push_str(&format!("层数: {}  连接数: {}\n", self.len(), self.edges().len()));
        output
    }

    /// 返回连接图摘要的 Markdown 表格
    pub fn summary_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("| UID | 类型 | 参数 | 连接 |\n");
        output.push_str("|-----|------|------|------|\n");
        for [uid, layer_type, params, connections] in self.summary_rows() {
            output.push_str(&format!("| {uid} | {layer_type} | {params} | {connections} |\n"));
        }
        output
    }
}

/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 网络校验器：判断连接图是否为合法、形状一致、无环的层链
 *
 * 按以下顺序检查，返回遇到的第一个违规项：
 * 1. 非空
 * 2. 引用完整性（序列与连接中的 uid 都必须存在）
 * 3. 相邻连接（sequence[i] 必须连接到 sequence[i+1]）
 * 4. 形状/类型兼容（Linear↔Linear、Conv2d↔Conv2d、Conv2d→Flatten→Linear）
 * 5. 环检测（沿 connections 的 DFS）
 * 6. 尾部悬空（除最后一个外，每个层都必须有出边）
 */

use crate::errors::{ErrorKind, ValidationError};
use crate::nn::{Composite, CompositeModule, ConnectionGraph, LayerId, LayerNode, LayerType};
use log::debug;
use std::collections::HashMap;

/// 校验结果（供 UI 直接显示）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub message: String,
    /// 失败时的错误类别
    pub kind: Option<ErrorKind>,
}

impl From<Result<(), ValidationError>> for ValidationReport {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                message: "校验通过".to_string(),
                kind: None,
            },
            Err(e) => Self {
                ok: false,
                message: e.to_string(),
                kind: Some(e.kind()),
            },
        }
    }
}

/// 形状载体：最近一个决定输出尺寸的层
#[derive(Debug, Clone, Copy)]
enum Carrier<'a> {
    /// 序列开头，或经过了无法推断形状的层（LSTM、自定义层）
    Unknown,
    Linear(&'a LayerNode),
    /// Conv2d 或复合模块，附带其声明的输出通道数
    Conv(&'a LayerNode, Option<i64>),
    Flatten,
}

/// 网络校验器
pub struct NetworkValidator<'a> {
    graph: &'a ConnectionGraph,
}

impl<'a> NetworkValidator<'a> {
    pub const fn new(graph: &'a ConnectionGraph) -> Self {
        Self { graph }
    }

    /// 依次执行所有检查
    pub fn check(&self) -> Result<(), ValidationError> {
        let sequence = self.graph.sequence();
        if sequence.is_empty() {
            return Err(ValidationError::Empty);
        }
        let chain = self.check_references()?;
        self.check_adjacency(&chain)?;
        self.check_shapes(&chain)?;
        self.check_cycles()?;
        // 相邻检查通过后此步不会再触发，保留为兜底
        self.check_dangling_tail(&chain)?;
        Ok(())
    }

    /// 步骤 2：返回按序列排列的节点
    fn check_references(&self) -> Result<Vec<&'a LayerNode>, ValidationError> {
        let graph = self.graph;
        let chain = graph
            .sequence()
            .iter()
            .map(|&uid| graph.node(uid).ok_or(ValidationError::MissingLayer { uid }))
            .collect::<Result<Vec<_>, _>>()?;

        for node in graph.nodes() {
            if let Some(&target) = node.connections().iter().find(|&&t| !graph.contains(t)) {
                return Err(ValidationError::DanglingConnection {
                    owner_type: node.layer_type.clone(),
                    owner: node.uid(),
                    target,
                });
            }
        }
        Ok(chain)
    }

    /// 步骤 3
    fn check_adjacency(&self, chain: &[&LayerNode]) -> Result<(), ValidationError> {
        for pair in chain.windows(2) {
            let (src, tgt) = (pair[0], pair[1]);
            if !src.is_connected_to(tgt.uid()) {
                return Err(ValidationError::NotConnected {
                    src_type: src.layer_type.clone(),
                    src: src.uid(),
                    tgt_type: tgt.layer_type.clone(),
                    tgt: tgt.uid(),
                });
            }
        }
        Ok(())
    }

    /// 步骤 4：沿序列推进形状载体，逐对比较
    ///
    /// ReLU/Dropout/池化/BatchNorm 不改变载体；Linear、Conv2d、Flatten、复合模块会成为新的载体。
    fn check_shapes(&self, chain: &[&'a LayerNode]) -> Result<(), ValidationError> {
        let mut carrier = Carrier::Unknown;
        for &node in chain {
            carrier = match &node.layer_type {
                LayerType::Linear => {
                    match carrier {
                        Carrier::Linear(src) => {
                            let out_features = require(src, "out_features")?;
                            let in_features = require(node, "in_features")?;
                            if out_features != in_features {
                                return Err(ValidationError::FeatureMismatch {
                                    src: src.uid(),
                                    tgt: node.uid(),
                                    out_features,
                                    in_features,
                                });
                            }
                        }
                        Carrier::Conv(src, _) => {
                            return Err(ValidationError::FlattenRequired {
                                src_type: src.layer_type.clone(),
                                src: src.uid(),
                                tgt: node.uid(),
                            });
                        }
                        Carrier::Flatten => {
                            require(node, "in_features")?;
                        }
                        Carrier::Unknown => {}
                    }
                    Carrier::Linear(node)
                }
                LayerType::Conv2d => {
                    if let Carrier::Conv(src, out_channels) = carrier {
                        let out_channels = match out_channels {
                            Some(c) => c,
                            None => require(src, "out_channels")?,
                        };
                        let in_channels = require(node, "in_channels")?;
                        check_channels(src, node, out_channels, in_channels)?;
                    }
                    Carrier::Conv(node, node.params.get_int("out_channels"))
                }
                LayerType::ResidualBlock | LayerType::Inception => {
                    // 未展开的复合模块按其声明的输入/输出通道数参与比较
                    let composite = Composite::from_def(&node.to_def());
                    if let (Carrier::Conv(src, out_channels), Some(composite)) = (carrier, &composite) {
                        let out_channels = match out_channels {
                            Some(c) => c,
                            None => require(src, "out_channels")?,
                        };
                        check_channels(src, node, out_channels, composite.in_channels())?;
                    }
                    Carrier::Conv(node, composite.map(|c| c.out_channels()))
                }
                LayerType::Flatten => {
                    if let Carrier::Conv(src, out_channels) = carrier {
                        if out_channels.is_none() {
                            require(src, "out_channels")?;
                        }
                    }
                    Carrier::Flatten
                }
                LayerType::ReLU
                | LayerType::Dropout
                | LayerType::BatchNorm2d
                | LayerType::MaxPool2d
                | LayerType::AvgPool2d
                | LayerType::AdaptiveAvgPool2d => carrier,
                LayerType::LSTM | LayerType::Custom(_) => Carrier::Unknown,
            };
        }
        Ok(())
    }

    /// 步骤 5：三色 DFS（迭代实现），遇到指向栈上节点的回边即为环
    fn check_cycles(&self) -> Result<(), ValidationError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            OnStack,
            Done,
        }

        let graph = self.graph;
        let mut marks: HashMap<LayerId, Mark> = HashMap::new();
        for &start in graph.sequence() {
            if marks.contains_key(&start) {
                continue;
            }
            // 栈元素：(节点, 下一个要访问的出边下标)
            let mut stack: Vec<(LayerId, usize)> = vec![(start, 0)];
            marks.insert(start, Mark::OnStack);
            while let Some((uid, next)) = stack.last_mut() {
                let uid = *uid;
                let targets = graph.node(uid).map_or(&[][..], LayerNode::connections);
                if let Some(&target) = targets.get(*next) {
                    *next += 1;
                    match marks.get(&target) {
                        Some(Mark::OnStack) => {
                            let layer_type = graph
                                .node(target)
                                .map_or_else(|| LayerType::Custom("?".to_string()), |n| n.layer_type.clone());
                            return Err(ValidationError::CycleDetected {
                                layer_type,
                                uid: target,
                            });
                        }
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(target, Mark::OnStack);
                            stack.push((target, 0));
                        }
                    }
                } else {
                    marks.insert(uid, Mark::Done);
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    /// 步骤 6
    pub(in crate::nn) fn check_dangling_tail(&self, chain: &[&LayerNode]) -> Result<(), ValidationError> {
        let Some((_, body)) = chain.split_last() else {
            return Ok(());
        };
        match body.iter().find(|node| node.connections().is_empty()) {
            Some(node) => Err(ValidationError::DanglingTail {
                layer_type: node.layer_type.clone(),
                uid: node.uid(),
            }),
            None => Ok(()),
        }
    }
}

/// 取必需的整数参数
fn require(node: &LayerNode, key: &'static str) -> Result<i64, ValidationError> {
    node.params
        .get_int(key)
        .ok_or_else(|| ValidationError::MissingParam {
            layer_type: node.layer_type.clone(),
            uid: node.uid(),
            key,
        })
}

fn check_channels(
    src: &LayerNode,
    tgt: &LayerNode,
    out_channels: i64,
    in_channels: i64,
) -> Result<(), ValidationError> {
    if out_channels == in_channels {
        return Ok(());
    }
    Err(ValidationError::ChannelMismatch {
        src_type: src.layer_type.clone(),
        src: src.uid(),
        tgt_type: tgt.layer_type.clone(),
        tgt: tgt.uid(),
        out_channels,
        in_channels,
    })
}

impl ConnectionGraph {
    /// 校验网络结构，返回第一个违规项
    pub fn check(&self) -> Result<(), ValidationError> {
        let result = NetworkValidator::new(self).check();
        match &result {
            Ok(()) => debug!(layers = self.len(); "网络校验通过"),
            Err(e) => debug!(kind = e.kind().to_string().as_str(); "网络校验失败: {e}"),
        }
        result
    }

    /// 校验网络结构，返回 (ok, message) 形式的报告
    pub fn validate(&self) -> ValidationReport {
        self.check().into()
    }
}

//! # NN Designer
//!
//! 神经网络结构设计器的核心逻辑：用户在画布上摆放的层构成一个连接图（[`nn::ConnectionGraph`]），
//! 本库负责判断它是否为合法、形状一致、无环的层链，展开 ResidualBlock / Inception 等复合模块，
//! 以 JSON 设计文档保存/加载，并导出为 PyTorch 模块源码。
//!
//! 界面（画布、对话框）不在本库范围内，所有操作都是同步的、单线程的。
//!
//! ```ignore
//! use nn_designer::nn::{ConnectionGraph, DesignerConfig, LayerCatalog};
//!
//! let mut graph = ConnectionGraph::new();
//! graph.insert_predefined("LeNet-5", false)?;
//! assert!(graph.validate().ok);
//! let code = graph.export_code(&LayerCatalog::builtin(), &DesignerConfig::default().export);
//! ```

pub mod errors;
pub mod nn;
mod utils;

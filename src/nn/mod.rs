/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 神经网络结构设计器的核心：层目录、连接图、校验、持久化与代码导出
 */

mod config;
mod descriptor;
mod display;
mod export;
mod graph;
pub mod layer;
mod validate;

pub use config::{DesignerConfig, ExportConfig, LayoutConfig};
pub use descriptor::{DesignDocument, LayerRecord};
pub use display::params_short;
pub use export::{CodeExporter, python_literal};
pub use graph::layout::{grid_position, sequence_from_positions};
pub use graph::{ConnectionGraph, LayerId, LayerNode};
pub use layer::predefined::{ARCHITECTURES, predefined, predefined_names};
pub use layer::{
    CatalogEntry, Composite, CompositeModule, Inception, LayerCatalog, LayerDef, LayerParams, LayerType,
    MAX_REPEATS, ParamValue, ResidualBlock, expand_all, expand_definition,
};
pub use validate::{NetworkValidator, ValidationReport};

#[cfg(test)]
mod tests;

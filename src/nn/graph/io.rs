/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : ConnectionGraph 设计文档 I/O（save_design/load_design/import_design）
 *
 * 加载分两步：
 * 1. 暂存（stage）：解析整个文档、检查 uid 与连接、完成 uid 重编号，期间不触碰当前图
 * 2. 提交（commit）：一次性写入当前图，此步不会失败
 * 因此任何错误都不会留下“加载了一半”的图。
 */

use super::{ConnectionGraph, LayerId, LayerNode};
use crate::errors::PersistenceError;
use crate::nn::descriptor::{DesignDocument, LayerRecord};
use crate::nn::{DesignerConfig, LayerDef};
use crate::utils::write_atomic;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 暂存的加载结果
struct StagedDesign {
    nodes: Vec<LayerNode>,
    sequence: Vec<LayerId>,
    max_uid: u64,
    renumbered: usize,
}

/// uid 重编号：与已见过的 uid 冲突（<= 当前最大值）时分配最大值加一
struct UidRemapper {
    max_uid: u64,
    map: HashMap<u64, LayerId>,
    renumbered: usize,
}

impl UidRemapper {
    fn new(max_uid: u64) -> Self {
        Self {
            max_uid,
            map: HashMap::new(),
            renumbered: 0,
        }
    }

    /// 同一个原始 uid 总是映射到同一个新 uid
    fn assign(&mut self, raw: u64) -> LayerId {
        if let Some(&uid) = self.map.get(&raw) {
            return uid;
        }
        let uid = if raw <= self.max_uid {
            self.renumbered += 1;
            self.max_uid + 1
        } else {
            raw
        };
        self.max_uid = uid;
        self.map.insert(raw, LayerId(uid));
        LayerId(uid)
    }
}

fn check_connections(record: &LayerRecord) -> Result<(), PersistenceError> {
    let mut targets = HashSet::new();
    for &target in &record.connections {
        if target == record.uid {
            return Err(PersistenceError::InvalidConnection {
                uid: record.uid,
                reason: "连接到自身",
            });
        }
        if !targets.insert(target) {
            return Err(PersistenceError::InvalidConnection {
                uid: record.uid,
                reason: "重复连接",
            });
        }
    }
    Ok(())
}

/// 暂存文档：`max_uid` 为当前会话见过的最大 uid
fn stage(doc: DesignDocument, max_uid: u64) -> Result<StagedDesign, PersistenceError> {
    let mut raw_uids = Vec::with_capacity(doc.layers.len());
    let mut seen = HashSet::new();
    for record in &doc.layers {
        if !seen.insert(record.uid) {
            return Err(PersistenceError::DuplicateUid(record.uid));
        }
        check_connections(record)?;
        raw_uids.push(record.uid);
    }

    // 先按升序给所有层分配 uid，再处理引用；指向不存在层的引用也按同样规则重编号，
    // 这样它们仍然是悬空引用（由校验报告），而不会误指向某个已有的层
    let mut remap = UidRemapper::new(max_uid);
    raw_uids.sort_unstable();
    for &raw in &raw_uids {
        remap.assign(raw);
    }

    let mut nodes = Vec::with_capacity(doc.layers.len());
    for record in doc.layers {
        let uid = remap.assign(record.uid);
        let def = LayerDef::new(record.layer_type, record.params);
        let mut node = LayerNode::new(uid, def, (record.pos[0], record.pos[1]));
        node.connections = record.connections.iter().map(|&t| remap.assign(t)).collect();
        nodes.push(node);
    }
    let sequence = doc.sequence.iter().map(|&raw| remap.assign(raw)).collect();

    Ok(StagedDesign {
        nodes,
        sequence,
        max_uid: remap.max_uid,
        renumbered: remap.renumbered,
    })
}

impl ConnectionGraph {
    // ========== 保存 ==========

    /// 生成设计文档（层按 uid 升序）
    ///
    /// 参数中无法用 JSON 表示的值（NaN、无穷大）会转为字符串。
    pub fn to_document(&self) -> DesignDocument {
        let layers = self
            .nodes
            .values()
            .map(|node| LayerRecord {
                uid: node.uid().0,
                layer_type: node.layer_type.clone(),
                params: node.params.to_persistable(),
                pos: [node.position.0, node.position.1],
                connections: node.connections.iter().map(|t| t.0).collect(),
            })
            .collect();
        DesignDocument {
            layers,
            sequence: self.sequence.iter().map(|uid| uid.0).collect(),
        }
    }

    /// 保存设计文档（先写临时文件再替换目标文件）
    ///
    /// # 示例
    /// ```ignore
    /// graph.save_design("designs/lenet.json")?;
    /// ```
    pub fn save_design<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let json = self.to_document().to_json()?;
        write_atomic(path, json.as_bytes())?;
        info!(layers = self.len(); "设计文档已保存: {}", path.display());
        Ok(())
    }

    // ========== 加载 ==========

    /// 用文档内容替换当前图（uid 计数器保留，冲突的 uid 会被重编号）
    pub fn load_document(
        &mut self,
        doc: DesignDocument,
        config: &DesignerConfig,
    ) -> Result<(), PersistenceError> {
        let staged = stage(doc, self.max_uid)?;
        self.clear();
        self.commit(staged, config);
        Ok(())
    }

    /// 把文档内容合并到当前图，序列追加到末尾，返回新加入的 uid
    pub fn import_document(
        &mut self,
        doc: DesignDocument,
        config: &DesignerConfig,
    ) -> Result<Vec<LayerId>, PersistenceError> {
        let staged = stage(doc, self.max_uid)?;
        Ok(self.commit(staged, config))
    }

    /// 从文件加载设计文档并替换当前图；失败时当前图保持不变
    pub fn load_design<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: &DesignerConfig,
    ) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let doc = read_document(path)?;
        self.load_document(doc, config)?;
        info!(layers = self.len(); "设计文档已加载: {}", path.display());
        Ok(())
    }

    /// 从文件导入设计文档并合并到当前图
    pub fn import_design<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: &DesignerConfig,
    ) -> Result<Vec<LayerId>, PersistenceError> {
        let path = path.as_ref();
        let doc = read_document(path)?;
        let uids = self.import_document(doc, config)?;
        info!(layers = uids.len(); "设计文档已导入: {}", path.display());
        Ok(uids)
    }

    fn commit(&mut self, staged: StagedDesign, config: &DesignerConfig) -> Vec<LayerId> {
        if staged.renumbered > 0 {
            warn!(renumbered = staged.renumbered; "加载的 uid 与现有 uid 冲突，已重新编号");
        }
        let uids: Vec<LayerId> = staged.nodes.iter().map(LayerNode::uid).collect();
        self.max_uid = self.max_uid.max(staged.max_uid);
        for node in staged.nodes {
            self.nodes.insert(node.uid(), node);
        }
        self.sequence.extend(staged.sequence);
        if config.auto_layout_on_load {
            self.auto_layout(&config.layout);
        }
        debug!(layers = uids.len(), max_uid = self.max_uid; "提交加载结果");
        uids
    }
}

fn read_document(path: &Path) -> Result<DesignDocument, PersistenceError> {
    let json = std::fs::read_to_string(path)?;
    Ok(DesignDocument::from_json(&json)?)
}

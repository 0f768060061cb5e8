//! # 常用接口模块
//!
//! 本模块提供文件写入等常用操作，以及单元测试用的断言宏

pub mod macro_for_unit_test;

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 原子写入：先写同目录下的临时文件，落盘后再替换目标文件
///
/// 中途失败时目标文件保持原样，不会出现写了一半的文件。
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

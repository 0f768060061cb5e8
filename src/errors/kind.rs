use std::fmt::{self, Display};

/// 校验错误的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 引用缺失、未连接、尾部悬空等结构问题
    Structural,
    /// 特征数/通道数不匹配、缺少 Flatten 等形状问题
    ShapeMismatch,
    /// 连接图中存在环
    Cycle,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_name = match self {
            ErrorKind::Structural => "结构错误",
            ErrorKind::ShapeMismatch => "形状不匹配",
            ErrorKind::Cycle => "环",
        };
        write!(f, "{}", kind_name)
    }
}

/// 错误断言宏 - 灵活粒度验证 Result 错误
///
/// # 用法
/// - `assert_err!(expr)` — 只验证是 Err
/// - `assert_err!(expr, NodeNotFound(uid))` — 验证节点不存在错误及其 uid
/// - `assert_err!(expr, Pattern { .. })` — 验证错误类型
/// - `assert_err!(expr, Pattern { field, .. } if condition)` — 验证类型 + 条件
///
/// # 示例
/// ```ignore
/// // 只验证是错误
/// assert_err!(result);
///
/// // 验证节点不存在
/// assert_err!(graph.remove_layer(LayerId(9)), GraphError::NodeNotFound(LayerId(9)));
///
/// // 验证类型 + 关键字段
/// assert_err!(result, ValidationError::FeatureMismatch { out_features, .. } if *out_features == 5);
/// ```
#[macro_export]
macro_rules! assert_err {
    // 只验证是 Err
    ($expr:expr) => {
        assert!($expr.is_err(), "预期 Err，实际得到 {:?}", $expr);
    };
    // 简洁语法：NodeNotFound(uid)
    ($expr:expr, $err_type:ident :: NodeNotFound ( $id:expr )) => {
        match &$expr {
            Err($err_type::NodeNotFound(id)) => {
                assert_eq!(*id, $id, "uid 不匹配");
            }
            Err(e) => panic!(
                "错误类型不匹配：预期 `{}::NodeNotFound`，实际得到 `{:?}`",
                stringify!($err_type), e
            ),
            Ok(v) => panic!(
                "预期 Err({}::NodeNotFound)，实际得到 Ok({:?})",
                stringify!($err_type), v
            ),
        }
    };
    // 通用模式匹配（带 if guard 或复杂 pattern）
    ($expr:expr, $($pattern:tt)+) => {
        match &$expr {
            Err(e) => assert!(
                matches!(e, $($pattern)+),
                "错误类型不匹配：预期 `{}`，实际得到 `{:?}`",
                stringify!($($pattern)+),
                e
            ),
            Ok(v) => panic!(
                "预期 Err 匹配 `{}`，实际得到 Ok({:?})",
                stringify!($($pattern)+),
                v
            ),
        }
    };
}

/// 校验报告断言宏：验证失败且消息包含给定片段
///
/// ```ignore
/// assert_rejected!(graph.validate(), "5 != 8");
/// ```
#[macro_export]
macro_rules! assert_rejected {
    ($report:expr, $fragment:expr) => {{
        let report = $report;
        assert!(!report.ok, "预期校验失败，实际通过：{}", report.message);
        assert!(
            report.message.contains($fragment),
            "校验消息 `{}` 不包含 `{}`",
            report.message,
            $fragment
        );
    }};
}

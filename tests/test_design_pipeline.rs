/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 完整设计流程测试：预定义网络 -> 编辑 -> 校验 -> 保存 -> 加载 -> 导出
 */
use nn_designer::errors::ErrorKind;
use nn_designer::nn::{ConnectionGraph, DesignerConfig, LayerCatalog, LayerId, LayerType};

#[test]
fn test_lenet_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let design = dir.path().join("lenet.json");
    let code = dir.path().join("lenet.py");
    let config = DesignerConfig::default();
    let catalog = LayerCatalog::builtin();

    // 1. 插入预定义网络并校验
    let mut graph = ConnectionGraph::new();
    let uids = graph.insert_predefined("LeNet-5", false).unwrap();
    assert_eq!(uids.len(), 12);
    assert!(graph.validate().ok);

    // 2. 改坏最后一个 Linear 的输入维度，校验应失败
    let last = *uids.last().unwrap();
    graph.set_param(last, "in_features", 42).unwrap();
    let report = graph.validate();
    assert!(!report.ok);
    assert_eq!(report.kind, Some(ErrorKind::ShapeMismatch));
    assert!(report.message.contains("84 != 42"), "{}", report.message);
    graph.set_param(last, "in_features", 84).unwrap();

    // 3. 保存后加载到新会话
    graph.save_design(&design).unwrap();
    let mut restored = ConnectionGraph::new();
    restored.load_design(&design, &config).unwrap();
    assert_eq!(restored.sequence(), graph.sequence());
    assert_eq!(restored.edges(), graph.edges());
    assert!(restored.validate().ok);

    // 4. 导出代码
    let exporter = nn_designer::nn::CodeExporter::new(&catalog, &config.export);
    exporter.export_to_file(&restored, &code).unwrap();
    let source = std::fs::read_to_string(&code).unwrap();
    assert!(source.contains("class Net(nn.Module):"));
    assert!(source.contains("self.l1 = nn.Conv2d(in_channels=1, out_channels=6, kernel_size=5)"));
    assert!(source.contains("self.l3 = nn.AvgPool2d(kernel_size=2, stride=2)"));
    assert!(source.contains("x = self.l12(x)"));
    assert!(source.contains("torch.randn(1, 1, 224, 224)"));
}

#[test]
fn test_canvas_editing_pipeline() {
    let catalog = LayerCatalog::builtin();
    let mut graph = ConnectionGraph::new();

    // 用户从调色板拖入三个层，位置乱序
    let fc2 = graph.add_from_catalog(&catalog, &LayerType::Linear, (50.0, 300.0)).unwrap();
    let fc1 = graph.add_from_catalog(&catalog, &LayerType::Linear, (50.0, 100.0)).unwrap();
    let act = graph.add_from_catalog(&catalog, &LayerType::ReLU, (50.0, 200.0)).unwrap();
    graph.set_param(fc1, "out_features", 32).unwrap();
    graph.set_param(fc2, "in_features", 32).unwrap();

    // 尚未连接
    assert!(!graph.validate().ok);

    // 按画布位置重排序列，然后一键连接
    graph.recompute_sequence_from_positions();
    assert_eq!(graph.sequence(), [fc1, act, fc2]);
    let report = graph.connect_in_sequence_order().unwrap();
    assert!(report.ok, "{}", report.message);

    // 加一条回边形成环
    graph.connect(fc2, fc1).unwrap();
    let report = graph.validate();
    assert_eq!(report.kind, Some(ErrorKind::Cycle));

    graph.disconnect(fc2, fc1).unwrap();
    graph.remove_layer(act).unwrap();
    assert_eq!(graph.sequence(), [fc1, fc2]);
    // 删除后需要重新连接
    assert!(!graph.validate().ok);
    assert!(graph.connect_in_sequence_order().unwrap().ok);

    // 合并一个 ResNet-18 后新 uid 继续递增
    let imported = graph.insert_predefined("ResNet-18", true).unwrap();
    assert_eq!(imported.first(), Some(&LayerId(4)));
    println!("{}", graph.summary_string());
}

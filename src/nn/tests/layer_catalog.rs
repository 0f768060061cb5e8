/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 层目录测试
 */

use crate::nn::{LayerCatalog, LayerType, ParamValue};

#[test]
fn test_builtin_covers_all_builtin_types() {
    let catalog = LayerCatalog::builtin();
    assert_eq!(catalog.len(), LayerType::builtin().len());
    for layer_type in LayerType::builtin() {
        assert!(catalog.contains(&layer_type), "缺少 {layer_type}");
    }
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(names[..3], ["Linear", "Conv2d", "ReLU"]);
    assert_eq!(catalog.layer_types().count(), catalog.len());
}

#[test]
fn test_instantiate_uses_default_params() {
    let catalog = LayerCatalog::builtin();
    let def = catalog.instantiate(&LayerType::Conv2d).unwrap();
    assert_eq!(def.layer_type, LayerType::Conv2d);
    assert_eq!(def.params.get_int("in_channels"), Some(3));
    assert_eq!(def.params.get_int("out_channels"), Some(16));
    assert_eq!(
        def.params.keys().collect::<Vec<_>>(),
        ["in_channels", "out_channels", "kernel_size", "stride", "padding", "bias"]
    );

    assert!(catalog.instantiate(&LayerType::Custom("Attention".to_string())).is_none());
}

#[test]
fn test_class_name_falls_back_to_nn_prefix() {
    let catalog = LayerCatalog::builtin();
    assert_eq!(catalog.class_name(&LayerType::Dropout), "nn.Dropout");
    assert_eq!(catalog.class_name(&LayerType::ResidualBlock), "ResidualBlock");
    assert_eq!(catalog.class_name(&LayerType::from("GELU")), "nn.GELU");
}

#[test]
fn test_from_json_and_merge() {
    let json = r#"{
        "GELU": {"class_name": "nn.GELU", "default_params": {"approximate": "none"}},
        "Linear": {"class_name": "MyLinear", "default_params": {"in_features": 4, "out_features": 2}}
    }"#;
    let custom = LayerCatalog::from_json(json).unwrap();
    assert_eq!(custom.len(), 2);
    assert!(custom.contains(&LayerType::Custom("GELU".to_string())));

    let mut catalog = LayerCatalog::builtin();
    catalog.merge(custom);
    assert_eq!(catalog.len(), LayerType::builtin().len() + 1);
    assert_eq!(catalog.class_name(&LayerType::Linear), "MyLinear");

    let gelu = catalog.instantiate(&LayerType::from("GELU")).unwrap();
    assert_eq!(
        gelu.params.get("approximate"),
        Some(&ParamValue::Str("none".to_string()))
    );
}

#[test]
fn test_from_json_malformed() {
    assert!(LayerCatalog::from_json("{\"Linear\": 3}").is_err());
    assert!(LayerCatalog::from_json("not json").is_err());
}

#[test]
fn test_layer_type_names_round_trip() {
    for layer_type in LayerType::builtin() {
        assert_eq!(LayerType::from_name(layer_type.name()), layer_type);
    }
    assert_eq!(LayerType::from("Swish"), LayerType::Custom("Swish".to_string()));
    assert!(LayerType::Inception.is_composite());
    assert!(!LayerType::Conv2d.is_composite());
}

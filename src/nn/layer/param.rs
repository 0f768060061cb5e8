/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 层参数：参数值（ParamValue）与有序参数表（LayerParams）
 *
 * 参数值只允许数值/布尔/字符串以及由它们组成的列表（用于 kernel_size 这类元组参数），
 * 不允许嵌套对象。参数表保留声明顺序，导出代码时按此顺序生成关键字参数。
 */

use ndarray::{ArrayBase, ArrayViewD, Data, Dimension};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 单个参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// 取整数值；浮点数、布尔值等一律返回 None
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// 将 ndarray 数组递归转换为嵌套列表
    ///
    /// 0 维数组转换为标量本身，n 维数组转换为 n 层嵌套的 `List`。
    ///
    /// # 示例
    /// ```ignore
    /// let kernel = ndarray::arr1(&[3_i64, 3]);
    /// assert_eq!(ParamValue::from_array(&kernel), ParamValue::from((3, 3)));
    /// ```
    pub fn from_array<S, D>(array: &ArrayBase<S, D>) -> Self
    where
        S: Data,
        S::Elem: Clone + Into<ParamValue>,
        D: Dimension,
    {
        fn nest<T: Clone + Into<ParamValue>>(view: ArrayViewD<'_, T>) -> ParamValue {
            if view.ndim() == 0 {
                return view
                    .iter()
                    .next()
                    .cloned()
                    .map_or_else(|| ParamValue::List(Vec::new()), Into::into);
            }
            ParamValue::List(view.outer_iter().map(nest).collect())
        }
        nest(array.view().into_dyn())
    }

    /// 转换为可持久化的形式
    ///
    /// JSON 无法表示 NaN/无穷大，这类浮点数转为字符串保存，其余值原样保留（列表递归处理）。
    pub fn to_persistable(&self) -> Self {
        match self {
            Self::Float(v) if !v.is_finite() => Self::Str(v.to_string()),
            Self::List(items) => Self::List(items.iter().map(Self::to_persistable).collect()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// ----------------------以下是各种原生类型到 ParamValue 的转换----------------------
macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    Self::Int(v as i64)
                }
            }
        )*
    };
}
impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

// 超出 i64 范围的无符号整数饱和到 i64::MAX
macro_rules! impl_from_wide_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}
impl_from_wide_unsigned!(u64, usize);

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<ParamValue>, B: Into<ParamValue>> From<(A, B)> for ParamValue {
    fn from((a, b): (A, B)) -> Self {
        Self::List(vec![a.into(), b.into()])
    }
}

/// 有序参数表（键唯一，保留插入顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerParams {
    entries: Vec<(String, ParamValue)>,
}

impl LayerParams {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 取整数参数（缺失或非整数都返回 None）
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_int)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 设置参数：已存在的键原位替换（保持顺序），否则追加到末尾；返回旧值
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// 所有值都转换为可持久化形式后的副本
    pub fn to_persistable(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_persistable()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for LayerParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl Serialize for LayerParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LayerParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = LayerParams;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("参数名到基本类型值的映射")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut params = LayerParams::new();
                while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
                    params.insert(key, value);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamsVisitor)
    }
}

/// 便捷构造有序参数表
///
/// ```ignore
/// let params = layer_params! { "in_channels" => 3, "out_channels" => 16, "kernel_size" => 3 };
/// ```
#[macro_export]
macro_rules! layer_params {
    () => {
        $crate::nn::LayerParams::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::nn::LayerParams::new();
        $(params.insert($key, $value);)+
        params
    }};
}

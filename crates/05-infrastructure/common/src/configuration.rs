//! 配置相关的基础接口定义

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// 配置提供者元数据
///
/// 由 `#[derive(ProviderConfig)]` 生成，声明类型绑定的配置节名称。
pub trait ProviderConfig: Send + Sync + 'static {
    /// 配置节名称
    const SECTION: &'static str;
}

/// 配置节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置节路径
    #[serde(default)]
    pub path: String,
    /// 配置数据
    pub data: HashMap<String, serde_json::Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: HashMap::new(),
        }
    }

    /// 从 JSON 对象创建配置节，非对象值得到空配置节
    pub fn from_value(path: impl Into<String>, value: &serde_json::Value) -> Self {
        let mut section = Self::new(path);
        if let serde_json::Value::Object(map) = value {
            for (key, value) in map {
                section.insert(key.clone(), value.clone());
            }
        }
        section
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// 配置节是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        serde_json::from_value(value).map_err(|e| ConfigError::SerializationError { source: e })
    }
}

/// 选项包装器
///
/// 容器中以 `Options<T>` 注册的配置值，解析时得到已绑定的 `T`。
#[derive(Debug)]
pub struct Options<T> {
    value: Arc<T>,
}

impl<T> Options<T> {
    /// 创建选项
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// 获取选项值
    pub fn value(&self) -> &T {
        &self.value
    }

    /// 获取共享的选项值
    pub fn shared(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> std::ops::Deref for Options<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct JwtSecrets {
        key_id: String,
        secret_key: String,
    }

    #[test]
    fn test_bind_section() {
        let section = ConfigSection::from_value(
            "Jwt",
            &json!({ "KeyId": "primary", "SecretKey": "s3cr3t" }),
        );

        let secrets: JwtSecrets = section.bind().unwrap();
        assert_eq!(secrets.key_id, "primary");
        assert_eq!(secrets.secret_key, "s3cr3t");
    }

    #[test]
    fn test_bind_missing_field_fails() {
        let section = ConfigSection::from_value("Jwt", &json!({ "KeyId": "primary" }));
        let result = section.bind::<JwtSecrets>();
        assert!(matches!(result, Err(ConfigError::SerializationError { .. })));
    }

    #[test]
    fn test_non_object_value_gives_empty_section() {
        let section = ConfigSection::from_value("Jwt", &json!("plain"));
        assert!(section.is_empty());
        assert_eq!(section.path, "Jwt");
    }

    #[test]
    fn test_options_deref() {
        let options = Options::new(String::from("value"));
        assert_eq!(options.len(), 5);
        assert_eq!(options.value(), "value");
    }
}

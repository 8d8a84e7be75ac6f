//! 配置提供者抽象接口

use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::path::Path;

/// 配置键的层级分隔符，`Jwt:Issuer` 与 `Jwt.Issuer` 等价
pub const KEY_SEPARATORS: [char; 2] = [':', '.'];

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口
pub trait ConfigProvider: Send + Sync {
    /// 获取配置值
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取配置节
    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        let value = self.get_configuration(section_name)?;
        Ok(ConfigSection::from_value(section_name, &value))
    }

    /// 重新加载配置
    fn reload(&self) -> Result<(), ConfigError>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool {
        self.get_configuration(key).is_ok()
    }

    /// 获取所有配置键
    fn get_all_keys(&self) -> Vec<String>;

    /// 获取提供者名称
    fn name(&self) -> &str;
}

/// 文件配置提供者 trait
pub trait FileConfigProvider: ConfigProvider {
    /// 获取文件路径
    fn file_path(&self) -> &Path;

    /// 检查文件是否存在
    fn file_exists(&self) -> bool {
        self.file_path().exists()
    }
}

/// 拆分配置键路径，忽略空段
pub fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split(&KEY_SEPARATORS[..]).filter(|segment| !segment.is_empty())
}

/// 按键路径查找配置值，对象键不区分大小写
pub fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    split_key(key).try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment).or_else(|| {
            map.iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(segment))
                .map(|(_, value)| value)
        }),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// 列出所有叶子配置键，层级以 `:` 连接
pub fn leaf_keys(root: &Value) -> Vec<String> {
    fn walk(prefix: &str, value: &Value, keys: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    walk(&join(prefix, name), child, keys);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    walk(&join(prefix, &index.to_string()), child, keys);
                }
            }
            _ if !prefix.is_empty() => keys.push(prefix.to_string()),
            _ => {}
        }
    }

    fn join(prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}:{}", prefix, name)
        }
    }

    let mut keys = Vec::new();
    walk("", root, &mut keys);
    keys
}

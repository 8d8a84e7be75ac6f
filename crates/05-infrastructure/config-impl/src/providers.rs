//! 配置提供者实现

use config_abstractions::{leaf_keys, lookup, ConfigProvider, FileConfigProvider};
use infrastructure_common::ConfigError;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// JSON 配置提供者
///
/// 保存一份内存中的 JSON 文档，可以来自字符串、文件或直接构造的值。
#[derive(Debug)]
pub struct JsonConfigProvider {
    file_path: Option<PathBuf>,
    document: RwLock<Value>,
}

impl JsonConfigProvider {
    /// 由 JSON 值创建
    pub fn new(document: Value) -> Self {
        Self {
            file_path: None,
            document: RwLock::new(document),
        }
    }

    /// 由 JSON 文本创建
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(serde_json::from_str(content)?))
    }

    /// 由 JSON 文件创建，`reload` 时重新读取文件
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file_path = path.as_ref().to_path_buf();
        let document = Self::read_file(&file_path)?;
        Ok(Self {
            file_path: Some(file_path),
            document: RwLock::new(document),
        })
    }

    fn read_file(path: &Path) -> Result<Value, ConfigError> {
        debug!("加载 JSON 配置文件: {}", path.display());
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 当前文档的副本
    pub fn document(&self) -> Value {
        self.document.read().clone()
    }
}

impl ConfigProvider for JsonConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        lookup(&self.document.read(), key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn reload(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.file_path {
            let document = Self::read_file(path)?;
            *self.document.write() = document;
        }
        Ok(())
    }

    fn get_all_keys(&self) -> Vec<String> {
        leaf_keys(&self.document.read())
    }

    fn name(&self) -> &str {
        "JsonConfigProvider"
    }
}

/// 环境配置选项
#[derive(Debug, Clone)]
pub struct EnvironmentOptions {
    /// 配置目录
    pub config_dir: PathBuf,
    /// 环境名称
    pub environment: String,
    /// 额外的配置文件，按顺序覆盖
    pub extra_files: Vec<PathBuf>,
}

impl EnvironmentOptions {
    /// 创建指定环境的选项
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            config_dir: PathBuf::from(EnvironmentConfiguration::CONFIGURATION_FOLDER),
            environment: environment.into(),
            extra_files: Vec::new(),
        }
    }

    /// 设置配置目录
    #[must_use]
    pub fn with_config_dir(mut self, config_dir: impl Into<PathBuf>) -> Self {
        self.config_dir = config_dir.into();
        self
    }

    /// 添加额外的配置文件
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_files.push(path.into());
        self
    }
}

/// 环境名称取自 `APP_ENVIRONMENT`，未设置时为 `Production`
impl Default for EnvironmentOptions {
    fn default() -> Self {
        let environment = std::env::var(EnvironmentConfiguration::ENVIRONMENT_VARIABLE)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| EnvironmentConfiguration::PRODUCTION.to_string());
        Self::new(environment)
    }
}

/// 按环境加载的配置
///
/// `Production` 读取 `appsettings.json`，其他环境读取 `appsettings.<环境>.json`
/// 以及配置目录下的 `.env` 文件。
/// 形如 `__NAME__` 的字符串值在加载后替换为同名变量，`.env` 中的值优先于进程环境变量。
/// 键保留文件中的原始大小写。
#[derive(Debug)]
pub struct EnvironmentConfiguration {
    options: EnvironmentOptions,
    settings_path: PathBuf,
    document: RwLock<Value>,
}

impl EnvironmentConfiguration {
    /// 默认配置目录
    pub const CONFIGURATION_FOLDER: &'static str = "ConfigSettings";
    /// 环境名称的环境变量
    pub const ENVIRONMENT_VARIABLE: &'static str = "APP_ENVIRONMENT";
    /// 生产环境名称
    pub const PRODUCTION: &'static str = "Production";
    /// 非生产环境读取的环境变量文件
    pub const DOTENV_FILE: &'static str = ".env";

    /// 加载配置
    pub fn build(options: EnvironmentOptions) -> Result<Self, ConfigError> {
        let settings_path = options
            .config_dir
            .join(Self::settings_file_name(&options.environment));
        let document = Self::load(&settings_path, &options)?;

        info!(
            "加载环境配置: environment={}, file={}",
            options.environment,
            settings_path.display()
        );
        Ok(Self {
            options,
            settings_path,
            document: RwLock::new(document),
        })
    }

    /// 环境对应的配置文件名
    pub fn settings_file_name(environment: &str) -> String {
        if Self::is_production(environment) {
            "appsettings.json".to_string()
        } else {
            format!("appsettings.{}.json", environment)
        }
    }

    /// 是否为生产环境，忽略大小写
    pub fn is_production(environment: &str) -> bool {
        environment.eq_ignore_ascii_case(Self::PRODUCTION)
    }

    /// 环境名称
    pub fn environment(&self) -> &str {
        &self.options.environment
    }

    fn load(settings_path: &Path, options: &EnvironmentOptions) -> Result<Value, ConfigError> {
        if !settings_path.exists() {
            warn!("环境配置文件不存在: {}", settings_path.display());
        }

        let mut document = read_source(
            &config::File::from(settings_path)
                .format(config::FileFormat::Json)
                .required(false),
        )?;
        for extra in &options.extra_files {
            let overrides = read_source(&config::File::from(extra.as_path()).required(false))?;
            merge_values(&mut document, overrides);
        }

        let variables = if Self::is_production(&options.environment) {
            HashMap::new()
        } else {
            read_dotenv(&options.config_dir.join(Self::DOTENV_FILE))?
        };
        let replaced = replace_placeholders(&mut document, &|name| {
            variables
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
                .or_else(|| std::env::var(name).ok())
        });
        debug!("环境变量占位符替换: {} 个", replaced);
        Ok(document)
    }
}

/// 解析单个配置源，保留键的原始大小写
///
/// `config` 合并多个源时会把键转为小写，这里只用它解析文件格式，合并由 [`merge_values`] 完成。
fn read_source(source: &dyn config::Source) -> Result<Value, ConfigError> {
    let table = source.collect().map_err(|e| ConfigError::ParseError {
        source: Box::new(e),
    })?;
    config::Value::new(None, table)
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })
}

/// 深度合并，`overrides` 中的值覆盖 `base`，对象逐键合并
pub fn merge_values(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}

/// 读取 `.env` 文件，文件不存在时返回空集合
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        warn!("环境变量文件不存在: {}", path.display());
        return Ok(HashMap::new());
    }

    let variables = dotenvy::from_path_iter(path)
        .and_then(|entries| entries.collect::<Result<HashMap<_, _>, _>>())
        .map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
    info!("加载环境变量文件: {} ({} 个变量)", path.display(), variables.len());
    Ok(variables)
}

impl ConfigProvider for EnvironmentConfiguration {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        lookup(&self.document.read(), key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn reload(&self) -> Result<(), ConfigError> {
        let document =
            Self::load(&self.settings_path, &self.options).map_err(|e| ConfigError::ReloadError {
                message: e.to_string(),
            })?;
        *self.document.write() = document;
        info!("环境配置已重新加载: {}", self.settings_path.display());
        Ok(())
    }

    fn get_all_keys(&self) -> Vec<String> {
        leaf_keys(&self.document.read())
    }

    fn name(&self) -> &str {
        "EnvironmentConfiguration"
    }
}

impl FileConfigProvider for EnvironmentConfiguration {
    fn file_path(&self) -> &Path {
        &self.settings_path
    }
}

/// 替换 `__NAME__` 形式的占位符，返回替换数量
///
/// 变量未设置或为空时保留占位符。
pub fn replace_placeholders(value: &mut Value, resolve: &dyn Fn(&str) -> Option<String>) -> usize {
    match value {
        Value::String(text) => {
            let replacement = placeholder_name(text)
                .and_then(|name| resolve(name))
                .filter(|replacement| !replacement.is_empty());
            match replacement {
                Some(replacement) => {
                    *text = replacement;
                    1
                }
                None => 0,
            }
        }
        Value::Array(items) => items
            .iter_mut()
            .map(|item| replace_placeholders(item, resolve))
            .sum(),
        Value::Object(map) => map
            .values_mut()
            .map(|item| replace_placeholders(item, resolve))
            .sum(),
        _ => 0,
    }
}

fn placeholder_name(text: &str) -> Option<&str> {
    if text.len() > 4 && text.starts_with("__") && text.ends_with("__") {
        Some(text.trim_matches('_')).filter(|name| !name.is_empty())
    } else {
        None
    }
}

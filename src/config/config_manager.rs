// ==========================================
// 保质期追踪 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: key-value（字符串），读取时做类型转换
// 优先级: 默认值 < JSON 配置文件 < 环境变量 BEST_BEFORE_<KEY>
// ==========================================

use crate::domain::item::DEFAULT_CATEGORY;
use crate::domain::types::StorageLocation;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "BEST_BEFORE_CONFIG";

/// 环境变量覆写前缀
pub const ENV_PREFIX: &str = "BEST_BEFORE_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置内容必须是 JSON 对象")]
    NotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 仅默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 按完整优先级加载（默认值 → 配置文件 → 环境变量）
    ///
    /// 配置文件不存在不是错误；存在但无法解析则返回错误
    pub fn load() -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        if let Some(path) = get_default_config_path() {
            if path.exists() {
                manager.merge_json_file(&path)?;
            } else {
                tracing::debug!("配置文件不存在，使用默认配置: {}", path.display());
            }
        }
        manager.apply_env_overrides();
        Ok(manager)
    }

    /// 默认值 + 指定配置文件
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.merge_json_file(path)?;
        Ok(manager)
    }

    /// 合并 JSON 配置文件
    pub fn merge_json_file(&mut self, path: &Path) -> Result<usize, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.merge_json_value(value)?;
        tracing::info!("已加载配置文件: {}（{}项）", path.display(), count);
        Ok(count)
    }

    /// 合并 JSON 字符串（扁平对象，值可为字符串/数字/布尔）
    pub fn merge_json_str(&mut self, raw: &str) -> Result<usize, ConfigError> {
        let value: Value = serde_json::from_str(raw)?;
        self.merge_json_value(value)
    }

    fn merge_json_value(&mut self, value: Value) -> Result<usize, ConfigError> {
        let object = match value {
            Value::Object(map) => map,
            _ => return Err(ConfigError::NotAnObject),
        };

        let mut count = 0;
        for (key, value) in object {
            if !config_keys::ALL.contains(&key.as_str()) {
                tracing::warn!("忽略未知配置项: {}", key);
                continue;
            }
            let text = match value {
                Value::String(s) => s,
                Value::Null => continue,
                other => other.to_string(),
            };
            self.values.insert(key, text);
            count += 1;
        }
        Ok(count)
    }

    /// 读取进程环境变量覆写
    pub fn apply_env_overrides(&mut self) -> usize {
        self.apply_overrides_with(|name| std::env::var(name).ok())
    }

    /// 以指定查找函数覆写（BEST_BEFORE_<KEY 大写>）
    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> usize
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut count = 0;
        for key in config_keys::ALL {
            let env_name = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Some(value) = lookup(&env_name) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    tracing::debug!("环境变量覆写配置: {}={}", key, trimmed);
                    self.values.insert(key.to_string(), trimmed.to_string());
                    count += 1;
                }
            }
        }
        count
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(&str): 配置值
    /// - None: 未配置（使用默认值）
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 读取并解析；格式错误时告警并回落默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr,
    {
        match self.get_config_value(key) {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!("配置项格式错误，使用默认值: {}={}", key, raw);
                    default
                }
            },
            None => default,
        }
    }

    // ===== 界面配置 =====

    /// 界面语言（默认 en）
    pub fn locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, "en")
    }

    // ===== 到期规则 =====

    /// 临期（Warning）阈值天数（默认 3）
    pub fn warning_days(&self) -> i64 {
        self.get_parsed_or_default(config_keys::WARNING_DAYS, 3i64)
    }

    /// 开封提示的默认可用天数（默认 7；非正数回落默认值）
    pub fn default_use_within_days(&self) -> u32 {
        match self.get_parsed_or_default(config_keys::DEFAULT_USE_WITHIN_DAYS, 7u32) {
            0 => {
                tracing::warn!("default_use_within_days 不能为 0，使用默认值 7");
                7
            }
            n => n,
        }
    }

    // ===== 录入默认值 =====

    pub fn default_location(&self) -> StorageLocation {
        self.get_parsed_or_default(config_keys::DEFAULT_LOCATION, StorageLocation::Fridge)
    }

    pub fn default_category(&self) -> String {
        match self.get_config_value(config_keys::DEFAULT_CATEGORY).map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        }
    }

    /// 启动时是否预置示例条目
    pub fn seed_demo_items(&self) -> bool {
        match self.get_config_value(config_keys::SEED_DEMO_ITEMS) {
            Some(v) => matches!(
                v.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "on"
            ),
            None => false,
        }
    }

    /// 获取生效配置快照（JSON，含默认值）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let mut snapshot = Map::new();
        snapshot.insert(config_keys::LOCALE.into(), json!(self.locale()));
        snapshot.insert(config_keys::WARNING_DAYS.into(), json!(self.warning_days()));
        snapshot.insert(
            config_keys::DEFAULT_USE_WITHIN_DAYS.into(),
            json!(self.default_use_within_days()),
        );
        snapshot.insert(config_keys::DEFAULT_LOCATION.into(), json!(self.default_location()));
        snapshot.insert(config_keys::DEFAULT_CATEGORY.into(), json!(self.default_category()));
        snapshot.insert(config_keys::SEED_DEMO_ITEMS.into(), json!(self.seed_demo_items()));
        Ok(serde_json::to_string(&snapshot)?)
    }
}

/// 默认配置文件路径
///
/// 优先 BEST_BEFORE_CONFIG，其次用户配置目录下 best-before-tracker/config.json
pub fn get_default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir().map(|dir| dir.join("best-before-tracker").join("config.json"))
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 界面
    pub const LOCALE: &str = "locale";

    // 到期规则
    pub const WARNING_DAYS: &str = "warning_days";
    pub const DEFAULT_USE_WITHIN_DAYS: &str = "default_use_within_days";

    // 录入默认值
    pub const DEFAULT_LOCATION: &str = "default_location";
    pub const DEFAULT_CATEGORY: &str = "default_category";

    // 启动
    pub const SEED_DEMO_ITEMS: &str = "seed_demo_items";

    pub const ALL: [&str; 6] = [
        LOCALE,
        WARNING_DAYS,
        DEFAULT_USE_WITHIN_DAYS,
        DEFAULT_LOCATION,
        DEFAULT_CATEGORY,
        SEED_DEMO_ITEMS,
    ];
}

// src/config.rs

use crate::db;
use crate::error::{LogbookError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 合法的诊断日志级别
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 数据库文件路径；为空时使用 ~/.config/logbook/logbook.db
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub page_size: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// 获取配置文件的标准路径 (~/.config/logbook/config.toml)
pub fn default_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(LogbookError::HomeDirNotFound)?;
    Ok(home_dir.join(".config/logbook/config.toml"))
}

impl Config {
    /// 加载配置：显式指定的文件必须存在；默认位置的文件不存在时使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = default_config_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LogbookError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_str(&content, path)
    }

    pub fn from_str(content: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| LogbookError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(LogbookError::Config {
                path: path.to_path_buf(),
                reason: format!(
                    "invalid logging.level '{}', valid values: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.view.page_size == 0 {
            return Err(LogbookError::Config {
                path: path.to_path_buf(),
                reason: "view.page_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// 最终使用的数据库路径
    pub fn db_path(&self) -> Result<PathBuf> {
        match self.database.path.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(p) => expand_home(p),
            None => db::default_db_path(),
        }
    }
}

/// 展开开头的 `~/`
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home_dir = dirs::home_dir().ok_or(LogbookError::HomeDirNotFound)?;
            Ok(home_dir.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

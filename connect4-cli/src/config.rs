//! 应用配置
//!
//! 从 JSON 文件加载，文件不存在时使用默认值；命令行参数再覆盖文件中的值。

use std::path::{Path, PathBuf};
use std::time::Duration;

use connect4_ai::AiConfig;
use protocol::{Difficulty, NetworkConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 搜索深度上限（再深会明显卡顿）
pub const MAX_SEARCH_DEPTH: u8 = 8;

/// 电脑落子前的停顿（毫秒）
pub const DEFAULT_AI_DELAY_MS: u64 = 500;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 对端地址与端口
    pub network: NetworkConfig,
    /// 人机对战默认难度
    pub difficulty: Difficulty,
    pub ai: AiConfig,
    pub ai_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            difficulty: Difficulty::default(),
            ai: AiConfig::default(),
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
        }
    }
}

impl AppConfig {
    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 文件不存在时返回默认配置
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.search_depth == 0 || self.ai.search_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "ai.search_depth must be in 1..={}",
                MAX_SEARCH_DEPTH
            )));
        }
        if self.network.host.trim().is_empty() {
            return Err(ConfigError::Validation("network.host must not be empty".into()));
        }
        Ok(())
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.network.port, 5555);
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.ai.search_depth, 3);
        assert_eq!(config.ai_delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config(r#"{ "difficulty": "hard", "network": { "port": 6000 } }"#);
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.network.port, 6000);
        assert_eq!(config.network.host, "127.0.0.1");
        assert_eq!(config.ai_delay_ms, DEFAULT_AI_DELAY_MS);
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{ not json");
        assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let file = write_config(r#"{ "ai": { "search_depth": 0 } }"#);
        let err = AppConfig::load(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "config validation error: ai.search_depth must be in 1..=8"
        );
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let file = write_config(r#"{ "difficulty": "nightmare" }"#);
        assert!(AppConfig::load(file.path()).is_err());
    }
}

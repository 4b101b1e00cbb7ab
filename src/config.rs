use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    /// Ollama 服务地址（不带 `/v1`）
    pub llm_api_base_url: String,
    /// OpenAI 兼容接口的密钥，Ollama 不校验
    pub llm_api_key: String,
    /// 判分使用的模型
    pub grading_model: String,
    /// 出题使用的模型
    pub generation_model: String,
    /// 判分 / 出题请求的超时（秒）
    pub llm_timeout_secs: u64,
    /// 存活探测的超时（秒）
    pub probe_timeout_secs: u64,
    // --- 批量练习配置 ---
    /// 同时批改的提交数量
    pub max_concurrent_submissions: usize,
    /// 练习记录 TOML 文件
    pub submissions_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_base_url: "http://localhost:11434".to_string(),
            llm_api_key: "ollama".to_string(),
            grading_model: "qwen3:latest".to_string(),
            generation_model: "qwen3:latest".to_string(),
            llm_timeout_secs: 120,
            probe_timeout_secs: 5,
            max_concurrent_submissions: 4,
            submissions_file: "demos/practice.toml".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            grading_model: std::env::var("GRADING_MODEL").unwrap_or(default.grading_model),
            generation_model: std::env::var("GENERATION_MODEL").unwrap_or(default.generation_model),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
            probe_timeout_secs: std::env::var("PROBE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.probe_timeout_secs),
            max_concurrent_submissions: std::env::var("MAX_CONCURRENT_SUBMISSIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_submissions),
            submissions_file: std::env::var("SUBMISSIONS_FILE").unwrap_or(default.submissions_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_submissions == 0 {
            return Err(AppError::Config(ConfigError::InvalidValue {
                field: "max_concurrent_submissions".to_string(),
                reason: "必须大于 0".to_string(),
            }));
        }
        if self.grading_model.trim().is_empty() || self.generation_model.trim().is_empty() {
            return Err(AppError::Config(ConfigError::InvalidValue {
                field: "model".to_string(),
                reason: "模型名称不能为空".to_string(),
            }));
        }
        Ok(())
    }
}

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 模型输出中没有可用的结构化内容
    #[error("解析错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 存储层错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 服务不可达、超时或返回错误状态
    #[error("LLM 服务不可用 (模型: {model}): {source}")]
    ServiceUnavailable {
        model: String,
        #[source]
        source: BoxError,
    },
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuild {
        #[source]
        source: BoxError,
    },
}

/// 结构化内容提取失败
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 找不到可解析的 JSON 对象
    #[error("模型输出中没有可解析的 JSON 对象: {raw}")]
    NoStructuredPayload { raw: String },
}

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 存储尚未初始化
    #[error("存储尚未初始化")]
    NotInitialized,
    /// 学生不存在
    #[error("学生不存在: {student_id}")]
    UnknownStudent { student_id: String },
    /// 作业不存在
    #[error("作业不存在: {assignment_id}")]
    UnknownAssignment { assignment_id: u64 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: BoxError,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: BoxError,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 LLM 服务不可用错误
    pub fn service_unavailable(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ServiceUnavailable {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否为外部 LLM 服务层面的失败
    pub fn is_service_failure(&self) -> bool {
        matches!(self, AppError::Llm(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

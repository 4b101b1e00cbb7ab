use serde::Serialize;

/// LLM 服务的存活状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ServiceHealth {
    /// 可用，附带可用模型列表
    Healthy { models: Vec<String> },
    /// 连接失败或返回错误状态
    Unreachable { reason: String },
    /// 能连上，但响应无法解析
    MalformedResponse { reason: String },
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ServiceHealth::Healthy { .. })
    }

    /// 对外展示的整体状态
    pub fn status(&self) -> &'static str {
        if self.is_healthy() {
            "healthy"
        } else {
            "degraded"
        }
    }

    pub fn models(&self) -> &[String] {
        match self {
            ServiceHealth::Healthy { models } => models,
            _ => &[],
        }
    }
}

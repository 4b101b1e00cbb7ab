//! LLM 网关
//!
//! 负责把"系统指令 + 用户提示词"发给 Ollama，并返回原始文本
//!
//! ## 技术栈
//! - 使用 `async-openai` 调用 Ollama 的 OpenAI 兼容接口（`/v1`）
//! - 使用 `reqwest` 调用原生的 `/api/tags` 做存活探测
//!
//! 网关不校验返回内容，结构化解析由 `services::extractor` 负责；
//! 也不做任何自动重试，是否重试由调用方决定。

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::clients::health::ServiceHealth;
use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::utils::logging::truncate_text;

/// LLM 调用的抽象，方便在测试中替换
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// 发送一次对话请求，返回模型的原始回复
    async fn query(&self, prompt: &str, system: Option<&str>, model: &str) -> AppResult<String>;
}

/// Ollama 客户端
pub struct OllamaClient {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    probe_timeout: Duration,
}

/// `/api/tags` 的响应
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// 创建新的 Ollama 客户端
    pub fn new(config: &Config) -> Self {
        let base_url = config.llm_api_base_url.trim_end_matches('/').to_string();

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(format!("{}/v1", base_url));

        Self {
            client: Client::with_config(openai_config).with_backoff(single_attempt()),
            http: reqwest::Client::new(),
            base_url,
            request_timeout: Duration::from_secs(config.llm_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 构建消息列表：可选的系统消息在前，随后是一条用户消息
    fn build_messages(prompt: &str, system: Option<&str>) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(2);

        if let Some(sys_msg) = system {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| LlmError::RequestBuild { source: Box::new(e) })?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::RequestBuild { source: Box::new(e) })?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        Ok(messages)
    }

    /// 探测 Ollama 是否可用，以及有哪些模型
    ///
    /// 不会返回错误，失败时给出降级状态
    pub async fn probe(&self) -> ServiceHealth {
        let url = format!("{}/api/tags", self.base_url);
        debug!("探测 LLM 服务: {}", url);

        let response = match self.http.get(&url).timeout(self.probe_timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("LLM 服务不可达: {}", e);
                return ServiceHealth::Unreachable { reason: e.to_string() };
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("LLM 服务返回错误状态: {}", status);
            return ServiceHealth::Unreachable {
                reason: format!("HTTP {}", status),
            };
        }

        match response.json::<TagsResponse>().await {
            Ok(tags) => ServiceHealth::Healthy {
                models: tags.models.into_iter().map(|m| m.name).collect(),
            },
            Err(e) => {
                warn!("LLM 服务响应无法解析: {}", e);
                ServiceHealth::MalformedResponse { reason: e.to_string() }
            }
        }
    }
}

/// 只尝试一次的退避策略
///
/// async-openai 默认会对 5xx 和 429 指数退避重试，这里关掉
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

#[async_trait]
impl LlmGateway for OllamaClient {
    async fn query(&self, prompt: &str, system: Option<&str>, model: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", model);
        debug!("用户消息长度: {} 字符", prompt.len());

        let messages = Self::build_messages(prompt, system)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()
            .map_err(|e| LlmError::RequestBuild { source: Box::new(e) })?;

        // 超时后丢弃请求 future，不会产生副作用
        let response = match tokio::time::timeout(self.request_timeout, self.client.chat().create(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("LLM API 调用失败: {}", e);
                return Err(AppError::service_unavailable(model, e));
            }
            Err(elapsed) => {
                warn!("LLM API 调用超时 ({} 秒)", self.request_timeout.as_secs());
                return Err(AppError::service_unavailable(model, elapsed));
            }
        };

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        debug!("LLM API 调用成功: {}", truncate_text(&content, 200));

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// 读完整个请求（请求头加上 Content-Length 指定的请求体）
    ///
    /// 未读完的数据会让关闭连接变成 RST，客户端就收不到应答
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + body_len {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }
    }

    /// 启动一个总是返回同一应答的 HTTP 服务，并统计收到的请求数
    async fn serve_always(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;
                let response = format!(
                    "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    /// 启动一个只应答一次的 HTTP 服务
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> OllamaClient {
        OllamaClient::new(&Config {
            llm_api_base_url: base_url,
            ..Config::default()
        })
    }

    #[test]
    fn system_message_comes_first() {
        let messages = OllamaClient::build_messages("grade this", Some("you are a tutor")).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));

        let messages = OllamaClient::build_messages("grade this", None).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:11434/".to_string());
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn probe_lists_models_when_healthy() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"models":[{"name":"qwen3:latest"},{"name":"qwen3:32b"}]}"#,
        )
        .await;

        let health = client_for(base).probe().await;
        assert_eq!(
            health,
            ServiceHealth::Healthy {
                models: vec!["qwen3:latest".to_string(), "qwen3:32b".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn probe_reports_malformed_body() {
        let base = serve_once("HTTP/1.1 200 OK", "not json").await;

        let health = client_for(base).probe().await;
        assert!(matches!(health, ServiceHealth::MalformedResponse { .. }));
        assert_eq!(health.status(), "degraded");
    }

    #[tokio::test]
    async fn probe_reports_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let health = client_for(format!("http://{}", addr)).probe().await;
        assert!(matches!(health, ServiceHealth::Unreachable { .. }));
        assert!(health.models().is_empty());
    }

    fn assert_service_unavailable(result: AppResult<String>) -> String {
        match result {
            Err(AppError::Llm(LlmError::ServiceUnavailable { model, source })) => {
                assert_eq!(model, "qwen3:latest");
                source.to_string()
            }
            other => panic!("expected ServiceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn query_returns_trimmed_content() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"id":"chatcmpl-1","object":"chat.completion","created":1700000000,"model":"qwen3:latest","choices":[{"index":0,"message":{"role":"assistant","content":"  {\"correct\": true}\n"},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
        )
        .await;

        let content = client_for(base)
            .query("grade this", Some("you are a tutor"), "qwen3:latest")
            .await
            .unwrap();
        assert_eq!(content, r#"{"correct": true}"#);
    }

    #[tokio::test]
    async fn query_server_error_is_not_retried() {
        let (base, hits) = serve_always(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"error":{"message":"model crashed","type":"server_error","param":null,"code":null}}"#,
        )
        .await;

        let client = OllamaClient::new(&Config {
            llm_api_base_url: base,
            llm_timeout_secs: 10,
            ..Config::default()
        });

        let started = std::time::Instant::now();
        let cause = assert_service_unavailable(client.query("grade this", None, "qwen3:latest").await);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(cause.contains("model crashed"), "cause: {}", cause);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn query_refused_connection_is_service_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(format!("http://{}", addr))
            .query("grade this", None, "qwen3:latest")
            .await;
        assert_service_unavailable(result);
    }

    #[tokio::test]
    async fn query_timeout_is_service_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // 接受连接后一直不应答
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = OllamaClient::new(&Config {
            llm_api_base_url: format!("http://{}", addr),
            llm_timeout_secs: 1,
            ..Config::default()
        });

        let started = std::time::Instant::now();
        let cause = assert_service_unavailable(client.query("grade this", None, "qwen3:latest").await);

        assert!(cause.contains("elapsed"), "cause: {}", cause);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}

//! # Chemical Thinking
//!
//! 化学思维课程的自适应练习后端：批改学生作答、生成练习题、追踪掌握进度
//!
//! ## 架构设计
//!
//! ### ① 接入层（Clients）
//! - `clients/` - LLM 网关，只负责把请求发出去、把原文拿回来
//! - `OllamaClient` - 对话请求 + 存活探测
//!
//! ### ② 业务能力层（Services）
//! - `extractor` - 从模型输出中提取 JSON 对象
//! - `MasteryTracker` - 掌握度状态转移
//! - `ProblemGenerator` - 出新题 / 出补救题
//! - `GradingService` - 判分编排
//!
//! ### ③ 流程层（Workflow）
//! - `PracticeFlow` - 一条作答的完整处理（判分 → 更新进度 → 存档）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 批量批改练习文件，控制并发
//!
//! 存储通过 `store::ProgressStore` / `store::CourseStore` 接入，
//! 默认提供 `InMemoryStore`。

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LlmGateway, OllamaClient, ServiceHealth};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    list_primitives, Difficulty, GeneratedProblem, GradingResult, MasteryUpdate, Primitive,
    ProblemRequest, Submission, Verdict,
};
pub use orchestrator::App;
pub use services::{GradingService, MasteryTracker, ProblemGenerator};
pub use store::{CourseStore, InMemoryStore, ProgressStore};
pub use workflow::{PracticeCtx, PracticeFlow, PracticeOutcome};

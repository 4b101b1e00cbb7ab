//! 批量练习处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：探测 LLM 服务、初始化存储、组装练习流程
//! 2. **批量加载**：读取练习文件中的全部作答
//! 3. **并发控制**：使用 Semaphore 限制同时批改的数量
//! 4. **全局统计**：汇总答对 / 答错 / 失败数量

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::{OllamaClient, ServiceHealth};
use crate::config::Config;
use crate::models::{load_practice_batch, PracticeEntry};
use crate::store::{InMemoryStore, ProgressStore};
use crate::utils::logging::{log_batch_loaded, log_health, log_startup, print_final_stats};
use crate::workflow::{PracticeCtx, PracticeFlow};

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<OllamaClient>,
    store: Arc<InMemoryStore>,
    flow: Arc<PracticeFlow>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        log_startup(&config);

        let client = Arc::new(OllamaClient::new(&config));
        log_health(&client.probe().await);

        let store = Arc::new(InMemoryStore::new());
        store.initialize().await?;

        let flow = Arc::new(PracticeFlow::from_config(client.clone(), store.clone(), &config));

        Ok(Self {
            config,
            client,
            store,
            flow,
        })
    }

    /// 存活探测
    pub async fn health(&self) -> ServiceHealth {
        self.client.probe().await
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        info!("\n📁 正在读取练习文件: {}", self.config.submissions_file);
        let batch = load_practice_batch(Path::new(&self.config.submissions_file)).await?;

        if batch.attempts.is_empty() {
            warn!("⚠️ 练习文件中没有作答，程序结束");
            return Ok(());
        }

        log_batch_loaded(batch.attempts.len(), self.config.max_concurrent_submissions);

        let stats = self.process_all(batch.attempts).await?;
        print_final_stats(stats.correct, stats.incorrect, stats.failed);

        self.log_progress_summary(&stats.students).await?;

        Ok(())
    }

    /// 并发批改所有作答
    async fn process_all(&self, entries: Vec<PracticeEntry>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_submissions));
        let mut handles = Vec::with_capacity(entries.len());
        let mut stats = ProcessingStats::default();

        for (idx, PracticeEntry { student_id, submission }) in entries.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = self.flow.clone();
            let ctx = PracticeCtx::new(student_id, idx + 1);

            if !stats.students.contains(&ctx.student_id) {
                stats.students.push(ctx.student_id.clone());
            }

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = flow.submit(&ctx, &submission).await;
                if let Err(e) = &result {
                    error!("{} ❌ 批改失败: {}", ctx, e);
                }
                result
            });
            handles.push((idx + 1, handle));
        }

        for (entry_index, handle) in handles {
            match handle.await {
                Ok(Ok(outcome)) if outcome.grading.correct => stats.correct += 1,
                Ok(Ok(_)) => stats.incorrect += 1,
                Ok(Err(_)) => stats.failed += 1,
                Err(e) => {
                    error!("[作答 #{}] 任务执行失败: {}", entry_index, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    /// 输出每个学生的掌握情况
    async fn log_progress_summary(&self, students: &[String]) -> Result<()> {
        for student_id in students {
            for record in self.store.list_progress(student_id).await? {
                info!(
                    "学生 {} | {}/{} | 连对 {} | 尝试 {} | {}",
                    student_id,
                    record.primitive,
                    record.topic,
                    record.streak,
                    record.attempts,
                    if record.mastery_achieved { "🏆 已掌握" } else { "练习中" }
                );
            }
        }
        Ok(())
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    correct: usize,
    incorrect: usize,
    failed: usize,
    students: Vec<String>,
}

//! 练习流程 - 流程层
//!
//! 一条作答的完整处理：
//! 1. 判分（可能附带补救题）
//! 2. 存档本次作答
//! 3. 更新掌握进度
//!
//! 判分失败时直接返回错误，不写入任何进度。
//! 存档先于进度更新：存档失败时连对数不会前进，
//! 反过来最多留下一条没有计入进度的作答记录。

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::clients::LlmGateway;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{
    AttemptRecord, GeneratedProblem, GradingResult, MasteryUpdate, ProblemRequest, ProgressKey,
    Submission,
};
use crate::services::{GradingService, ProblemGenerator};
use crate::store::ProgressStore;
use crate::workflow::practice_ctx::PracticeCtx;

/// 一条作答的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct PracticeOutcome {
    pub grading: GradingResult,
    pub progress: MasteryUpdate,
}

/// 练习流程
///
/// - 编排判分与进度写入的先后顺序
/// - 不关心存储的具体实现
pub struct PracticeFlow {
    grading: GradingService,
    store: Arc<dyn ProgressStore>,
}

impl PracticeFlow {
    pub fn new(grading: GradingService, store: Arc<dyn ProgressStore>) -> Self {
        Self { grading, store }
    }

    /// 按配置中的模型组装判分与出题服务
    pub fn from_config(gateway: Arc<dyn LlmGateway>, store: Arc<dyn ProgressStore>, config: &Config) -> Self {
        let generator = ProblemGenerator::new(gateway.clone(), config.generation_model.clone());
        let grading = GradingService::new(gateway, config.grading_model.clone(), generator);
        Self::new(grading, store)
    }

    /// 处理一条作答
    pub async fn submit(&self, ctx: &PracticeCtx, submission: &Submission) -> AppResult<PracticeOutcome> {
        if !submission.primitive.has_topic(&submission.topic) {
            warn!(
                "{} 课题 {} 不在 {} 的课题列表中",
                ctx, submission.topic, submission.primitive
            );
        }

        let grading = self.grading.grade(submission).await?;

        let now = Utc::now();
        self.store
            .record_attempt(AttemptRecord {
                student_id: ctx.student_id.clone(),
                primitive: submission.primitive,
                topic: submission.topic.clone(),
                problem_text: submission.problem_text.clone(),
                student_answer: submission.student_answer.clone(),
                correct_answer: submission.correct_answer.clone(),
                is_correct: grading.correct,
                feedback: grading.feedback.clone(),
                attempted_at: now,
            })
            .await?;

        let key = ProgressKey::new(ctx.student_id.clone(), submission.primitive, submission.topic.clone());
        let progress = self.store.update_progress(&key, grading.correct, now).await?;

        if progress.mastery_achieved {
            info!("{} 🏆 已掌握 {}/{} (连对 {})", ctx, submission.primitive, submission.topic, progress.streak);
        } else {
            info!("{} 连对 {} / 尝试 {}", ctx, progress.streak, progress.attempts);
        }

        Ok(PracticeOutcome { grading, progress })
    }

    /// 出一道新题，解析失败时返回错误
    pub async fn generate_problem(&self, request: &ProblemRequest) -> AppResult<GeneratedProblem> {
        self.grading.generator().generate(request).await
    }
}

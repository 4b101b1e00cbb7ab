//! 出题服务
//!
//! 两种出题入口，失败时的容忍度不同：
//! - `generate`：按请求出新题，模型输出无法解析时返回错误
//! - `generate_remedial`：答错后出一道同概念的简单题，解析失败时给出固定题目

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::LlmGateway;
use crate::error::{AppResult, ExtractionError};
use crate::models::primitive::taxonomy_line;
use crate::models::{Difficulty, GeneratedProblem, ProblemRequest, Submission};
use crate::services::extractor::extract_as;
use crate::utils::logging::truncate_text;

/// 出题服务
pub struct ProblemGenerator {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    system_prompt: String,
}

impl ProblemGenerator {
    pub fn new(gateway: Arc<dyn LlmGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            system_prompt: build_system_prompt(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 按原语 / 课题 / 难度出一道新题
    ///
    /// 模型输出中没有可用的题目时返回 `ExtractionError`
    pub async fn generate(&self, request: &ProblemRequest) -> AppResult<GeneratedProblem> {
        info!(
            "📝 生成新题: {}/{} (难度 {})",
            request.primitive,
            request.topic,
            request.difficulty.level()
        );

        let prompt = build_fresh_prompt(request);
        let raw = self
            .gateway
            .query(&prompt, Some(&self.system_prompt), &self.model)
            .await?;

        match extract_as::<GeneratedProblem>(&raw) {
            Some(problem) => {
                debug!("✓ 新题生成成功: {}", truncate_text(&problem.problem_text, 80));
                Ok(problem)
            }
            None => {
                warn!("⚠️ 新题生成失败，模型输出无法解析: {}", truncate_text(&raw, 200));
                Err(ExtractionError::NoStructuredPayload { raw }.into())
            }
        }
    }

    /// 针对答错的题目出一道同概念、较简单的补救题
    ///
    /// 只有网关失败会返回错误；模型输出无法解析时返回固定的兜底题
    pub async fn generate_remedial(&self, submission: &Submission) -> AppResult<GeneratedProblem> {
        info!("📝 生成补救题: {}/{}", submission.primitive, submission.topic);

        let prompt = build_remedial_prompt(submission);
        let raw = self
            .gateway
            .query(&prompt, Some(&self.system_prompt), &self.model)
            .await?;

        Ok(extract_as::<GeneratedProblem>(&raw).unwrap_or_else(|| {
            warn!("⚠️ 补救题无法解析，使用固定题目");
            GeneratedProblem::fallback()
        }))
    }
}

fn build_system_prompt() -> String {
    format!(
        r#"You are generating practice problems for a chemistry-math course.
The course uses 9 primitives: {}.

Generate a problem that:
1. Starts with a real chemical phenomenon (the hook)
2. Tests understanding of the specified primitive
3. Has a clear numerical or short answer
4. Matches the difficulty level (1=basic, 2=intermediate, 3=advanced)

Respond in JSON format:
{{
    "problem_text": "the problem statement",
    "correct_answer": "the answer (number or short phrase)",
    "hint1": "first hint if they struggle",
    "hint2": "second hint (more direct)",
    "worked_solution": "full solution explanation",
    "chemistry_connection": "why this matters in chemistry"
}}"#,
        taxonomy_line()
    )
}

fn build_fresh_prompt(request: &ProblemRequest) -> String {
    let mut prompt = format!(
        "Generate a chemistry-math problem:\nPrimitive: {}\nTopic: {}\nDifficulty: {} ({})\n",
        request.primitive,
        request.topic,
        request.difficulty.level(),
        request.difficulty.label()
    );

    if let Some(previous) = request.previous_problem.as_deref().filter(|p| !p.trim().is_empty()) {
        prompt.push_str(&format!("\nMake it different from: {}\n", previous));
    }

    prompt
}

fn build_remedial_prompt(submission: &Submission) -> String {
    format!(
        r#"Generate a problem similar to this one but with different numbers/molecules:

Original problem: {}
Primitive: {}
Topic: {}
Difficulty: {} (keep it accessible since student struggled)

Make it test the same concept but look different."#,
        submission.problem_text,
        submission.primitive,
        submission.topic,
        Difficulty::Basic.level()
    )
}

//! 判分服务
//!
//! 组织一次判分：构建提示词 → 调用网关 → 解析结论 →
//! 答错时尝试出补救题 → 计算练习进度分数。
//!
//! 不写入任何进度，进度持久化由调用方（`workflow::PracticeFlow`）负责。

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::LlmGateway;
use crate::error::AppResult;
use crate::models::{GradingResult, Submission, Verdict};
use crate::services::extractor::extract_as;
use crate::services::mastery::mastery_progress;
use crate::services::problem_generator::ProblemGenerator;
use crate::utils::logging::truncate_text;

const GRADING_SYSTEM: &str = r#"You are a chemistry-math tutor using the "Chemical Thinking" approach.
Your role is to:
1. Check if the student's answer is correct (be flexible with formatting/units)
2. If wrong, explain WHY without giving away the answer
3. Provide a worked example of a SIMILAR problem
4. Be encouraging but direct - no coddling

Respond in JSON format:
{
    "correct": true/false,
    "feedback": "explanation of what they got right/wrong",
    "worked_example": "if wrong, show a similar worked problem",
    "hint": "if wrong, a hint for the original problem"
}"#;

/// 判分服务
pub struct GradingService {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    generator: ProblemGenerator,
}

impl GradingService {
    pub fn new(gateway: Arc<dyn LlmGateway>, model: impl Into<String>, generator: ProblemGenerator) -> Self {
        Self {
            gateway,
            model: model.into(),
            generator,
        }
    }

    pub fn generator(&self) -> &ProblemGenerator {
        &self.generator
    }

    /// 批改一次作答
    ///
    /// 只有网关失败会返回错误；模型输出无法解析时判为错误并把原文作为反馈
    pub async fn grade(&self, submission: &Submission) -> AppResult<GradingResult> {
        info!(
            "🤖 批改作答: 题目 {} ({}/{})",
            submission.problem_id, submission.primitive, submission.topic
        );

        let prompt = build_grading_prompt(submission);
        let raw = self
            .gateway
            .query(&prompt, Some(GRADING_SYSTEM), &self.model)
            .await?;

        let verdict = parse_verdict(&raw);

        let next_problem = if verdict.correct {
            None
        } else {
            // 补救题是尽力而为，失败不影响判分结果
            match self.generator.generate_remedial(submission).await {
                Ok(problem) => Some(problem),
                Err(e) => {
                    warn!("⚠️ 补救题生成失败，省略: {}", e);
                    None
                }
            }
        };

        let progress = mastery_progress(verdict.correct, submission.hints_given);
        info!(
            "{} 题目 {} 批改完成，进度分数 {}",
            if verdict.correct { "✅" } else { "❌" },
            submission.problem_id,
            progress
        );

        Ok(GradingResult {
            correct: verdict.correct,
            feedback: verdict.feedback,
            worked_example: verdict.worked_example,
            hint: verdict.hint,
            next_problem,
            mastery_progress: progress,
        })
    }
}

/// 解析判分结论，无法解析时判为错误
fn parse_verdict(raw: &str) -> Verdict {
    extract_as::<Verdict>(raw).unwrap_or_else(|| {
        warn!("⚠️ 判分结果无法解析，按错误处理: {}", truncate_text(raw, 200));
        Verdict::ungraded(raw)
    })
}

fn build_grading_prompt(submission: &Submission) -> String {
    format!(
        r#"
Problem: {}
Correct Answer: {}
Student Answer: {}
Primitive: {}
Topic: {}
Hints already given: {}

Grade this answer and provide feedback.
"#,
        submission.problem_text,
        submission.correct_answer,
        submission.student_answer,
        submission.primitive,
        submission.topic,
        submission.hints_given
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Primitive;

    #[test]
    fn prompt_embeds_every_submission_field() {
        let submission = Submission {
            problem_id: "p7".to_string(),
            problem_text: "How many moles in 18 g of water?".to_string(),
            correct_answer: "1 mol".to_string(),
            student_answer: "2 mol".to_string(),
            primitive: Primitive::Collection,
            topic: "moles".to_string(),
            hints_given: 2,
        };
        let prompt = build_grading_prompt(&submission);
        assert!(prompt.contains("Problem: How many moles in 18 g of water?"));
        assert!(prompt.contains("Correct Answer: 1 mol"));
        assert!(prompt.contains("Student Answer: 2 mol"));
        assert!(prompt.contains("Primitive: COLLECTION"));
        assert!(prompt.contains("Topic: moles"));
        assert!(prompt.contains("Hints already given: 2"));
    }

    #[test]
    fn verdict_from_wrapped_json() {
        let verdict = parse_verdict(
            "Let me check.\n{\"correct\": true, \"feedback\": \"Right, 109.5 degrees.\"}",
        );
        assert!(verdict.correct);
        assert_eq!(verdict.feedback, "Right, 109.5 degrees.");
        assert!(verdict.worked_example.is_none());
    }

    #[test]
    fn missing_fields_default_to_incorrect() {
        let verdict = parse_verdict(r#"{"feedback": "unsure"}"#);
        assert!(!verdict.correct);
        assert_eq!(verdict.feedback, "unsure");
    }

    #[test]
    fn unparseable_output_becomes_feedback() {
        let raw = "I think the student is mostly right.";
        assert_eq!(parse_verdict(raw), Verdict::ungraded(raw));
    }

    #[test]
    fn malformed_verdict_keeps_raw_text_as_feedback() {
        let raw = r#"{"correct": true, "feedback": "Good work", "worked_example": {"step": 1}, oops}"#;
        assert_eq!(parse_verdict(raw), Verdict::ungraded(raw));

        let raw = r#"{"correct": false, "feedback": "Not right, see {"step": 1} for details"}"#;
        assert_eq!(parse_verdict(raw), Verdict::ungraded(raw));
    }
}

use serde::{Deserialize, Serialize};

use crate::models::primitive::Primitive;
use crate::models::problem::GeneratedProblem;

/// 学生提交的一次作答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub problem_id: String,
    pub problem_text: String,
    pub correct_answer: String,
    pub student_answer: String,
    pub primitive: Primitive,
    pub topic: String,
    #[serde(default)]
    pub hints_given: u32,
}

/// 模型给出的判分结论
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Verdict {
    pub correct: bool,
    pub feedback: String,
    pub worked_example: Option<String>,
    pub hint: Option<String>,
}

impl Verdict {
    /// 无法解析模型输出时的兜底：判为错误，原文作为反馈
    pub fn ungraded(raw: &str) -> Self {
        Self {
            correct: false,
            feedback: raw.to_string(),
            worked_example: None,
            hint: None,
        }
    }
}

/// 返回给调用方的判分结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    pub correct: bool,
    pub feedback: String,
    pub worked_example: Option<String>,
    pub hint: Option<String>,
    pub next_problem: Option<GeneratedProblem>,
    /// 0-100
    pub mastery_progress: u8,
}
